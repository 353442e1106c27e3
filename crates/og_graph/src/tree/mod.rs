//! The format independent property tree.
//!
//! - [`PropertyNode`]: One node, a name, declared and runtime types and a [`NodeBody`].
//! - [`NodeKind`]: The eight node kinds.
//! - [`ReferenceInfo`]: Identity of instances reachable from more than one position.

// -----------------------------------------------------------------------------
// Modules

mod node;
mod reference;

// -----------------------------------------------------------------------------
// Exports

pub use node::{
    CollectionNode, ComplexNode, DictionaryNode, MultiArrayNode, NodeBody, NodeKind, PropertyNode,
    ReferenceNode, SingleArrayNode,
};
pub use reference::ReferenceInfo;

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    fn reference(name: &str, id: u32) -> PropertyNode {
        PropertyNode::new(
            name,
            Some("app::Person".into()),
            NodeBody::Reference(ReferenceNode {
                reference: ReferenceInfo::placeholder(id),
                target: NodeKind::Complex,
            }),
        )
    }

    fn complex(name: &str, id: u32, properties: Vec<PropertyNode>) -> PropertyNode {
        PropertyNode::new(
            name,
            Some("app::Person".into()),
            NodeBody::Complex(ComplexNode {
                reference: Some(ReferenceInfo::new(id)),
                properties,
            }),
        )
    }

    #[test]
    fn counts_cover_every_position() {
        let list = PropertyNode::new(
            "people",
            Some("Vec<app::Person>".into()),
            NodeBody::Collection(CollectionNode {
                reference: Some(ReferenceInfo::new(3)),
                properties: vec![],
                element_type: Some("app::Person".into()),
                items: vec![reference("", 1), reference("", 2), reference("", 1)],
            }),
        );
        let mut root = complex(
            "Root",
            1,
            vec![complex("friend", 2, vec![reference("friend", 1)]), list],
        );

        root.update_reference_counts();

        assert_eq!(root.reference().map(|r| r.count), Some(4));
        assert_eq!(root.find_target(2).and_then(|n| n.reference()).map(|r| r.count), Some(2));
        assert_eq!(root.find_target(3).and_then(|n| n.reference()).map(|r| r.count), Some(1));
        assert!(!root.find_target(3).unwrap().reference().unwrap().is_shared());
    }

    #[test]
    fn find_target_skips_placeholders() {
        let root = complex("Root", 1, vec![reference("friend", 1)]);
        let target = root.find_target(1).unwrap();
        assert_eq!(target.kind(), NodeKind::Complex);
        assert!(root.find_target(7).is_none());
    }

    #[test]
    fn walk_is_pre_order() {
        let root = complex(
            "Root",
            1,
            vec![
                PropertyNode::simple("name", "Ann"),
                complex("friend", 2, vec![PropertyNode::null("friend")]),
            ],
        );
        let mut names = Vec::new();
        root.walk(&mut |node| names.push(node.name.clone()));
        let names: Vec<&str> = names.iter().map(|n| &**n).collect();
        assert_eq!(names, ["Root", "name", "friend", "friend"]);
    }

    #[test]
    fn kinds() {
        assert!(NodeKind::MultiArray.is_reference_target());
        assert!(!NodeKind::Reference.is_reference_target());
        assert!(!NodeKind::Simple.is_reference_target());
        assert_eq!(NodeKind::ALL.len(), 8);
        assert_eq!(PropertyNode::simple("x", 1.5_f64).kind(), NodeKind::Simple);
    }
}
