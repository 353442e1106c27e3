use og_utils::hash::HashMap;

use crate::tree::{NodeBody, PropertyNode};

// -----------------------------------------------------------------------------
// ReferenceInfo

/// Identity information of a reference target.
///
/// Ids are positive and unique within one tree. `count` is the number of
/// positions holding the instance, the full node included; codecs write the
/// id only when it is greater than one. `processed` is set on the full node
/// and cleared on placeholders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ReferenceInfo {
    pub id: u32,
    pub count: u32,
    pub processed: bool,
}

impl ReferenceInfo {
    /// Reference info of a full node, seen once.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self {
            id,
            count: 1,
            processed: true,
        }
    }

    /// Reference info of a placeholder pointing at `id`.
    #[inline]
    pub const fn placeholder(id: u32) -> Self {
        Self {
            id,
            count: 1,
            processed: false,
        }
    }

    /// Returns `true` if codecs need to write the id.
    #[inline]
    pub const fn is_shared(&self) -> bool {
        self.count > 1
    }
}

// -----------------------------------------------------------------------------
// Counting

impl PropertyNode {
    /// Recounts the positions of every reference target in the tree.
    ///
    /// Each full node counts once and each reference node once more for its
    /// target. The totals are stored in both the full node and its references.
    ///
    /// # Examples
    ///
    /// ```
    /// use og_graph::tree::{ComplexNode, NodeBody, NodeKind, PropertyNode, ReferenceInfo, ReferenceNode};
    ///
    /// let back = PropertyNode::new(
    ///     "self",
    ///     Some("app::Node".into()),
    ///     NodeBody::Reference(ReferenceNode {
    ///         reference: ReferenceInfo::placeholder(1),
    ///         target: NodeKind::Complex,
    ///     }),
    /// );
    /// let mut root = PropertyNode::new(
    ///     "Root",
    ///     Some("app::Node".into()),
    ///     NodeBody::Complex(ComplexNode {
    ///         reference: Some(ReferenceInfo::new(1)),
    ///         properties: vec![back],
    ///     }),
    /// );
    ///
    /// root.update_reference_counts();
    /// assert_eq!(root.reference().unwrap().count, 2);
    /// assert_eq!(root.properties()[0].reference().unwrap().count, 2);
    /// ```
    pub fn update_reference_counts(&mut self) {
        let mut counts: HashMap<u32, u32> = HashMap::default();
        self.walk(&mut |node| {
            if let Some(info) = node.reference() {
                *counts.entry(info.id).or_insert(0) += 1;
            }
        });
        self.walk_mut(&mut |node| {
            if let Some(info) = node.reference_mut()
                && let Some(count) = counts.get(&info.id)
            {
                info.count = *count;
            }
        });
    }

    /// Returns the full node carrying id `id`, searched in pre-order.
    pub fn find_target(&self, id: u32) -> Option<&PropertyNode> {
        if !matches!(self.body, NodeBody::Reference(_))
            && self.reference().is_some_and(|info| info.id == id)
        {
            return Some(self);
        }
        if let Some(found) = self.properties().iter().find_map(|n| n.find_target(id)) {
            return Some(found);
        }
        match &self.body {
            NodeBody::Collection(node) => node.items.iter().find_map(|n| n.find_target(id)),
            NodeBody::SingleArray(node) => node.items.iter().find_map(|n| n.find_target(id)),
            NodeBody::MultiArray(node) => node.items.iter().find_map(|(_, n)| n.find_target(id)),
            NodeBody::Dictionary(node) => node
                .items
                .iter()
                .find_map(|(k, v)| k.find_target(id).or_else(|| v.find_target(id))),
            _ => None,
        }
    }
}
