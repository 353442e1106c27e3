use alloc::sync::Arc;
use alloc::vec::Vec;

use og_reflect::Primitive;
use og_reflect::array::Dimension;
use og_reflect::info::TypePath;

use crate::tree::ReferenceInfo;

// -----------------------------------------------------------------------------
// NodeKind

/// The eight kinds of [`PropertyNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Simple,
    Complex,
    Collection,
    Dictionary,
    SingleArray,
    MultiArray,
    Reference,
}

impl NodeKind {
    pub const ALL: [NodeKind; 8] = [
        NodeKind::Null,
        NodeKind::Simple,
        NodeKind::Complex,
        NodeKind::Collection,
        NodeKind::Dictionary,
        NodeKind::SingleArray,
        NodeKind::MultiArray,
        NodeKind::Reference,
    ];

    /// Returns `true` for kinds that carry a [`ReferenceInfo`] and can be the
    /// target of a [`NodeKind::Reference`].
    #[inline]
    pub const fn is_reference_target(self) -> bool {
        matches!(
            self,
            NodeKind::Complex
                | NodeKind::Collection
                | NodeKind::Dictionary
                | NodeKind::SingleArray
                | NodeKind::MultiArray
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            NodeKind::Null => "Null",
            NodeKind::Simple => "Simple",
            NodeKind::Complex => "Complex",
            NodeKind::Collection => "Collection",
            NodeKind::Dictionary => "Dictionary",
            NodeKind::SingleArray => "SingleArray",
            NodeKind::MultiArray => "MultiArray",
            NodeKind::Reference => "Reference",
        }
    }
}

impl core::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// Node bodies

/// Named properties of a record.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexNode {
    pub reference: Option<ReferenceInfo>,
    pub properties: Vec<PropertyNode>,
}

/// Named properties plus ordered, unnamed items.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionNode {
    pub reference: Option<ReferenceInfo>,
    pub properties: Vec<PropertyNode>,
    pub element_type: Option<TypePath>,
    pub items: Vec<PropertyNode>,
}

/// Named properties plus ordered key-value pairs.
#[derive(Clone, Debug, PartialEq)]
pub struct DictionaryNode {
    pub reference: Option<ReferenceInfo>,
    pub properties: Vec<PropertyNode>,
    pub key_type: Option<TypePath>,
    pub value_type: Option<TypePath>,
    pub items: Vec<(PropertyNode, PropertyNode)>,
}

/// A rank 1 array, items cover `lower_bound..lower_bound + items.len()`.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleArrayNode {
    pub reference: Option<ReferenceInfo>,
    pub element_type: Option<TypePath>,
    pub lower_bound: i32,
    pub items: Vec<PropertyNode>,
}

/// An array of rank 2 or more, each item carries its coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiArrayNode {
    pub reference: Option<ReferenceInfo>,
    pub element_type: Option<TypePath>,
    pub dimensions: Vec<Dimension>,
    pub items: Vec<(Vec<i32>, PropertyNode)>,
}

/// A placeholder for an instance already present earlier in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferenceNode {
    pub reference: ReferenceInfo,
    /// Kind of the full node with the same id.
    pub target: NodeKind,
}

/// The kind specific payload of a [`PropertyNode`].
#[derive(Clone, Debug, PartialEq)]
pub enum NodeBody {
    Null,
    Simple(Primitive),
    Complex(ComplexNode),
    Collection(CollectionNode),
    Dictionary(DictionaryNode),
    SingleArray(SingleArrayNode),
    MultiArray(MultiArrayNode),
    Reference(ReferenceNode),
}

// -----------------------------------------------------------------------------
// PropertyNode

/// One node of a property tree.
///
/// `declared_type` is the type the position expects (a field type, an element
/// type), `value_type` the runtime type of the value. Codecs only write the
/// runtime type when the two differ.
///
/// # Examples
///
/// ```
/// use og_graph::tree::{NodeKind, PropertyNode};
///
/// let age = PropertyNode::simple("age", 42_i32).with_declared_type("i32");
/// assert_eq!(age.kind(), NodeKind::Simple);
/// assert_eq!(age.value_type.as_ref().map(|t| t.as_str()), Some("i32"));
///
/// let none = PropertyNode::null("friend");
/// assert!(none.is_null());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyNode {
    pub name: Arc<str>,
    pub declared_type: Option<TypePath>,
    pub value_type: Option<TypePath>,
    pub body: NodeBody,
}

impl PropertyNode {
    #[inline]
    pub fn new(name: impl Into<Arc<str>>, value_type: Option<TypePath>, body: NodeBody) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            value_type,
            body,
        }
    }

    #[inline]
    pub fn null(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, None, NodeBody::Null)
    }

    /// A simple node whose runtime type is the type of `value`.
    pub fn simple(name: impl Into<Arc<str>>, value: impl Into<Primitive>) -> Self {
        let value = value.into();
        Self::new(name, Some(value.type_path()), NodeBody::Simple(value))
    }

    #[inline]
    pub fn with_declared_type(mut self, ty: impl Into<TypePath>) -> Self {
        self.declared_type = Some(ty.into());
        self
    }

    pub fn kind(&self) -> NodeKind {
        match &self.body {
            NodeBody::Null => NodeKind::Null,
            NodeBody::Simple(_) => NodeKind::Simple,
            NodeBody::Complex(_) => NodeKind::Complex,
            NodeBody::Collection(_) => NodeKind::Collection,
            NodeBody::Dictionary(_) => NodeKind::Dictionary,
            NodeBody::SingleArray(_) => NodeKind::SingleArray,
            NodeBody::MultiArray(_) => NodeKind::MultiArray,
            NodeBody::Reference(_) => NodeKind::Reference,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self.body, NodeBody::Null)
    }

    /// The type the node resolves to: runtime type first, then declared type.
    #[inline]
    pub fn resolved_type(&self) -> Option<&TypePath> {
        self.value_type.as_ref().or(self.declared_type.as_ref())
    }

    /// Returns the reference info of a full node or a reference node.
    pub fn reference(&self) -> Option<&ReferenceInfo> {
        match &self.body {
            NodeBody::Complex(node) => node.reference.as_ref(),
            NodeBody::Collection(node) => node.reference.as_ref(),
            NodeBody::Dictionary(node) => node.reference.as_ref(),
            NodeBody::SingleArray(node) => node.reference.as_ref(),
            NodeBody::MultiArray(node) => node.reference.as_ref(),
            NodeBody::Reference(node) => Some(&node.reference),
            NodeBody::Null | NodeBody::Simple(_) => None,
        }
    }

    pub fn reference_mut(&mut self) -> Option<&mut ReferenceInfo> {
        match &mut self.body {
            NodeBody::Complex(node) => node.reference.as_mut(),
            NodeBody::Collection(node) => node.reference.as_mut(),
            NodeBody::Dictionary(node) => node.reference.as_mut(),
            NodeBody::SingleArray(node) => node.reference.as_mut(),
            NodeBody::MultiArray(node) => node.reference.as_mut(),
            NodeBody::Reference(node) => Some(&mut node.reference),
            NodeBody::Null | NodeBody::Simple(_) => None,
        }
    }

    /// Named properties of complex, collection and dictionary nodes.
    pub fn properties(&self) -> &[PropertyNode] {
        match &self.body {
            NodeBody::Complex(node) => &node.properties,
            NodeBody::Collection(node) => &node.properties,
            NodeBody::Dictionary(node) => &node.properties,
            _ => &[],
        }
    }

    /// Returns the named property child `name`.
    pub fn property(&self, name: &str) -> Option<&PropertyNode> {
        self.properties().iter().find(|p| &*p.name == name)
    }

    /// Visits this node and its descendants in pre-order.
    pub fn walk(&self, visit: &mut impl FnMut(&PropertyNode)) {
        visit(self);
        for child in self.properties() {
            child.walk(visit);
        }
        match &self.body {
            NodeBody::Collection(node) => node.items.iter().for_each(|n| n.walk(visit)),
            NodeBody::SingleArray(node) => node.items.iter().for_each(|n| n.walk(visit)),
            NodeBody::MultiArray(node) => node.items.iter().for_each(|(_, n)| n.walk(visit)),
            NodeBody::Dictionary(node) => {
                for (key, value) in &node.items {
                    key.walk(visit);
                    value.walk(visit);
                }
            }
            _ => {}
        }
    }

    /// Mutable form of [`PropertyNode::walk`].
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut PropertyNode)) {
        visit(self);
        match &mut self.body {
            NodeBody::Complex(node) => {
                node.properties.iter_mut().for_each(|n| n.walk_mut(visit));
            }
            NodeBody::Collection(node) => {
                node.properties.iter_mut().for_each(|n| n.walk_mut(visit));
                node.items.iter_mut().for_each(|n| n.walk_mut(visit));
            }
            NodeBody::Dictionary(node) => {
                node.properties.iter_mut().for_each(|n| n.walk_mut(visit));
                for (key, value) in &mut node.items {
                    key.walk_mut(visit);
                    value.walk_mut(visit);
                }
            }
            NodeBody::SingleArray(node) => {
                node.items.iter_mut().for_each(|n| n.walk_mut(visit));
            }
            NodeBody::MultiArray(node) => {
                node.items.iter_mut().for_each(|(_, n)| n.walk_mut(visit));
            }
            NodeBody::Null | NodeBody::Simple(_) | NodeBody::Reference(_) => {}
        }
    }
}
