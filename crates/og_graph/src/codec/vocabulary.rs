//! Element tags and attribute names shared by every element format.

use crate::tree::NodeKind;

pub const NULL: &str = "Null";
pub const SIMPLE: &str = "Simple";
pub const COMPLEX: &str = "Complex";
pub const COLLECTION: &str = "Collection";
pub const DICTIONARY: &str = "Dictionary";
pub const SINGLE_ARRAY: &str = "SingleArray";
pub const MULTI_ARRAY: &str = "MultiArray";
pub const REFERENCE: &str = "Reference";
/// Read only, older documents tag references this way.
pub const LEGACY_REFERENCE: &str = "ComplexReference";

pub const PROPERTIES: &str = "Properties";
pub const ITEMS: &str = "Items";
pub const ITEM: &str = "Item";
pub const DIMENSIONS: &str = "Dimensions";
pub const DIMENSION: &str = "Dimension";

pub const ATTR_NAME: &str = "name";
pub const ATTR_TYPE: &str = "type";
pub const ATTR_VALUE: &str = "value";
pub const ATTR_ID: &str = "id";
pub const ATTR_LOWER_BOUND: &str = "lowerBound";
pub const ATTR_LENGTH: &str = "length";
pub const ATTR_INDEXES: &str = "indexes";

/// Returns the tag written for `kind`.
pub const fn node_tag(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Null => NULL,
        NodeKind::Simple => SIMPLE,
        NodeKind::Complex => COMPLEX,
        NodeKind::Collection => COLLECTION,
        NodeKind::Dictionary => DICTIONARY,
        NodeKind::SingleArray => SINGLE_ARRAY,
        NodeKind::MultiArray => MULTI_ARRAY,
        NodeKind::Reference => REFERENCE,
    }
}

/// Returns the node kind of a tag, `None` for group and unknown tags.
///
/// # Examples
///
/// ```
/// use og_graph::codec::vocabulary::{node_kind, node_tag};
/// use og_graph::tree::NodeKind;
///
/// assert_eq!(node_kind("ComplexReference"), Some(NodeKind::Reference));
/// assert_eq!(node_kind(node_tag(NodeKind::MultiArray)), Some(NodeKind::MultiArray));
/// assert_eq!(node_kind("Items"), None);
/// ```
pub fn node_kind(tag: &str) -> Option<NodeKind> {
    match tag {
        LEGACY_REFERENCE => Some(NodeKind::Reference),
        _ => NodeKind::ALL.into_iter().find(|kind| node_tag(*kind) == tag),
    }
}
