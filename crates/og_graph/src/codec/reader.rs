use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;

use og_reflect::access::PropertyAccessor;
use og_reflect::array::Dimension;
use og_reflect::classify::TypeClassifier;
use og_reflect::info::TypePath;
use og_utils::hash::HashMap;

use crate::codec::vocabulary::*;
use crate::codec::{CodecError, ElementReader};
use crate::tree::{
    CollectionNode, ComplexNode, DictionaryNode, MultiArrayNode, NodeBody, NodeKind, PropertyNode,
    ReferenceInfo, ReferenceNode, SingleArrayNode,
};

// -----------------------------------------------------------------------------
// TreeReader

/// Reads a property tree through an [`ElementReader`].
///
/// Expected types come from the owner's properties and the container's item
/// types, so elements only carry a `type` when the runtime type differs.
/// Elements with an `id` are registered before their children are read, and
/// `Reference` elements become placeholders carrying the kind and type of
/// their target. Properties the owner type does not know are skipped
/// unread.
///
/// The reader is consumed by [`TreeReader::read`].
pub struct TreeReader<'a, R, A>
where
    R: ElementReader + ?Sized,
    A: PropertyAccessor + ?Sized,
{
    reader: &'a mut R,
    classifier: &'a TypeClassifier,
    accessor: &'a A,
    targets: HashMap<u32, (NodeKind, TypePath)>,
}

impl<'a, R, A> TreeReader<'a, R, A>
where
    R: ElementReader + ?Sized,
    A: PropertyAccessor + ?Sized,
{
    pub fn new(reader: &'a mut R, classifier: &'a TypeClassifier, accessor: &'a A) -> Self {
        Self {
            reader,
            classifier,
            accessor,
            targets: HashMap::default(),
        }
    }

    /// Reads the root element, `expected` is used when it names no type.
    pub fn read(mut self, expected: Option<&TypePath>) -> Result<PropertyNode, CodecError> {
        let tag = self.reader.read_root()?;
        let kind = node_kind(&tag).ok_or(CodecError::UnknownNodeKind { tag })?;
        let mut root = self.read_node(kind, expected)?;
        root.update_reference_counts();
        Ok(root)
    }

    fn read_node(
        &mut self,
        kind: NodeKind,
        expected: Option<&TypePath>,
    ) -> Result<PropertyNode, CodecError> {
        let name: Arc<str> = Arc::from(self.reader.attribute(ATTR_NAME).unwrap_or(""));
        let declared_type = expected.cloned();

        if kind == NodeKind::Null {
            return Ok(PropertyNode {
                name,
                declared_type,
                value_type: None,
                body: NodeBody::Null,
            });
        }

        if kind == NodeKind::Reference {
            let id = self.read_id()?;
            let (target, ty) = self
                .targets
                .get(&id)
                .cloned()
                .ok_or(CodecError::UnresolvedReference { id })?;
            return Ok(PropertyNode {
                name,
                declared_type,
                value_type: Some(ty),
                body: NodeBody::Reference(ReferenceNode {
                    reference: ReferenceInfo::placeholder(id),
                    target,
                }),
            });
        }

        let Some(ty) = self.reader.attribute_type(ATTR_TYPE)?.or(expected.cloned()) else {
            return Err(CodecError::MissingType { name });
        };

        if kind == NodeKind::Simple {
            let value = self.reader.attribute_value(ATTR_VALUE, &ty)?;
            return Ok(PropertyNode {
                name,
                declared_type,
                value_type: Some(ty),
                body: NodeBody::Simple(value),
            });
        }

        // Register before reading children, they may refer back.
        let id = self.read_id()?;
        let reference = (id > 0).then(|| {
            self.targets.insert(id, (kind, ty.clone()));
            ReferenceInfo::new(id)
        });
        let lower_bound = match kind {
            NodeKind::SingleArray => self.read_i32(ATTR_LOWER_BOUND)?,
            _ => 0,
        };

        let shape = self.classifier.classify(&ty);
        let element_type = shape.element_type();
        let mut properties = Vec::new();
        let mut items = Vec::new();
        let mut entries = Vec::new();
        let mut indexed = Vec::new();
        let mut dimensions = Vec::new();

        self.reader.enter();
        while let Some(group) = self.reader.next_element() {
            match (group.as_str(), kind) {
                (PROPERTIES, _) => self.read_properties(&ty, &mut properties)?,
                (ITEMS, NodeKind::Dictionary) => {
                    self.read_entries(shape.key_type(), shape.value_type(), &mut entries)?;
                }
                (ITEMS, NodeKind::MultiArray) => self.read_indexed(element_type, &mut indexed)?,
                (ITEMS, _) => self.read_items(element_type, &mut items)?,
                (DIMENSIONS, _) => self.read_dimensions(&mut dimensions)?,
                _ => log::trace!("skipping `{group}` in `{name}`"),
            }
        }
        self.reader.leave();

        let element_type = element_type.cloned();
        let body = match kind {
            NodeKind::Collection => NodeBody::Collection(CollectionNode {
                reference,
                properties,
                element_type,
                items,
            }),
            NodeKind::Dictionary => NodeBody::Dictionary(DictionaryNode {
                reference,
                properties,
                key_type: shape.key_type().cloned(),
                value_type: shape.value_type().cloned(),
                items: entries,
            }),
            NodeKind::SingleArray => NodeBody::SingleArray(SingleArrayNode {
                reference,
                element_type,
                lower_bound,
                items,
            }),
            NodeKind::MultiArray => NodeBody::MultiArray(MultiArrayNode {
                reference,
                element_type,
                dimensions,
                items: indexed,
            }),
            _ => NodeBody::Complex(ComplexNode {
                reference,
                properties,
            }),
        };

        Ok(PropertyNode {
            name,
            declared_type,
            value_type: Some(ty),
            body,
        })
    }

    // -------------------------------------------------------------------------
    // Groups

    /// Returns the kind of the current element, which must be a node.
    fn current_kind(&self) -> Result<NodeKind, CodecError> {
        let tag = self.reader.tag();
        node_kind(tag).ok_or_else(|| CodecError::UnknownNodeKind {
            tag: tag.to_string(),
        })
    }

    fn read_properties(
        &mut self,
        owner: &TypePath,
        out: &mut Vec<PropertyNode>,
    ) -> Result<(), CodecError> {
        self.reader.enter();
        while self.reader.next_element().is_some() {
            let kind = self.current_kind()?;
            let Some(name) = self.reader.attribute(ATTR_NAME) else {
                continue;
            };
            let Some(field) = self.accessor.property(owner, name) else {
                log::trace!("`{owner}` has no property `{name}`, skipped");
                continue;
            };
            out.push(self.read_node(kind, Some(field.ty()))?);
        }
        self.reader.leave();
        Ok(())
    }

    fn read_items(
        &mut self,
        expected: Option<&TypePath>,
        out: &mut Vec<PropertyNode>,
    ) -> Result<(), CodecError> {
        self.reader.enter();
        while self.reader.next_element().is_some() {
            let kind = self.current_kind()?;
            out.push(self.read_node(kind, expected)?);
        }
        self.reader.leave();
        Ok(())
    }

    /// Reads one node child of the current element per expected type.
    fn read_children(
        &mut self,
        expected: &[Option<&TypePath>],
    ) -> Result<Vec<PropertyNode>, CodecError> {
        let mut nodes = Vec::with_capacity(expected.len());
        self.reader.enter();
        while nodes.len() < expected.len() {
            if self.reader.next_element().is_none() {
                break;
            }
            let kind = self.current_kind()?;
            nodes.push(self.read_node(kind, expected[nodes.len()])?);
        }
        self.reader.leave();
        // A missing child reads as null.
        nodes.resize_with(expected.len(), || PropertyNode::null(""));
        Ok(nodes)
    }

    fn read_entries(
        &mut self,
        key_type: Option<&TypePath>,
        value_type: Option<&TypePath>,
        out: &mut Vec<(PropertyNode, PropertyNode)>,
    ) -> Result<(), CodecError> {
        self.reader.enter();
        while let Some(tag) = self.reader.next_element() {
            if tag != ITEM {
                continue;
            }
            let mut pair = self.read_children(&[key_type, value_type])?.into_iter();
            if let (Some(key), Some(value)) = (pair.next(), pair.next()) {
                out.push((key, value));
            }
        }
        self.reader.leave();
        Ok(())
    }

    fn read_indexed(
        &mut self,
        expected: Option<&TypePath>,
        out: &mut Vec<(Vec<i32>, PropertyNode)>,
    ) -> Result<(), CodecError> {
        self.reader.enter();
        while let Some(tag) = self.reader.next_element() {
            if tag != ITEM {
                continue;
            }
            let indexes = self.reader.attribute_ints(ATTR_INDEXES)?;
            if let Some(value) = self.read_children(&[expected])?.pop() {
                out.push((indexes, value));
            }
        }
        self.reader.leave();
        Ok(())
    }

    fn read_dimensions(&mut self, out: &mut Vec<Dimension>) -> Result<(), CodecError> {
        self.reader.enter();
        while let Some(tag) = self.reader.next_element() {
            if tag != DIMENSION {
                continue;
            }
            let length = self.reader.attribute_int(ATTR_LENGTH)?;
            let lower_bound = self.read_i32(ATTR_LOWER_BOUND)?;
            let dimension = usize::try_from(length)
                .ok()
                .map(|length| Dimension::new(length, lower_bound))
                .filter(Dimension::is_addressable)
                .ok_or_else(|| invalid(ATTR_LENGTH, length))?;
            out.push(dimension);
        }
        self.reader.leave();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Attributes

    fn read_id(&self) -> Result<u32, CodecError> {
        let id = self.reader.attribute_int(ATTR_ID)?;
        u32::try_from(id).map_err(|_| invalid(ATTR_ID, id))
    }

    fn read_i32(&self, name: &str) -> Result<i32, CodecError> {
        let value = self.reader.attribute_int(name)?;
        i32::try_from(value).map_err(|_| invalid(name, value))
    }
}

fn invalid(name: &str, value: i64) -> CodecError {
    CodecError::InvalidAttribute {
        name: name.to_string(),
        value: value.to_string(),
    }
}
