use og_reflect::array::Dimension;

use crate::codec::vocabulary::*;
use crate::codec::{CodecError, ElementWriter};
use crate::tree::{NodeBody, PropertyNode, ReferenceInfo};

// -----------------------------------------------------------------------------
// TreeWriter

/// Writes a property tree through an [`ElementWriter`].
///
/// - `type` is written only when the runtime type differs from the declared type.
/// - `id` is written only for instances held by more than one position.
/// - `lowerBound` and `length` are written only when non-zero.
/// - a `Properties` group is written only when there are properties.
pub struct TreeWriter<'a, W: ElementWriter + ?Sized> {
    writer: &'a mut W,
}

impl<'a, W: ElementWriter + ?Sized> TreeWriter<'a, W> {
    #[inline]
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }

    pub fn write(&mut self, node: &PropertyNode) -> Result<(), CodecError> {
        let tag = node_tag(node.kind());
        self.writer.start_element(tag)?;
        if !node.name.is_empty() {
            self.writer.write_attribute(ATTR_NAME, &node.name)?;
        }

        match &node.body {
            NodeBody::Null => {}
            NodeBody::Simple(value) => {
                self.write_type(node)?;
                self.writer.write_value(ATTR_VALUE, value)?;
            }
            NodeBody::Reference(reference) => {
                self.writer
                    .write_int(ATTR_ID, i64::from(reference.reference.id))?;
            }
            NodeBody::Complex(complex) => {
                self.write_header(node, complex.reference)?;
                self.write_properties(&complex.properties)?;
            }
            NodeBody::Collection(collection) => {
                self.write_header(node, collection.reference)?;
                self.write_properties(&collection.properties)?;
                self.write_items(&collection.items)?;
            }
            NodeBody::Dictionary(dictionary) => {
                self.write_header(node, dictionary.reference)?;
                self.write_properties(&dictionary.properties)?;
                self.writer.start_element(ITEMS)?;
                for (key, value) in &dictionary.items {
                    self.writer.start_element(ITEM)?;
                    self.write(key)?;
                    self.write(value)?;
                    self.writer.end_element()?;
                }
                self.writer.end_element()?;
            }
            NodeBody::SingleArray(array) => {
                self.write_header(node, array.reference)?;
                if array.lower_bound != 0 {
                    self.writer
                        .write_int(ATTR_LOWER_BOUND, i64::from(array.lower_bound))?;
                }
                self.write_items(&array.items)?;
            }
            NodeBody::MultiArray(array) => {
                self.write_header(node, array.reference)?;
                self.write_dimensions(&array.dimensions)?;
                self.writer.start_element(ITEMS)?;
                for (indexes, item) in &array.items {
                    self.writer.start_element(ITEM)?;
                    self.writer.write_ints(ATTR_INDEXES, indexes)?;
                    self.write(item)?;
                    self.writer.end_element()?;
                }
                self.writer.end_element()?;
            }
        }

        self.writer.end_element()
    }

    fn write_type(&mut self, node: &PropertyNode) -> Result<(), CodecError> {
        match &node.value_type {
            Some(ty) if node.declared_type.as_ref() != Some(ty) => {
                self.writer.write_type(ATTR_TYPE, ty)
            }
            _ => Ok(()),
        }
    }

    fn write_header(
        &mut self,
        node: &PropertyNode,
        reference: Option<ReferenceInfo>,
    ) -> Result<(), CodecError> {
        self.write_type(node)?;
        match reference {
            Some(info) if info.is_shared() => self.writer.write_int(ATTR_ID, i64::from(info.id)),
            _ => Ok(()),
        }
    }

    fn write_properties(&mut self, properties: &[PropertyNode]) -> Result<(), CodecError> {
        if properties.is_empty() {
            return Ok(());
        }
        self.writer.start_element(PROPERTIES)?;
        for property in properties {
            self.write(property)?;
        }
        self.writer.end_element()
    }

    fn write_items(&mut self, items: &[PropertyNode]) -> Result<(), CodecError> {
        self.writer.start_element(ITEMS)?;
        for item in items {
            self.write(item)?;
        }
        self.writer.end_element()
    }

    fn write_dimensions(&mut self, dimensions: &[Dimension]) -> Result<(), CodecError> {
        self.writer.start_element(DIMENSIONS)?;
        for dimension in dimensions {
            self.writer.start_element(DIMENSION)?;
            if dimension.length != 0 {
                let length = i64::try_from(dimension.length).map_err(|_| {
                    CodecError::InvalidAttribute {
                        name: ATTR_LENGTH.into(),
                        value: alloc::format!("{}", dimension.length),
                    }
                })?;
                self.writer.write_int(ATTR_LENGTH, length)?;
            }
            if dimension.lower_bound != 0 {
                self.writer
                    .write_int(ATTR_LOWER_BOUND, i64::from(dimension.lower_bound))?;
            }
            self.writer.end_element()?;
        }
        self.writer.end_element()
    }
}
