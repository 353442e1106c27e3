use alloc::string::ToString;
use alloc::vec::Vec;

use og_graph::codec::{CodecError, ElementWriter};
use og_reflect::Primitive;
use og_reflect::info::TypePath;

use crate::convert::{SimpleValueConverter, TypeNameConverter};
use crate::document::Element;

// -----------------------------------------------------------------------------
// XmlWriter

/// Builds an [`Element`] tree through [`ElementWriter`].
///
/// Type names and simple values are written through the given converters.
pub struct XmlWriter<'a> {
    types: &'a TypeNameConverter,
    values: &'a dyn SimpleValueConverter,
    stack: Vec<Element>,
    root: Option<Element>,
}

impl<'a> XmlWriter<'a> {
    pub fn new(types: &'a TypeNameConverter, values: &'a dyn SimpleValueConverter) -> Self {
        Self {
            types,
            values,
            stack: Vec::new(),
            root: None,
        }
    }

    /// Returns the written root element.
    pub fn into_document(self) -> Result<Element, CodecError> {
        if let Some(open) = self.stack.last() {
            return Err(CodecError::Format(alloc::format!(
                "element `{}` is not closed",
                open.name
            )));
        }
        self.root
            .ok_or_else(|| CodecError::Format("nothing was written".to_string()))
    }

    fn current(&mut self) -> Result<&mut Element, CodecError> {
        self.stack
            .last_mut()
            .ok_or_else(|| CodecError::Format("attribute outside of an element".to_string()))
    }
}

impl ElementWriter for XmlWriter<'_> {
    fn start_element(&mut self, tag: &str) -> Result<(), CodecError> {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(CodecError::Format("more than one root element".to_string()));
        }
        self.stack.push(Element::new(tag));
        Ok(())
    }

    fn end_element(&mut self) -> Result<(), CodecError> {
        let element = self
            .stack
            .pop()
            .ok_or_else(|| CodecError::Format("unbalanced end of element".to_string()))?;
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => self.root = Some(element),
        }
        Ok(())
    }

    fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), CodecError> {
        self.current()?
            .attributes
            .push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn write_type(&mut self, name: &str, ty: &TypePath) -> Result<(), CodecError> {
        let text = self.types.type_to_name(ty);
        self.write_attribute(name, &text)
    }

    fn write_value(&mut self, name: &str, value: &Primitive) -> Result<(), CodecError> {
        let text = self.values.to_text(value);
        self.write_attribute(name, &text)
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use og_graph::codec::{CodecError, ElementWriter};
    use og_reflect::Primitive;
    use og_reflect::info::TypeInfo;
    use og_reflect::registry::TypeRegistry;

    use super::XmlWriter;
    use crate::convert::{DefaultValueConverter, TypeNameConverter, TypeNameStyle};

    #[test]
    fn builds_nested_elements() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeInfo::record("app::Person"));
        let registry = Arc::new(registry);
        let types = TypeNameConverter::new(registry.clone(), TypeNameStyle::Short);
        let values = DefaultValueConverter::new(registry);

        let mut writer = XmlWriter::new(&types, &values);
        writer.start_element("Complex").unwrap();
        writer.write_type("type", &"app::Person".into()).unwrap();
        writer.start_element("Simple").unwrap();
        writer.write_value("value", &Primitive::Bool(true)).unwrap();
        writer.end_element().unwrap();
        writer.end_element().unwrap();
        assert!(matches!(
            writer.start_element("Complex"),
            Err(CodecError::Format(_))
        ));

        let root = writer.into_document().unwrap();
        assert_eq!(root.attribute("type"), Some("Person"));
        assert_eq!(root.children[0].attribute("value"), Some("true"));
    }

    #[test]
    fn unbalanced_writes() {
        let registry = Arc::new(TypeRegistry::new());
        let types = TypeNameConverter::new(registry.clone(), TypeNameStyle::Full);
        let values = DefaultValueConverter::new(registry);

        let mut writer = XmlWriter::new(&types, &values);
        assert!(writer.write_attribute("name", "x").is_err());
        assert!(writer.end_element().is_err());
        writer.start_element("Null").unwrap();
        assert!(writer.into_document().is_err());
        assert!(XmlWriter::new(&types, &values).into_document().is_err());
    }
}
