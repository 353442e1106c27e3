use alloc::string::String;
use alloc::vec::Vec;

use og_graph::codec::{CodecError, ElementReader};
use og_reflect::Primitive;
use og_reflect::info::TypePath;

use crate::convert::{SimpleValueConverter, TypeNameConverter};
use crate::document::Element;

// -----------------------------------------------------------------------------
// XmlReader

/// Reads an [`Element`] tree through [`ElementReader`].
///
/// Each frame holds an entered element and the index of its next child.
pub struct XmlReader<'a> {
    types: &'a TypeNameConverter,
    values: &'a dyn SimpleValueConverter,
    root: &'a Element,
    current: &'a Element,
    frames: Vec<(&'a Element, usize)>,
}

impl<'a> XmlReader<'a> {
    pub fn new(
        root: &'a Element,
        types: &'a TypeNameConverter,
        values: &'a dyn SimpleValueConverter,
    ) -> Self {
        Self {
            types,
            values,
            root,
            current: root,
            frames: Vec::new(),
        }
    }
}

impl<'a> ElementReader for XmlReader<'a> {
    fn read_root(&mut self) -> Result<String, CodecError> {
        self.current = self.root;
        self.frames.clear();
        Ok(self.root.name.clone())
    }

    #[inline]
    fn tag(&self) -> &str {
        &self.current.name
    }

    fn enter(&mut self) {
        self.frames.push((self.current, 0));
    }

    fn next_element(&mut self) -> Option<String> {
        let frame = self.frames.last_mut()?;
        let parent: &'a Element = frame.0;
        let child = parent.children.get(frame.1)?;
        frame.1 += 1;
        self.current = child;
        Some(child.name.clone())
    }

    fn leave(&mut self) {
        if let Some((parent, _)) = self.frames.pop() {
            self.current = parent;
        }
    }

    #[inline]
    fn attribute(&self, name: &str) -> Option<&str> {
        self.current.attribute(name)
    }

    fn attribute_type(&self, name: &str) -> Result<Option<TypePath>, CodecError> {
        Ok(self
            .attribute(name)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(|text| self.types.name_to_type(text)))
    }

    fn attribute_value(&self, name: &str, ty: &TypePath) -> Result<Primitive, CodecError> {
        let text = self
            .attribute(name)
            .ok_or_else(|| CodecError::MissingAttribute {
                tag: self.current.name.clone(),
                name: name.into(),
            })?;
        self.values.from_text(text, ty)
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use og_graph::codec::{CodecError, ElementReader};
    use og_reflect::Primitive;
    use og_reflect::info::{TypeInfo, TypePath};
    use og_reflect::registry::TypeRegistry;

    use super::XmlReader;
    use crate::convert::{DefaultValueConverter, TypeNameConverter, TypeNameStyle};
    use crate::document::Element;

    #[test]
    fn walks_children_in_order() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeInfo::record("app::Person"));
        let registry = Arc::new(registry);
        let types = TypeNameConverter::new(registry.clone(), TypeNameStyle::Full);
        let values = DefaultValueConverter::new(registry);

        let root = Element::parse(
            r#"<Collection type="Person"><Items><Simple value="3"/><Simple/></Items><Null/></Collection>"#,
        )
        .unwrap();
        let mut reader = XmlReader::new(&root, &types, &values);
        assert_eq!(reader.read_root().unwrap(), "Collection");
        assert_eq!(
            reader.attribute_type("type").unwrap(),
            Some(TypePath::new("app::Person"))
        );

        reader.enter();
        assert_eq!(reader.next_element().as_deref(), Some("Items"));
        reader.enter();
        assert_eq!(reader.next_element().as_deref(), Some("Simple"));
        assert_eq!(
            reader.attribute_value("value", &"i32".into()),
            Ok(Primitive::I32(3))
        );
        assert_eq!(reader.next_element().as_deref(), Some("Simple"));
        assert_eq!(
            reader.attribute_value("value", &"i32".into()),
            Err(CodecError::MissingAttribute {
                tag: "Simple".into(),
                name: "value".into(),
            })
        );
        assert_eq!(reader.next_element(), None);
        reader.leave();
        assert_eq!(reader.tag(), "Items");
        assert_eq!(reader.next_element().as_deref(), Some("Null"));
        assert_eq!(reader.next_element(), None);
        reader.leave();
        assert_eq!(reader.tag(), "Collection");
        assert_eq!(reader.attribute_type("missing").unwrap(), None);
    }
}
