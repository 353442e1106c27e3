//! The boundary between property trees and element based formats.
//!
//! A format provides an [`ElementWriter`] and an [`ElementReader`], nested
//! elements with string attributes. [`TreeWriter`] and [`TreeReader`] map
//! property trees onto them using the tags and attributes of [`vocabulary`].

// -----------------------------------------------------------------------------
// Modules

mod error;
mod reader;
mod writer;

pub mod vocabulary;

// -----------------------------------------------------------------------------
// Exports

pub use error::CodecError;
pub use reader::TreeReader;
pub use writer::TreeWriter;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use og_reflect::Primitive;
use og_reflect::info::TypePath;

// -----------------------------------------------------------------------------
// ElementWriter

/// The encode direction of a format.
pub trait ElementWriter {
    fn start_element(&mut self, tag: &str) -> Result<(), CodecError>;

    fn end_element(&mut self) -> Result<(), CodecError>;

    fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), CodecError>;

    /// Writes a type name, in the text form the format chooses.
    fn write_type(&mut self, name: &str, ty: &TypePath) -> Result<(), CodecError>;

    /// Writes a simple value, in the text form the format chooses.
    fn write_value(&mut self, name: &str, value: &Primitive) -> Result<(), CodecError>;

    fn write_int(&mut self, name: &str, value: i64) -> Result<(), CodecError> {
        self.write_attribute(name, &value.to_string())
    }

    /// Writes a comma separated list of integers.
    fn write_ints(&mut self, name: &str, values: &[i32]) -> Result<(), CodecError> {
        let text = values
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.write_attribute(name, &text)
    }
}

// -----------------------------------------------------------------------------
// ElementReader

/// The decode direction of a format.
///
/// The reader has a current element. Children are enumerated with a stack
/// discipline: [`enter`](ElementReader::enter) opens the children of the
/// current element, each [`next_element`](ElementReader::next_element) makes
/// the next child current, and [`leave`](ElementReader::leave) makes the
/// entered element current again.
pub trait ElementReader {
    /// Makes the root element current and returns its tag.
    fn read_root(&mut self) -> Result<String, CodecError>;

    /// Returns the tag of the current element.
    fn tag(&self) -> &str;

    fn enter(&mut self);

    /// Moves to the next child of the entered element, `None` once exhausted.
    fn next_element(&mut self) -> Option<String>;

    fn leave(&mut self);

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Reads a type name written by [`ElementWriter::write_type`].
    fn attribute_type(&self, name: &str) -> Result<Option<TypePath>, CodecError>;

    /// Reads a simple value of type `ty` written by [`ElementWriter::write_value`].
    fn attribute_value(&self, name: &str, ty: &TypePath) -> Result<Primitive, CodecError>;

    /// Reads an integer attribute, `0` when absent.
    fn attribute_int(&self, name: &str) -> Result<i64, CodecError> {
        match self.attribute(name) {
            None => Ok(0),
            Some(text) => text.trim().parse().map_err(|_| CodecError::InvalidAttribute {
                name: name.into(),
                value: text.into(),
            }),
        }
    }

    /// Reads a comma separated list of integers, empty when absent.
    fn attribute_ints(&self, name: &str) -> Result<Vec<i32>, CodecError> {
        let Some(text) = self.attribute(name) else {
            return Ok(Vec::new());
        };
        text.split(',')
            .map(|part| {
                part.trim().parse().map_err(|_| CodecError::InvalidAttribute {
                    name: name.into(),
                    value: text.into(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use og_reflect::access::{ExclusionRules, ReflectAccessor};
    use og_reflect::array::{ArrayValue, Dimension};
    use og_reflect::classify::TypeClassifier;
    use og_reflect::info::{TypeInfo, TypePath};
    use og_reflect::registry::TypeRegistry;
    use og_reflect::value::graph_eq;
    use og_reflect::{Object, ObjectBody, ObjectRef, Primitive, Value};

    use super::*;
    use crate::decode::GraphDecoder;
    use crate::encode::GraphEncoder;
    use crate::tree::{NodeKind, PropertyNode};

    /// A minimal in-memory element format.
    #[derive(Debug, Default)]
    struct Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Element>,
    }

    impl Element {
        fn get(&self, name: &str) -> Option<&str> {
            self.attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        }

        fn child(&self, tag: &str) -> Option<&Element> {
            self.children.iter().find(|c| c.tag == tag)
        }
    }

    #[derive(Default)]
    struct MemoryWriter {
        stack: Vec<Element>,
        root: Option<Element>,
    }

    impl ElementWriter for MemoryWriter {
        fn start_element(&mut self, tag: &str) -> Result<(), CodecError> {
            self.stack.push(Element {
                tag: tag.to_string(),
                ..Element::default()
            });
            Ok(())
        }

        fn end_element(&mut self) -> Result<(), CodecError> {
            let element = self
                .stack
                .pop()
                .ok_or_else(|| CodecError::Format("unbalanced end".to_string()))?;
            match self.stack.last_mut() {
                Some(parent) => parent.children.push(element),
                None => self.root = Some(element),
            }
            Ok(())
        }

        fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), CodecError> {
            let element = self
                .stack
                .last_mut()
                .ok_or_else(|| CodecError::Format("attribute outside element".to_string()))?;
            element.attributes.push((name.to_string(), value.to_string()));
            Ok(())
        }

        fn write_type(&mut self, name: &str, ty: &TypePath) -> Result<(), CodecError> {
            self.write_attribute(name, ty.as_str())
        }

        fn write_value(&mut self, name: &str, value: &Primitive) -> Result<(), CodecError> {
            self.write_attribute(name, &value.to_string())
        }
    }

    struct MemoryReader<'a> {
        root: &'a Element,
        current: &'a Element,
        frames: Vec<(&'a Element, usize)>,
    }

    impl<'a> MemoryReader<'a> {
        fn new(root: &'a Element) -> Self {
            Self {
                root,
                current: root,
                frames: Vec::new(),
            }
        }
    }

    impl<'a> ElementReader for MemoryReader<'a> {
        fn read_root(&mut self) -> Result<String, CodecError> {
            self.current = self.root;
            self.frames.clear();
            Ok(self.root.tag.clone())
        }

        fn tag(&self) -> &str {
            &self.current.tag
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
            Some(child.tag.clone())
        }

        fn leave(&mut self) {
            if let Some((parent, _)) = self.frames.pop() {
                self.current = parent;
            }
        }

        fn attribute(&self, name: &str) -> Option<&str> {
            self.current.get(name)
        }

        fn attribute_type(&self, name: &str) -> Result<Option<TypePath>, CodecError> {
            Ok(self.attribute(name).map(TypePath::new))
        }

        fn attribute_value(&self, name: &str, ty: &TypePath) -> Result<Primitive, CodecError> {
            let text = self.attribute(name).ok_or_else(|| CodecError::MissingAttribute {
                tag: self.current.tag.clone(),
                name: name.to_string(),
            })?;
            let conversion = || CodecError::ValueConversion {
                ty: ty.clone(),
                text: text.to_string(),
            };
            match ty.as_str() {
                "i32" => text.parse().map(Primitive::I32).map_err(|_| conversion()),
                "String" => Ok(Primitive::from(text)),
                _ => Err(conversion()),
            }
        }
    }

    fn setup() -> (TypeClassifier, ReflectAccessor) {
        let mut registry = TypeRegistry::new();
        registry.register(
            TypeInfo::record("app::Person")
                .with_field_of("name", "String")
                .with_field_of("friend", "app::Person"),
        );
        registry.register(TypeInfo::record("app::Student").with_base("app::Person"));
        registry.register_list("app::Person");
        registry.register_map("String", "i32");
        let registry = Arc::new(registry);
        (
            TypeClassifier::new(registry.clone()),
            ReflectAccessor::new(registry, ExclusionRules::new()),
        )
    }

    fn write(value: &Value) -> Element {
        let (classifier, accessor) = setup();
        let tree = GraphEncoder::new(&classifier, &accessor)
            .encode("Root", value)
            .unwrap();
        let mut writer = MemoryWriter::default();
        TreeWriter::new(&mut writer).write(&tree).unwrap();
        writer.root.unwrap()
    }

    fn read(root: &Element) -> Result<PropertyNode, CodecError> {
        let (classifier, accessor) = setup();
        let mut reader = MemoryReader::new(root);
        TreeReader::new(&mut reader, &classifier, &accessor).read(None)
    }

    fn round_trip(value: &Value) -> Value {
        let (classifier, accessor) = setup();
        let tree = read(&write(value)).unwrap();
        GraphDecoder::new(&classifier, &accessor)
            .decode(&tree, None)
            .unwrap()
    }

    fn person(name: &str) -> ObjectRef {
        ObjectRef::new(Object::record("app::Person").with_field("name", name))
    }

    #[test]
    fn cycle_layout() {
        let a = person("A");
        let b = person("B");
        a.borrow_mut().set_field("friend", b.clone().into());
        b.borrow_mut().set_field("friend", a.clone().into());

        let root = write(&a.clone().into());
        assert_eq!(root.tag, "Complex");
        assert_eq!(root.get("name"), Some("Root"));
        assert_eq!(root.get("type"), Some("app::Person"));
        assert_eq!(root.get("id"), Some("1"));

        let properties = root.child("Properties").unwrap();
        let b_element = &properties.children[1];
        assert_eq!(b_element.tag, "Complex");
        assert_eq!(b_element.get("type"), None);
        assert_eq!(b_element.get("id"), None);

        let back = &b_element.child("Properties").unwrap().children[1];
        assert_eq!(back.tag, "Reference");
        assert_eq!(back.get("name"), Some("friend"));
        assert_eq!(back.get("id"), Some("1"));

        let copy = round_trip(&a.clone().into());
        assert!(graph_eq(&a.into(), &copy));
    }

    #[test]
    fn derived_types_carry_their_type() {
        let student = ObjectRef::new(Object::record("app::Student").with_field("name", "S"));
        let list = Value::from(Object::new(
            "Vec<app::Person>",
            ObjectBody::Sequence(vec![person("P").into(), student.into()]),
        ));
        let root = write(&list);
        let items = root.child("Items").unwrap();
        assert_eq!(items.children[0].get("type"), None);
        assert_eq!(items.children[1].get("type"), Some("app::Student"));
        assert!(root.child("Properties").is_none());

        assert!(graph_eq(&list, &round_trip(&list)));
    }

    #[test]
    fn arrays_and_dictionaries() {
        let mut grid =
            ArrayValue::new("i32", [Dimension::new(2, 1), Dimension::new(1, 0)]).unwrap();
        grid.set(&[2, 0], Value::from(4_i32)).unwrap();
        let grid = Value::from(Object::new(grid.type_path(), ObjectBody::Array(grid)));
        let root = write(&grid);
        let dimensions = root.child("Dimensions").unwrap();
        assert_eq!(dimensions.children[0].get("lowerBound"), Some("1"));
        assert_eq!(dimensions.children[1].get("lowerBound"), None);
        let items = root.child("Items").unwrap();
        assert_eq!(items.children[1].get("indexes"), Some("2,0"));
        assert!(graph_eq(&grid, &round_trip(&grid)));

        let map = Value::from(Object::new(
            "Map<String, i32>",
            ObjectBody::Map(vec![(Value::from("k"), Value::from(1_i32))]),
        ));
        let root = write(&map);
        let item = &root.child("Items").unwrap().children[0];
        assert_eq!(item.tag, "Item");
        assert_eq!(item.children.len(), 2);
        assert!(graph_eq(&map, &round_trip(&map)));
    }

    #[test]
    fn unknown_properties_are_skipped() {
        let mut root = write(&person("A").into());
        let properties = root.children.iter_mut().find(|c| c.tag == "Properties").unwrap();
        properties.children.push(Element {
            tag: "Complex".to_string(),
            attributes: vec![("name".to_string(), "pet".to_string())],
            children: vec![],
        });
        let tree = read(&root).unwrap();
        assert!(tree.property("pet").is_none());
        assert!(tree.property("name").is_some());
    }

    #[test]
    fn legacy_references() {
        let mut root = write(&person("A").into());
        root.attributes.push(("id".to_string(), "1".to_string()));
        let properties = root.children.iter_mut().find(|c| c.tag == "Properties").unwrap();
        let friend = properties.children.iter_mut().find(|c| c.get("name") == Some("friend"));
        let friend = friend.unwrap();
        friend.tag = "ComplexReference".to_string();
        friend.attributes.push(("id".to_string(), "1".to_string()));

        let tree = read(&root).unwrap();
        let friend = tree.property("friend").unwrap();
        assert_eq!(friend.kind(), NodeKind::Reference);
        assert_eq!(friend.value_type.as_ref().map(TypePath::as_str), Some("app::Person"));
        assert_eq!(tree.reference().unwrap().count, 2);
    }

    #[test]
    fn errors() {
        let bad_root = Element {
            tag: "Widget".to_string(),
            ..Element::default()
        };
        assert!(matches!(read(&bad_root), Err(CodecError::UnknownNodeKind { .. })));

        let untyped = Element {
            tag: "Complex".to_string(),
            ..Element::default()
        };
        assert!(matches!(read(&untyped), Err(CodecError::MissingType { .. })));

        let dangling = Element {
            tag: "Reference".to_string(),
            attributes: vec![("id".to_string(), "9".to_string())],
            children: vec![],
        };
        assert_eq!(read(&dangling), Err(CodecError::UnresolvedReference { id: 9 }));

        let bad_value = Element {
            tag: "Simple".to_string(),
            attributes: vec![
                ("type".to_string(), "i32".to_string()),
                ("value".to_string(), "x".to_string()),
            ],
            children: vec![],
        };
        assert!(matches!(read(&bad_value), Err(CodecError::ValueConversion { .. })));

        let dimension = |length: &str| Element {
            tag: "Dimension".to_string(),
            attributes: vec![("length".to_string(), length.to_string())],
            children: vec![],
        };
        let grid = |length: &str| Element {
            tag: "MultiArray".to_string(),
            attributes: vec![("type".to_string(), "i32[,]".to_string())],
            children: vec![Element {
                tag: "Dimensions".to_string(),
                attributes: vec![],
                children: vec![dimension(length), dimension(length)],
            }],
        };
        assert!(read(&grid("2")).is_ok());
        assert_eq!(
            read(&grid("4294967296")),
            Err(CodecError::InvalidAttribute {
                name: "length".to_string(),
                value: "4294967296".to_string(),
            })
        );
        assert!(matches!(read(&grid("-1")), Err(CodecError::InvalidAttribute { .. })));
    }
}
