//! XML format for object graph serialization.
//!
//! - [`document`]: a small element tree with parsing and indented output,
//!   backed by `quick-xml`.
//! - [`convert`]: text forms of type names and simple values.
//! - [`writer`] and [`reader`]: the element boundary of `og_graph` over
//!   [`Element`](document::Element).
//! - [`settings`]: [`SerializerSettings`], loadable from RON.
//! - [`serializer`]: the [`Serializer`] facade, value graph to text and back.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use og_reflect::info::TypeInfo;
//! use og_reflect::registry::TypeRegistry;
//! use og_reflect::value::graph_eq;
//! use og_reflect::{Object, ObjectRef, Value};
//! use og_xml::Serializer;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     TypeInfo::record("app::Person")
//!         .with_field_of("name", "String")
//!         .with_field_of("friend", "app::Person"),
//! );
//!
//! let ann = ObjectRef::new(Object::record("app::Person").with_field("name", "Ann"));
//! ann.borrow_mut().set_field("friend", ann.clone().into());
//! let value = Value::from(ann);
//!
//! let serializer = Serializer::new(Arc::new(registry));
//! let text = serializer.serialize_to_string(&value).unwrap();
//! assert!(text.contains(r#"<Reference name="friend" id="1"/>"#));
//!
//! let copy = serializer.deserialize_str(&text).unwrap();
//! assert!(graph_eq(&value, &copy));
//! ```
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// Files, streams and the serializer lock need `std`.
extern crate std;

// -----------------------------------------------------------------------------
// Modules

pub mod convert;
pub mod document;
pub mod reader;
pub mod serializer;
pub mod settings;
pub mod writer;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use convert::{DefaultValueConverter, SimpleValueConverter, TypeNameConverter, TypeNameStyle};
pub use document::Element;
pub use serializer::{DeserializeCause, DeserializeError, SerializeError, Serializer};
pub use settings::{SerializerSettings, SettingsError};
