//! Runtime type model for object graph serialization.
//!
//! Rust has no runtime reflection, so graphs handled by the `og` crates are
//! expressed with a small dynamic object model:
//!
//! - [`info`]: static description of a type, [`TypePath`](info::TypePath),
//!   [`TypeInfo`](info::TypeInfo), [`FieldInfo`](info::FieldInfo) and
//!   [`CustomAttributes`](info::CustomAttributes).
//! - [`registry`]: the [`TypeRegistry`](registry::TypeRegistry) storing a
//!   [`TypeMeta`](registry::TypeMeta) per type, each with a table of type traits
//!   (construction, append, keyed insert).
//! - [`value`]: [`Value`](value::Value), [`Object`](value::Object) and the shared
//!   handle [`ObjectRef`](value::ObjectRef) whose address is the instance identity.
//! - [`array`]: rectangular arrays with lower bounds and the row-major
//!   [`ArrayIndexer`](array::ArrayIndexer).
//! - [`classify`]: the [`TypeClassifier`](classify::TypeClassifier) deciding how a
//!   type is walked.
//! - [`access`]: named property access with exclusion rules.
//!
//! # Examples
//!
//! ```
//! use og_reflect::classify::{Shape, TypeClassifier};
//! use og_reflect::info::TypeInfo;
//! use og_reflect::registry::TypeRegistry;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(TypeInfo::record("app::Person").with_field_of("name", "String"));
//! let list = registry.register_list("app::Person");
//!
//! let classifier = TypeClassifier::new(registry.into());
//! assert_eq!(classifier.classify(&"app::Person".into()).shape(), Shape::Complex);
//! assert_eq!(classifier.classify(&list).shape(), Shape::Collection);
//! assert_eq!(classifier.classify(&"i32[,]".into()).rank(), 2);
//! ```
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// Lock-guarded caches need `std::sync`.
extern crate std;

// -----------------------------------------------------------------------------
// Modules

pub mod access;
pub mod array;
pub mod classify;
pub mod info;
pub mod registry;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use value::{Object, ObjectBody, ObjectId, ObjectRef, Primitive, Value};
