//! Provide the type registry.
//!
//! ## Menu
//!
//! - [`TypeTrait`]: A trait representing a capability supported by a type.
//! - [`TypeMeta`]: A container including a [`TypeInfo`] and a [`TypeTrait`] table.
//! - [`TypeRegistry`]: A container for storaging and querying `TypeMeta`s by path or short name.
//! - TypeTraits:
//!     - [`TypeTraitDefault`]: Creates a default instance.
//!     - [`TypeTraitAppend`]: Appends an item to a collection.
//!     - [`TypeTraitInsert`]: Inserts a key-value pair into a dictionary.
//!
//! [`TypeInfo`]: crate::info::TypeInfo

// -----------------------------------------------------------------------------
// Modules

mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use traits::{TypeTraitAppend, TypeTraitDefault, TypeTraitInsert};
pub use type_meta::TypeMeta;
pub use type_registry::TypeRegistry;
pub use type_trait::TypeTrait;
