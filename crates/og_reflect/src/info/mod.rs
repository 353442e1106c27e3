//! Provide runtime type infomation.
//!
//! ## Menu
//!
//! - [`TypePath`]: A cheap to clone type name, the unique identifier of a type in a registry.
//!     - [`short_name`](TypePath::short_name): The name without module paths, may be duplicated.
//!     - [`array_element`](TypePath::array_element): Element type and rank of array syntax (`T[]`, `T[,]`).
//!
//! - [`TypeFlags`]: Capability flags (`SIMPLE`, `ITERABLE`, `ORDERED`, `KEYED`).
//!
//! - [`TypeInfo`]: Path, flags, base type, generic arguments, fields, enum variants and attributes.
//!
//! - [`FieldInfo`]: A named field, including its declared type, optionality and attributes.
//!
//! - [`CustomAttributes`]: Named marker attributes, for example
//!   [`EXCLUDE_FROM_SERIALIZATION`].

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod field_info;
mod type_info;
mod type_path;

// -----------------------------------------------------------------------------
// Exports

pub use attributes::{CustomAttributes, EXCLUDE_FROM_SERIALIZATION};
pub use field_info::FieldInfo;
pub use type_info::{TypeFlags, TypeInfo};
pub use type_path::TypePath;
