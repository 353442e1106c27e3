//! Provide named property access.
//!
//! - [`PropertyAccessor`]: The property collaborator used by graph walks.
//! - [`ReflectAccessor`]: Registry-backed implementation with a per-type cache.
//! - [`ExclusionRules`]: Ignored properties and attributes.
//! - [`AccessError`]: Missing properties, kind mismatches, bounds failures.

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod error;
mod rules;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::{PropertyAccessor, ReflectAccessor};
pub use error::AccessError;
pub use rules::ExclusionRules;
