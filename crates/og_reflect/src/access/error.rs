use alloc::sync::Arc;

use thiserror::Error;

use crate::array::BoundsError;
use crate::info::TypePath;

// -----------------------------------------------------------------------------
// AccessError

/// An error returned by a [`PropertyAccessor`](crate::access::PropertyAccessor)
/// or by a type trait mutating an instance.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum AccessError {
    #[error("Type `{ty}` has no property `{name}`")]
    MissingProperty { ty: TypePath, name: Arc<str> },

    #[error("Property `{ty}.{name}` expects `{expected}`, found `{found}`")]
    KindMismatch {
        ty: TypePath,
        name: Arc<str>,
        expected: TypePath,
        found: TypePath,
    },

    #[error("Expected a {expected} instance, found a {found}")]
    BodyMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Bounds(#[from] BoundsError),
}
