use alloc::string::String;
use alloc::sync::Arc;

use og_reflect::access::AccessError;
use og_reflect::array::BoundsError;
use og_reflect::info::TypePath;
use thiserror::Error;

use crate::tree::NodeKind;

/// An error that occurs while turning a value graph into a property tree.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EncodeError {
    /// The value does not match the shape of its type.
    #[error("cannot encode an instance of `{ty}`: {reason}")]
    InvalidOperation { ty: TypePath, reason: String },
    #[error(transparent)]
    Access(#[from] AccessError),
    /// The instance at `name` is mutably borrowed elsewhere.
    #[error("the instance at `{name}` is mutably borrowed")]
    Borrowed { name: Arc<str> },
}

/// An error that occurs while rebuilding a value graph from a property tree.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("no way to create an instance of `{ty}`")]
    InstanceCreation { ty: TypePath },
    /// Neither the node nor its position names a type.
    #[error("cannot resolve the type of node `{name}`")]
    TypeResolution { name: Arc<str> },
    #[error("a `{kind}` node cannot be decoded as `{ty}`")]
    UnknownNodeKind { kind: NodeKind, ty: TypePath },
    #[error("reference to unknown id {id}")]
    UnresolvedReference { id: u32 },
    /// Strict mode only, the container has no way to receive items.
    #[error("`{ty}` cannot receive items")]
    UnsupportedContainer { ty: TypePath },
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Bounds(#[from] BoundsError),
}
