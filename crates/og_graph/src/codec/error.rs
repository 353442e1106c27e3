use alloc::string::String;
use alloc::sync::Arc;

use og_reflect::info::TypePath;
use thiserror::Error;

/// An error that occurs while mapping a property tree to or from elements.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    /// An element where a node is expected has an unknown tag.
    #[error("unknown node element `{tag}`")]
    UnknownNodeKind { tag: String },

    #[error("cannot convert `{text}` to `{ty}`")]
    ValueConversion { ty: TypePath, text: String },

    #[error("element `{tag}` has no `{name}` attribute")]
    MissingAttribute { tag: String, name: String },

    #[error("attribute `{name}` has an invalid value `{value}`")]
    InvalidAttribute { name: String, value: String },

    /// A node names no type and its position expects none.
    #[error("cannot resolve the type of node `{name}`")]
    MissingType { name: Arc<str> },

    #[error("reference to unknown id {id}")]
    UnresolvedReference { id: u32 },

    /// A failure of the underlying format.
    #[error("{0}")]
    Format(String),
}
