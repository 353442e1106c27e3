//! Object graphs as property trees.
//!
//! - [`tree`]: the format independent [`PropertyNode`](tree::PropertyNode) tree.
//! - [`encode`]: [`GraphEncoder`](encode::GraphEncoder), value graph to tree,
//!   with identity based reference detection.
//! - [`decode`]: [`GraphDecoder`](decode::GraphDecoder), tree to value graph,
//!   resolving references and refilling containers.
//! - [`codec`]: the element boundary formats implement, and the tree mapping
//!   onto it.
//!
//! Encoders and decoders are built per call and consumed by it, their
//! identity caches never outlive one graph.
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod codec;
pub mod decode;
pub mod encode;
pub mod error;
pub mod tree;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use decode::GraphDecoder;
pub use encode::GraphEncoder;
pub use error::{DecodeError, EncodeError};
pub use tree::{NodeKind, PropertyNode};
