#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use og_graph as graph;
pub use og_reflect as reflect;
pub use og_utils as utils;
pub use og_xml as xml;

pub use og_xml::{Serializer, SerializerSettings};
