//! Small shared utilities for the `og` crates.
//!
//! - [`hash`]: hash containers with a fixed seed, backed by *hashbrown* and *foldhash*.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId), used for type trait tables.
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
