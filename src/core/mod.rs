//! Core layer - native library seam and the values that cross it.
//!
//! - [`NapiBackend`] - handle-based native primitives
//! - [`TypedBuffer`] - raw typed element storage
//! - [`AccessMode`] - file open modes
//! - [`NodeLink`] - cross-reference identifiers

mod access;
mod backend;
mod buffer;
mod link;

pub use access::AccessMode;
pub use backend::{DataInfo, NapiBackend, NxResult, NxStatus, RawAttr, RawEntry};
pub use buffer::{NxElement, TypedBuffer};
pub use link::{LinkKind, NodeLink};
