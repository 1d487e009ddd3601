//! Bundled native backend.
//!
//! Keeps the whole node tree in memory and persists it as a JSON text
//! container. Used by the command line tool and the tests, and as the
//! default backend of [`NexusFile`](crate::file::NexusFile).

mod backend;
pub mod document;
mod tree;

pub use backend::MemoryBackend;
pub use tree::{Attribute, Dataset, Group, Node};
