//! # sns-napi
//!
//! Bindings over the handle-based NeXus API (NAPI): open a container
//! file, navigate its groups and datasets, and read arrays, slabs and
//! attributes as decoded values.
//!
//! ## Modules
//!
//! - [`util`] - Element types, shapes and errors
//! - [`core`] - Native library seam ([`NapiBackend`](core::NapiBackend)) and typed buffers
//! - [`marshal`] - Decoding raw buffers into values and the reverse
//! - [`file`] - File handle, directory cursors and path navigation
//! - [`mem`] - Bundled in-memory backend with a JSON text container
//!
//! ## Example
//!
//! ```ignore
//! use sns_napi::prelude::*;
//!
//! let mut file = NexusFile::<MemoryBackend>::open("sample.json", AccessMode::Read)?;
//! let name = file.get_attr("name")?;
//!
//! file.open_path("/entry/counts")?;
//! let counts = file.get_data(ResultKind::Boxed)?;
//! let first_row = file.get_slab(&[0, 0], &[1, 3], ResultKind::Int)?;
//! file.close()?;
//! ```

pub mod util;
pub mod core;
pub mod marshal;
pub mod file;
pub mod mem;

// Python bindings (optional, enabled with "python" feature)
#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use util::{type_to_string, Dimensions, ElementType, Error, ErrorKind, Result};
pub use file::{Navigator, NexusFile};
pub use marshal::{ResultKind, Value};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{type_to_string, Dimensions, ElementType, Error, ErrorKind, Result};
    pub use crate::core::{AccessMode, LinkKind, NapiBackend, NodeLink, TypedBuffer};
    pub use crate::marshal::{decode, encode, ResultKind, Value};
    pub use crate::file::{AttributeEntry, ChildEntry, Navigator, NexusFile};
    pub use crate::mem::{Attribute, Dataset, Group, MemoryBackend};
}
