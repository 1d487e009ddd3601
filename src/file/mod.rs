//! Handle layer - open files, navigate, read and iterate.
//!
//! - [`NexusFile`] - owning file handle with every binding operation
//! - [`ChildEntry`] / [`AttributeEntry`] - directory cursor results
//! - [`Navigator`] - path-tracking navigation

mod cursor;
mod handle;
mod navigator;

pub use cursor::{AttributeEntry, ChildEntry, CursorState};
pub use handle::NexusFile;
pub use navigator::{resolve_path, Navigator, PathStep, DATA_CLASS};
