//! Utility types shared by every layer.
//!
//! - [`ElementType`] - the nine element type tags
//! - [`Dimensions`] - array shapes
//! - [`Error`] / [`Result`] - error handling

mod element_type;
mod error;
mod dimensions;

pub use element_type::*;
pub use error::*;
pub use dimensions::*;
