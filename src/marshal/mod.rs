//! Marshalling between raw typed buffers and decoded values.
//!
//! - [`decode`] - [`TypedBuffer`](crate::core::TypedBuffer) to [`Value`]
//! - [`encode`] - [`Value`] to [`TypedBuffer`](crate::core::TypedBuffer)
//! - [`ResultKind`] - the `f` / `i` / `p` decoding target selector

mod decode;
mod encode;
mod value;

pub use decode::{decode, decode_scalar};
pub use encode::encode;
pub use value::{ResultKind, Value};
