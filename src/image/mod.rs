//! Image buffers published to the registry and produced by capture backends.
//!
//! - Buffer allocation via [`ImageBuffer::new`] and [`ImageBuffer::like`]
//! - Geometry and pixel layout via [`ImageSize`], [`Depth`] and [`Origin`]
//! - Simple conversions used by the demo pipeline ([`to_grayscale_into`], [`threshold_into`])

mod buffer;
mod convert;

pub use buffer::{Depth, ImageBuffer, ImageError, ImageSize, Origin};
pub use convert::{threshold_into, to_grayscale_into};
