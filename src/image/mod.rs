//! Pixel buffer representation and boundary handling.

mod boundary;
mod buffer;
pub mod io;

pub use boundary::BoundaryPolicy;
pub use buffer::PixelBuffer;
