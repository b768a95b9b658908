//! Windowed spatial filters over interleaved 8-bit buffers.
//!
//! Every filter reads an immutable source buffer and fills a distinct
//! destination, so per-pixel computations only depend on the source and can
//! be evaluated in any order. The row driver below exploits that: with the
//! `parallel` feature enabled, destination rows are partitioned across rayon
//! workers, each writing a disjoint row range.

mod bilateral;
mod convolve;
mod median;
mod nlm;

pub use bilateral::{bilateral, bilateral_iterated, BilateralParams};
pub use convolve::{box_blur, convolve, gaussian_blur};
pub use median::median_filter;
pub use nlm::{non_local_means, NlmParams};

use crate::image::PixelBuffer;

/// Fill a destination buffer shaped like `src`, one row at a time.
///
/// The callback receives the row index and the destination row slice
/// (`w * channels` samples).
#[cfg(not(feature = "parallel"))]
pub(crate) fn fill_rows<F>(src: &PixelBuffer, f: F) -> PixelBuffer
where
    F: Fn(usize, &mut [u8]) + Sync + Send,
{
    let mut dst = src.same_shape();
    let row_len = src.row_len();
    for (y, row) in dst.data.chunks_mut(row_len).enumerate() {
        f(y, row);
    }
    dst
}

/// Row-parallel variant: disjoint destination rows, shared immutable source.
#[cfg(feature = "parallel")]
pub(crate) fn fill_rows<F>(src: &PixelBuffer, f: F) -> PixelBuffer
where
    F: Fn(usize, &mut [u8]) + Sync + Send,
{
    use rayon::prelude::*;

    let mut dst = src.same_shape();
    let row_len = src.row_len();
    dst.data
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
    dst
}
