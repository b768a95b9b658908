//! Kernel convolution: the box and Gaussian smoothing filters.

use super::fill_rows;
use crate::error::Result;
use crate::image::{BoundaryPolicy, PixelBuffer};
use crate::kernel::Kernel;

/// Apply a precomputed kernel as a weighted sum over the window around each
/// pixel. Channels are filtered independently; out-of-range window
/// coordinates are resolved by `policy` for the whole pass.
pub fn convolve(src: &PixelBuffer, kernel: &Kernel, policy: BoundaryPolicy) -> Result<PixelBuffer> {
    src.ensure_nonempty()?;
    let half = kernel.half();
    let channels = src.channels;

    let dst = fill_rows(src, |y, row| {
        for x in 0..src.w {
            for c in 0..channels {
                let mut acc = 0.0f64;
                for dy in -half..=half {
                    let sy = policy.resolve(y as isize + dy, src.h);
                    for dx in -half..=half {
                        let sx = policy.resolve(x as isize + dx, src.w);
                        acc += kernel.weight(dx, dy) * src.get(sx, sy, c) as f64;
                    }
                }
                // Unit-sum kernels accumulate to 1 - epsilon in floating
                // point; rounding keeps a constant image a fixed point.
                row[x * channels + c] = acc.round().clamp(0.0, 255.0) as u8;
            }
        }
    });
    Ok(dst)
}

/// Uniform-weight smoothing with a `size × size` window.
pub fn box_blur(src: &PixelBuffer, size: usize, policy: BoundaryPolicy) -> Result<PixelBuffer> {
    let kernel = Kernel::boxcar(size)?;
    convolve(src, &kernel, policy)
}

/// Gaussian smoothing with a `size × size` window and standard deviation `sigma`.
pub fn gaussian_blur(
    src: &PixelBuffer,
    size: usize,
    sigma: f64,
    policy: BoundaryPolicy,
) -> Result<PixelBuffer> {
    let kernel = Kernel::gaussian(size, sigma)?;
    convolve(src, &kernel, policy)
}
