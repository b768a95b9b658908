//! Fidelity metrics between two buffers.

use crate::error::{EnhanceError, Result};
use crate::image::PixelBuffer;

/// Mean squared error between two equal-length sample sequences.
///
/// The squared differences are summed over every sample but averaged over the
/// declared `width * height` of `a`, so for multi-channel buffers the
/// per-pixel channel errors accumulate into one pixel term. Callers are
/// responsible for the declared geometry matching the intended denominator.
pub fn mse(a: &PixelBuffer, b: &PixelBuffer) -> Result<f64> {
    a.ensure_nonempty()?;
    if a.data.len() != b.data.len() {
        return Err(EnhanceError::SizeMismatch {
            expected: a.data.len(),
            actual: b.data.len(),
        });
    }
    let sum: f64 = a
        .data
        .iter()
        .zip(b.data.iter())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum();
    Ok(sum / a.pixel_count() as f64)
}

/// Peak signal-to-noise ratio in decibels; `+∞` for bit-identical buffers.
pub fn psnr(a: &PixelBuffer, b: &PixelBuffer) -> Result<f64> {
    let mse = mse(a, b)?;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (255.0 * 255.0 / mse).log10())
}

/// Number of pixels whose difference is significant: any channel differing by
/// more than `threshold`. Useful as a coarse regression check for
/// reconstruction algorithms where exact equality is too strict.
pub fn significant_diff_count(a: &PixelBuffer, b: &PixelBuffer, threshold: u8) -> Result<usize> {
    a.ensure_nonempty()?;
    if a.data.len() != b.data.len() {
        return Err(EnhanceError::SizeMismatch {
            expected: a.data.len(),
            actual: b.data.len(),
        });
    }
    let count = a
        .data
        .chunks(a.channels)
        .zip(b.data.chunks(a.channels))
        .filter(|(pa, pb)| {
            pa.iter()
                .zip(pb.iter())
                .any(|(&x, &y)| x.abs_diff(y) > threshold)
        })
        .count();
    Ok(count)
}
