//! Non-local means: patch-similarity weighted averaging over a search window.
//!
//! The most expensive filter in the crate; cost grows with
//! `width · height · window area · patch area`. The patch-distance helper is
//! kept as a separate function so a faster implementation (incremental SSD
//! caching across neighboring offsets) can replace it without changing the
//! observable output.

use serde::{Deserialize, Serialize};

use super::fill_rows;
use crate::error::{EnhanceError, Result};
use crate::image::{BoundaryPolicy, PixelBuffer};

/// Parameters for a non-local means pass.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct NlmParams {
    /// Half-size of the similarity patch; a patch spans `(2r+1)²` samples.
    pub patch_radius: usize,
    /// Half-size of the search window around each pixel.
    pub window_radius: usize,
    /// Decay constant: larger `h` tolerates larger patch distances.
    pub h: f64,
    /// Standard deviation of the Gaussian prior over window offsets.
    pub sigma: f64,
}

impl Default for NlmParams {
    fn default() -> Self {
        Self {
            patch_radius: 2,
            window_radius: 5,
            h: 16.0,
            sigma: 10.0,
        }
    }
}

impl NlmParams {
    fn validate(&self) -> Result<()> {
        if self.h <= 0.0 {
            return Err(EnhanceError::invalid(format!(
                "nlm decay constant must be positive, got {}",
                self.h
            )));
        }
        if self.sigma <= 0.0 {
            return Err(EnhanceError::invalid(format!(
                "nlm window sigma must be positive, got {}",
                self.sigma
            )));
        }
        Ok(())
    }
}

/// Sum of squared differences between the patches centered at `(px, py)` and
/// `(qx, qy)` in channel `c`. Both patches clamp to the image extent.
fn patch_distance(
    src: &PixelBuffer,
    c: usize,
    px: isize,
    py: isize,
    qx: isize,
    qy: isize,
    radius: isize,
) -> f64 {
    let policy = BoundaryPolicy::Clamp;
    let mut ssd = 0.0f64;
    for dy in -radius..=radius {
        let ry = policy.resolve(py + dy, src.h);
        let wy = policy.resolve(qy + dy, src.h);
        for dx in -radius..=radius {
            let rx = policy.resolve(px + dx, src.w);
            let wx = policy.resolve(qx + dx, src.w);
            let diff = src.get(rx, ry, c) as f64 - src.get(wx, wy, c) as f64;
            ssd += diff * diff;
        }
    }
    ssd
}

/// Denoise by averaging every search-window sample, weighted by how similar
/// its surrounding patch is to the patch around the pixel being written.
pub fn non_local_means(src: &PixelBuffer, params: &NlmParams) -> Result<PixelBuffer> {
    params.validate()?;
    src.ensure_nonempty()?;

    let patch_r = params.patch_radius as isize;
    let window_r = params.window_radius as isize;
    let h2 = params.h * params.h;
    let window_side = 2 * params.window_radius + 1;

    // Gaussian prior over the window offset, normalized as a 1-D bell over
    // the Euclidean offset distance.
    let prior_norm = 1.0 / ((2.0 * std::f64::consts::PI).sqrt() * params.sigma);
    let two_sigma2 = 2.0 * params.sigma * params.sigma;
    let mut prior = Vec::with_capacity(window_side * window_side);
    for wy in -window_r..=window_r {
        for wx in -window_r..=window_r {
            let d2 = (wx * wx + wy * wy) as f64;
            prior.push(prior_norm * (-d2 / two_sigma2).exp());
        }
    }

    let channels = src.channels;
    let policy = BoundaryPolicy::Clamp;

    let dst = fill_rows(src, |y, row| {
        for x in 0..src.w {
            for c in 0..channels {
                let mut weight_sum = 0.0f64;
                let mut value_sum = 0.0f64;

                for wy in -window_r..=window_r {
                    for wx in -window_r..=window_r {
                        let ssd = patch_distance(
                            src,
                            c,
                            x as isize,
                            y as isize,
                            x as isize + wx,
                            y as isize + wy,
                            patch_r,
                        );
                        let prior_w = prior
                            [((wy + window_r) * window_side as isize + wx + window_r) as usize];
                        let w = (-ssd / h2).exp() * prior_w;

                        let qx = policy.resolve(x as isize + wx, src.w);
                        let qy = policy.resolve(y as isize + wy, src.h);
                        weight_sum += w;
                        value_sum += w * src.get(qx, qy, c) as f64;
                    }
                }

                // Average of integer samples; round before the cast so
                // floating-point error cannot drop a code value.
                row[x * channels + c] = (value_sum / weight_sum).round().clamp(0.0, 255.0) as u8;
            }
        }
    });
    Ok(dst)
}
