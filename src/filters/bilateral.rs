//! Joint spatial/intensity weighted filter: edge-preserving smoothing.
//!
//! Each neighbor's weight is the product of two zero-mean Gaussians, one over
//! spatial distance and one over intensity difference. Neither factor carries
//! a normalization constant; the output divides by the accumulated weight sum,
//! which is strictly positive because the center pixel always contributes
//! `1 · 1`.

use serde::{Deserialize, Serialize};

use super::fill_rows;
use crate::error::{EnhanceError, Result};
use crate::image::{BoundaryPolicy, PixelBuffer};

/// Parameters for one bilateral pass.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BilateralParams {
    /// Window side length, odd and positive.
    pub size: usize,
    /// Standard deviation of the intensity-difference Gaussian.
    pub sigma_color: f64,
    /// Standard deviation of the spatial-distance Gaussian.
    pub sigma_space: f64,
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self {
            size: 5,
            sigma_color: 20.0,
            sigma_space: 10.0,
        }
    }
}

impl BilateralParams {
    fn validate(&self) -> Result<()> {
        if self.size == 0 || self.size % 2 == 0 {
            return Err(EnhanceError::invalid(format!(
                "bilateral window size must be odd and positive, got {}",
                self.size
            )));
        }
        if self.sigma_color <= 0.0 || self.sigma_space <= 0.0 {
            return Err(EnhanceError::invalid(format!(
                "bilateral sigmas must be positive, got color={} space={}",
                self.sigma_color, self.sigma_space
            )));
        }
        Ok(())
    }
}

/// One edge-preserving smoothing pass over every channel independently.
pub fn bilateral(src: &PixelBuffer, params: &BilateralParams) -> Result<PixelBuffer> {
    params.validate()?;
    src.ensure_nonempty()?;

    let half = (params.size / 2) as isize;
    let two_sigma_color2 = 2.0 * params.sigma_color * params.sigma_color;
    let two_sigma_space2 = 2.0 * params.sigma_space * params.sigma_space;

    // Spatial weights depend only on the offset; build them once per call.
    let mut space_weights = Vec::with_capacity(params.size * params.size);
    for dy in -half..=half {
        for dx in -half..=half {
            let d2 = (dx * dx + dy * dy) as f64;
            space_weights.push((-d2 / two_sigma_space2).exp());
        }
    }

    let size = params.size;
    let channels = src.channels;
    let policy = BoundaryPolicy::Clamp;

    let dst = fill_rows(src, |y, row| {
        for x in 0..src.w {
            for c in 0..channels {
                let center = src.get(x, y, c) as f64;
                let mut weight_sum = 0.0f64;
                let mut value_sum = 0.0f64;

                for dy in -half..=half {
                    let sy = policy.resolve(y as isize + dy, src.h);
                    for dx in -half..=half {
                        let sx = policy.resolve(x as isize + dx, src.w);
                        let neighbor = src.get(sx, sy, c) as f64;
                        let diff = center - neighbor;
                        let range = (-(diff * diff) / two_sigma_color2).exp();
                        let spatial =
                            space_weights[((dy + half) * size as isize + dx + half) as usize];
                        let w = spatial * range;
                        weight_sum += w;
                        value_sum += neighbor * w;
                    }
                }

                // The quotient is an average of integer samples; rounding
                // keeps accumulated floating-point error from dropping a
                // code value.
                row[x * channels + c] = (value_sum / weight_sum).round().clamp(0.0, 255.0) as u8;
            }
        }
    });
    Ok(dst)
}

/// Apply the bilateral filter `iterations` times; every iteration reads the
/// previous iteration's complete output as its source.
pub fn bilateral_iterated(
    src: &PixelBuffer,
    params: &BilateralParams,
    iterations: usize,
) -> Result<PixelBuffer> {
    if iterations == 0 {
        return Err(EnhanceError::invalid(
            "bilateral iteration count must be at least 1",
        ));
    }
    let mut current = bilateral(src, params)?;
    for _ in 1..iterations {
        current = bilateral(&current, params)?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_image_is_unchanged() {
        // The normalized average carries floating-point error just under the
        // exact value; every level must survive the quantization unchanged.
        for value in [1u8, 90, 130, 254] {
            let src = PixelBuffer::from_raw(4, 4, 1, vec![value; 16]).unwrap();
            let out = bilateral(&src, &BilateralParams::default()).unwrap();
            assert_eq!(out.data, src.data, "constant {value} drifted");
        }
    }

    #[test]
    fn step_edge_is_preserved_better_than_gaussian() {
        // Left half 20, right half 220. A bilateral pass with a narrow color
        // sigma should keep the halves close to their original levels.
        let mut src = PixelBuffer::new(8, 4, 1);
        for y in 0..4 {
            for x in 0..8 {
                src.set(x, y, 0, if x < 4 { 20 } else { 220 });
            }
        }
        let params = BilateralParams {
            size: 3,
            sigma_color: 5.0,
            sigma_space: 2.0,
        };
        let out = bilateral(&src, &params).unwrap();
        for y in 0..4 {
            assert!(out.get(0, y, 0) < 30, "dark side drifted");
            assert!(out.get(7, y, 0) > 210, "bright side drifted");
        }
    }

    #[test]
    fn iterated_matches_manual_reapplication() {
        let mut src = PixelBuffer::new(5, 5, 1);
        for (i, v) in src.data.iter_mut().enumerate() {
            *v = ((i * 37) % 251) as u8;
        }
        let params = BilateralParams::default();
        let twice = bilateral_iterated(&src, &params, 2).unwrap();
        let manual = bilateral(&bilateral(&src, &params).unwrap(), &params).unwrap();
        assert_eq!(twice.data, manual.data);
    }

    #[test]
    fn zero_iterations_is_invalid() {
        let src = PixelBuffer::new(2, 2, 1);
        assert!(matches!(
            bilateral_iterated(&src, &BilateralParams::default(), 0),
            Err(EnhanceError::InvalidParameter(_))
        ));
    }

    #[test]
    fn boundary_pixels_stay_in_range_on_tiny_images() {
        for (w, h) in [(1, 1), (3, 3)] {
            let src = PixelBuffer::from_raw(w, h, 1, vec![200; w * h]).unwrap();
            let out = bilateral(&src, &BilateralParams::default()).unwrap();
            assert_eq!(out.data.len(), w * h);
            assert!(out.data.iter().all(|&v| v == 200));
        }
    }
}
