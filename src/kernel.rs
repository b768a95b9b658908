//! Normalized square convolution kernels.
//!
//! A kernel is built once per filter invocation and reused for every pixel.
//! Smoothing kernels (box, Gaussian) are rescaled so their weights sum to
//! exactly 1.0; for small Gaussian kernels the rescale also absorbs the
//! discretization error of sampling the continuous bell at integer offsets.

use crate::error::{EnhanceError, Result};

/// Square weight matrix with an odd side length.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// Uniform box kernel: every weight is `1 / size²`.
    pub fn boxcar(size: usize) -> Result<Self> {
        validate_size(size)?;
        let n = size * size;
        Ok(Self {
            size,
            weights: vec![1.0 / n as f64; n],
        })
    }

    /// Sampled 2-D Gaussian `exp(-(dx²+dy²)/2σ²) / 2πσ²`, rescaled to unit sum.
    pub fn gaussian(size: usize, sigma: f64) -> Result<Self> {
        validate_size(size)?;
        if sigma <= 0.0 {
            return Err(EnhanceError::invalid(format!(
                "gaussian sigma must be positive, got {sigma}"
            )));
        }
        let half = (size / 2) as isize;
        let norm = 1.0 / (2.0 * std::f64::consts::PI * sigma * sigma);
        let two_sigma2 = 2.0 * sigma * sigma;

        let mut weights = Vec::with_capacity(size * size);
        let mut sum = 0.0;
        for dy in -half..=half {
            for dx in -half..=half {
                let w = norm * (-((dx * dx + dy * dy) as f64) / two_sigma2).exp();
                weights.push(w);
                sum += w;
            }
        }
        for w in &mut weights {
            *w /= sum;
        }
        Ok(Self { size, weights })
    }

    /// Side length of the square matrix.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Window half-width: offsets run over `-half..=half` on both axes.
    #[inline]
    pub fn half(&self) -> isize {
        (self.size / 2) as isize
    }

    /// Weight at offset `(dx, dy)` from the kernel center.
    #[inline]
    pub fn weight(&self, dx: isize, dy: isize) -> f64 {
        let half = self.half();
        let row = (dy + half) as usize;
        let col = (dx + half) as usize;
        self.weights[row * self.size + col]
    }

    /// All weights in row-major order.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

fn validate_size(size: usize) -> Result<()> {
    if size == 0 || size % 2 == 0 {
        return Err(EnhanceError::invalid(format!(
            "kernel size must be odd and positive, got {size}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_kernel_sums_to_one() {
        for size in [1, 3, 5, 9] {
            let k = Kernel::boxcar(size).unwrap();
            let sum: f64 = k.weights().iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "size {size}: sum {sum}");
        }
    }

    #[test]
    fn gaussian_kernel_sums_to_one() {
        for (size, sigma) in [(3, 0.5), (3, 1.0), (5, 1.5), (7, 3.0)] {
            let k = Kernel::gaussian(size, sigma).unwrap();
            let sum: f64 = k.weights().iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "size {size} sigma {sigma}: {sum}");
        }
    }

    #[test]
    fn gaussian_center_dominates() {
        let k = Kernel::gaussian(5, 1.0).unwrap();
        let center = k.weight(0, 0);
        for dy in -2isize..=2 {
            for dx in -2isize..=2 {
                assert!(k.weight(dx, dy) <= center);
            }
        }
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(matches!(
            Kernel::boxcar(4),
            Err(EnhanceError::InvalidParameter(_))
        ));
        assert!(matches!(
            Kernel::boxcar(0),
            Err(EnhanceError::InvalidParameter(_))
        ));
        assert!(matches!(
            Kernel::gaussian(3, 0.0),
            Err(EnhanceError::InvalidParameter(_))
        ));
        assert!(matches!(
            Kernel::gaussian(3, -1.0),
            Err(EnhanceError::InvalidParameter(_))
        ));
    }
}
