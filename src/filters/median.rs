//! Per-channel rank-order filter.

use super::fill_rows;
use crate::error::{EnhanceError, Result};
use crate::image::{BoundaryPolicy, PixelBuffer};

/// Replace every sample with the median of its `size × size` neighborhood
/// (boundary-clamped), per channel independently.
///
/// The output is `sorted[(len - 1) / 2]`: the exact middle for the odd-sized
/// windows produced here, and the lower-middle element should a caller ever
/// feed an even-length collection through the same rule.
pub fn median_filter(src: &PixelBuffer, size: usize) -> Result<PixelBuffer> {
    if size == 0 || size % 2 == 0 {
        return Err(EnhanceError::invalid(format!(
            "median window size must be odd and positive, got {size}"
        )));
    }
    src.ensure_nonempty()?;

    let half = (size / 2) as isize;
    let channels = src.channels;
    let policy = BoundaryPolicy::Clamp;
    let window_len = size * size;

    let dst = fill_rows(src, |y, row| {
        let mut neighborhood = vec![0u8; window_len];
        for x in 0..src.w {
            for c in 0..channels {
                let mut n = 0;
                for dy in -half..=half {
                    let sy = policy.resolve(y as isize + dy, src.h);
                    for dx in -half..=half {
                        let sx = policy.resolve(x as isize + dx, src.w);
                        neighborhood[n] = src.get(sx, sy, c);
                        n += 1;
                    }
                }
                neighborhood.sort_unstable();
                row[x * channels + c] = neighborhood[(window_len - 1) / 2];
            }
        }
    });
    Ok(dst)
}
