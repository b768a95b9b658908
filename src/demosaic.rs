//! Bilinear reconstruction of RGB from a single-channel color-filter mosaic.
//!
//! The mosaic follows a fixed 2×2 repeating pattern:
//!
//! ```text
//! R G R G ...
//! G B G B ...
//! ```
//!
//! Red sits at (even row, even column), blue at (odd, odd), green everywhere
//! else. The native color at each site is copied; the two missing channels
//! are the mean of the in-bounds same-color neighbors, diagonal for the
//! channel diagonal to the site and axis-aligned otherwise. A site with no
//! in-bounds same-color neighbor yields 0. At the leftmost column the missing
//! horizontal neighbor degenerates to the single rightward one.
//!
//! Odd-dimensioned mosaics are accepted but the bottom/right edge sites then
//! see truncated neighbor sets; no padding policy is applied.

use crate::error::{EnhanceError, Result};
use crate::image::PixelBuffer;

const RED: usize = 0;
const GREEN: usize = 1;
const BLUE: usize = 2;

const AXIS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(isize, isize); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
const HORIZONTAL: [(isize, isize); 2] = [(-1, 0), (1, 0)];
const VERTICAL: [(isize, isize); 2] = [(0, -1), (0, 1)];

/// Reconstruct a 3-channel RGB buffer from a single-channel mosaic.
pub fn demosaic_bilinear(mosaic: &PixelBuffer) -> Result<PixelBuffer> {
    if mosaic.channels != 1 {
        return Err(EnhanceError::invalid(format!(
            "demosaicing expects a single-channel mosaic, got {} channels",
            mosaic.channels
        )));
    }
    mosaic.ensure_nonempty()?;

    let mut out = PixelBuffer::new(mosaic.w, mosaic.h, 3);
    for y in 0..mosaic.h {
        for x in 0..mosaic.w {
            let native = mosaic.get(x, y, 0);
            let (r, g, b) = match (y % 2, x % 2) {
                (0, 0) => (
                    native,
                    mean_of(mosaic, x, y, &AXIS),
                    mean_of(mosaic, x, y, &DIAGONAL),
                ),
                (1, 1) => (
                    mean_of(mosaic, x, y, &DIAGONAL),
                    mean_of(mosaic, x, y, &AXIS),
                    native,
                ),
                // Green on a red row: red neighbors sit left/right, blue above/below.
                (0, _) => (
                    mean_of(mosaic, x, y, &HORIZONTAL),
                    native,
                    mean_of(mosaic, x, y, &VERTICAL),
                ),
                // Green on a blue row: the roles swap.
                _ => (
                    mean_of(mosaic, x, y, &VERTICAL),
                    native,
                    mean_of(mosaic, x, y, &HORIZONTAL),
                ),
            };
            out.set(x, y, RED, r);
            out.set(x, y, GREEN, g);
            out.set(x, y, BLUE, b);
        }
    }
    Ok(out)
}

/// Mean of the in-bounds neighbors at the given offsets; 0 when none exists.
fn mean_of(mosaic: &PixelBuffer, x: usize, y: usize, offsets: &[(isize, isize)]) -> u8 {
    let mut sum = 0u32;
    let mut count = 0u32;
    for &(dx, dy) in offsets {
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if nx >= 0 && (nx as usize) < mosaic.w && ny >= 0 && (ny as usize) < mosaic.h {
            sum += mosaic.get(nx as usize, ny as usize, 0) as u32;
            count += 1;
        }
    }
    if count > 0 {
        (sum / count) as u8
    } else {
        0
    }
}
