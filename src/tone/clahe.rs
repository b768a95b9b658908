//! Tiled contrast-limited adaptive histogram equalization.
//!
//! The channel is partitioned into a grid of non-overlapping tiles; each tile
//! gets its own histogram, optional clip/redistribute step, and tone map,
//! applied only to the pixels physically inside that tile. There is no
//! blending between adjacent tiles' maps, so tile borders can show
//! discontinuities.

use serde::{Deserialize, Serialize};

use super::Histogram;
use crate::error::{EnhanceError, Result};
use crate::image::PixelBuffer;

/// Parameters for one CLAHE invocation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ClaheParams {
    /// Number of tiles along the horizontal axis.
    pub tiles_x: usize,
    /// Number of tiles along the vertical axis.
    pub tiles_y: usize,
    /// Per-bin count cap; 0 disables clipping entirely.
    pub clip_limit: u32,
    /// Channel to equalize (luma, or the sole grayscale channel).
    #[serde(default)]
    pub channel: usize,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            tiles_x: 4,
            tiles_y: 4,
            clip_limit: 20,
            channel: 0,
        }
    }
}

/// Equalize `params.channel` tile by tile, in place.
///
/// The nominal tile size is `dim / tile count` (integer division); when the
/// division leaves a remainder, the trailing rows/columns form smaller edge
/// tiles of their own.
pub fn apply_clahe(buf: &mut PixelBuffer, params: &ClaheParams) -> Result<()> {
    buf.ensure_nonempty()?;
    buf.ensure_channel(params.channel)?;

    if params.tiles_x == 0 || params.tiles_y == 0 {
        return Err(EnhanceError::invalid("tile counts must be at least 1"));
    }
    let tile_w = buf.w / params.tiles_x;
    let tile_h = buf.h / params.tiles_y;
    if tile_w == 0 || tile_h == 0 {
        return Err(EnhanceError::invalid(format!(
            "{}x{} tiles do not partition a {}x{} image into whole pixels",
            params.tiles_x, params.tiles_y, buf.w, buf.h
        )));
    }

    let mut y0 = 0;
    while y0 < buf.h {
        let y1 = (y0 + tile_h).min(buf.h);
        let mut x0 = 0;
        while x0 < buf.w {
            let x1 = (x0 + tile_w).min(buf.w);
            equalize_tile(buf, params, x0, y0, x1, y1)?;
            x0 = x1;
        }
        y0 = y1;
    }
    Ok(())
}

fn equalize_tile(
    buf: &mut PixelBuffer,
    params: &ClaheParams,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
) -> Result<()> {
    let mut hist = Histogram::from_region(buf, params.channel, x0, y0, x1, y1);
    if params.clip_limit > 0 {
        hist.clip(params.clip_limit);
    }

    let cdf = hist.cumulative();
    let total = cdf[255];
    if total == 0 {
        return Err(EnhanceError::invalid(format!(
            "tile at ({x0}, {y0}) holds no samples"
        )));
    }

    // Integer normalization, truncating: cdf · 255 / total.
    let mut map = [0u8; 256];
    for (slot, &c) in map.iter_mut().zip(cdf.iter()) {
        *slot = (c * 255 / total) as u8;
    }

    for y in y0..y1 {
        for x in x0..x1 {
            let v = buf.get(x, y, params.channel);
            buf.set(x, y, params.channel, map[v as usize]);
        }
    }
    Ok(())
}
