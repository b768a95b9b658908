//! Owned interleaved 8-bit pixel buffer in row-major layout.
//!
//! The shared data model for every filter in the crate. Samples are stored
//! channel-interleaved (`RGBRGB...` for 3 channels), one byte per sample.
//! Filters read from one buffer and write to a distinct one; nothing in this
//! crate mutates a buffer while a pass is still reading it.

use serde::{Deserialize, Serialize};

use crate::error::{EnhanceError, Result};

/// Owned raster buffer: `width × height` pixels, `channels` samples each.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBuffer {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Samples per pixel (1 for grayscale/mosaic, 3 for RGB or luma/chroma)
    pub channels: usize,
    /// Backing storage, length `w * h * channels`
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Construct a zero-filled buffer of size `w × h` with `channels` samples per pixel.
    pub fn new(w: usize, h: usize, channels: usize) -> Self {
        Self {
            w,
            h,
            channels,
            data: vec![0u8; w * h * channels],
        }
    }

    /// Wrap an existing flat sample sequence, checking its length against the
    /// declared geometry.
    pub fn from_raw(w: usize, h: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        let expected = w * h * channels;
        if data.len() != expected {
            return Err(EnhanceError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            w,
            h,
            channels,
            data,
        })
    }

    /// A zero-filled buffer with the same geometry as `self`.
    pub fn same_shape(&self) -> Self {
        Self::new(self.w, self.h, self.channels)
    }

    #[inline]
    /// Convert (x, y, channel) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize, c: usize) -> usize {
        (y * self.w + x) * self.channels + c
    }

    #[inline]
    /// Sample at (x, y) in channel `c`.
    pub fn get(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[self.idx(x, y, c)]
    }

    #[inline]
    /// Overwrite the sample at (x, y) in channel `c`.
    pub fn set(&mut self, x: usize, y: usize, c: usize, v: u8) {
        let i = self.idx(x, y, c);
        self.data[i] = v;
    }

    /// Number of pixels (not samples).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.w * self.h
    }

    /// Number of samples between consecutive rows.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.w * self.channels
    }

    /// Row `y` as a sample slice.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.row_len();
        &self.data[start..start + self.row_len()]
    }

    /// True when the buffer holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate one channel in pixel order.
    pub fn channel_iter(&self, c: usize) -> impl Iterator<Item = u8> + '_ {
        self.data
            .iter()
            .skip(c)
            .step_by(self.channels)
            .copied()
    }

    /// Guard used by every filter before a pass starts.
    pub(crate) fn ensure_nonempty(&self) -> Result<()> {
        if self.is_empty() {
            Err(EnhanceError::EmptySource)
        } else {
            Ok(())
        }
    }

    /// Guard for operations addressing a single channel.
    pub(crate) fn ensure_channel(&self, c: usize) -> Result<()> {
        if c >= self.channels {
            Err(EnhanceError::invalid(format!(
                "channel {c} out of range for {}-channel buffer",
                self.channels
            )))
        } else {
            Ok(())
        }
    }
}
