//! Histogram-based tone mapping on a single channel.
//!
//! Three policies share the `Histogram` and `ToneMap` machinery: global
//! equalization, quantile bucket remapping, and tiled contrast-limited
//! adaptive equalization ([`clahe`]). All of them address one channel of the
//! buffer (the luma channel of a transformed color image, or the sole channel
//! of a grayscale one) and remap it in place through a 256-entry lookup table
//! that is non-decreasing by construction.

pub mod clahe;

pub use clahe::{apply_clahe, ClaheParams};

use crate::error::{EnhanceError, Result};
use crate::image::PixelBuffer;

/// Dense intensity histogram over the fixed `[0, 255]` sample domain.
///
/// The domain never changes, so a flat 256-slot array gives O(1) access with
/// no hashing or allocation per sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    bins: [u32; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    pub fn new() -> Self {
        Self { bins: [0; 256] }
    }

    /// Count every sample of `channel` across the whole buffer.
    pub fn from_channel(buf: &PixelBuffer, channel: usize) -> Result<Self> {
        buf.ensure_nonempty()?;
        buf.ensure_channel(channel)?;
        let mut hist = Self::new();
        for v in buf.channel_iter(channel) {
            hist.bins[v as usize] += 1;
        }
        Ok(hist)
    }

    /// Count `channel` samples inside the half-open pixel rectangle
    /// `[x0, x1) × [y0, y1)`.
    pub(crate) fn from_region(
        buf: &PixelBuffer,
        channel: usize,
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
    ) -> Self {
        let mut hist = Self::new();
        for y in y0..y1 {
            for x in x0..x1 {
                hist.bins[buf.get(x, y, channel) as usize] += 1;
            }
        }
        hist
    }

    #[inline]
    pub fn count(&self, value: u8) -> u32 {
        self.bins[value as usize]
    }

    /// Total number of samples counted.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }

    /// Cap every bin at `limit` and redistribute the excess uniformly:
    /// `excess / 256` to every bin, the remainder to the first
    /// `excess % 256` bins in index order. The total count is conserved.
    pub fn clip(&mut self, limit: u32) {
        let mut excess = 0u64;
        for bin in &mut self.bins {
            if *bin > limit {
                excess += (*bin - limit) as u64;
                *bin = limit;
            }
        }
        let increment = (excess / 256) as u32;
        let mut residual = (excess % 256) as usize;
        for bin in &mut self.bins {
            *bin += increment;
            if residual > 0 {
                *bin += 1;
                residual -= 1;
            }
        }
    }

    /// Running cumulative counts, `cdf[i] = Σ bins[0..=i]`.
    pub(crate) fn cumulative(&self) -> [u64; 256] {
        let mut cdf = [0u64; 256];
        let mut running = 0u64;
        for (i, &count) in self.bins.iter().enumerate() {
            running += count as u64;
            cdf[i] = running;
        }
        cdf
    }
}

/// Monotone 256-entry intensity remapping table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToneMap {
    map: [u8; 256],
}

impl ToneMap {
    /// Global histogram equalization: map each intensity to its cumulative
    /// probability scaled to `[0, 255]` (rounded, capped at 255).
    pub fn equalize(hist: &Histogram) -> Result<Self> {
        let total = hist.total();
        if total == 0 {
            return Err(EnhanceError::invalid(
                "cannot equalize an empty histogram",
            ));
        }
        let cdf = hist.cumulative();
        let mut map = [0u8; 256];
        for (i, slot) in map.iter_mut().enumerate() {
            let scaled = (cdf[i] as f64 / total as f64 * 255.0).round();
            *slot = scaled.min(255.0) as u8;
        }
        Ok(Self { map })
    }

    /// Quantile bucket remapping: walk the bins in intensity order, pouring
    /// counts into equal-size output buckets and advancing the bucket index
    /// (capped at 255) each time one fills. The ideal bucket size
    /// `total / 256` is raised to at least one sample so tiny images cannot
    /// stall the scan.
    pub fn bucket_remap(hist: &Histogram) -> Result<Self> {
        let total = hist.total();
        if total == 0 {
            return Err(EnhanceError::invalid(
                "cannot bucket-remap an empty histogram",
            ));
        }
        let ideal = (total / 256).max(1);
        let mut map = [0u8; 256];
        let mut accumulated = 0u64;
        let mut bucket = 0u32;
        for (i, slot) in map.iter_mut().enumerate() {
            accumulated += hist.count(i as u8) as u64;
            while accumulated >= ideal && bucket < 255 {
                accumulated -= ideal;
                bucket += 1;
            }
            *slot = bucket as u8;
        }
        Ok(Self { map })
    }

    #[inline]
    pub fn lookup(&self, value: u8) -> u8 {
        self.map[value as usize]
    }

    /// Remap one channel of the buffer in place.
    pub fn apply(&self, buf: &mut PixelBuffer, channel: usize) -> Result<()> {
        buf.ensure_channel(channel)?;
        let channels = buf.channels;
        for sample in buf.data.iter_mut().skip(channel).step_by(channels) {
            *sample = self.map[*sample as usize];
        }
        Ok(())
    }

    /// True when `map[i] <= map[i+1]` for every adjacent pair.
    pub fn is_monotone(&self) -> bool {
        self.map.windows(2).all(|pair| pair[0] <= pair[1])
    }
}

/// Equalize one channel of the buffer in place over its global histogram.
pub fn equalize_global(buf: &mut PixelBuffer, channel: usize) -> Result<()> {
    let hist = Histogram::from_channel(buf, channel)?;
    ToneMap::equalize(&hist)?.apply(buf, channel)
}

/// Remap one channel of the buffer in place through quantile buckets.
pub fn bucket_remap(buf: &mut PixelBuffer, channel: usize) -> Result<()> {
    let hist = Histogram::from_channel(buf, channel)?;
    ToneMap::bucket_remap(&hist)?.apply(buf, channel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_histogram() -> Histogram {
        let mut hist = Histogram::new();
        for i in 0..256usize {
            hist.bins[i] = (i % 7) as u32 + 1;
        }
        hist
    }

    #[test]
    fn equalization_map_is_monotone() {
        let map = ToneMap::equalize(&ramp_histogram()).unwrap();
        assert!(map.is_monotone());
        assert_eq!(map.lookup(255), 255);
    }

    #[test]
    fn bucket_remap_is_monotone() {
        let map = ToneMap::bucket_remap(&ramp_histogram()).unwrap();
        assert!(map.is_monotone());
    }

    #[test]
    fn single_bin_absorbs_full_probability() {
        // 4x4 buffer of constant 100: cdf[100] == 1.0, so everything maps
        // to 255.
        let mut buf = PixelBuffer::from_raw(4, 4, 1, vec![100; 16]).unwrap();
        equalize_global(&mut buf, 0).unwrap();
        assert!(buf.data.iter().all(|&v| v == 255));
    }

    #[test]
    fn clipping_conserves_the_total_count() {
        let mut hist = ramp_histogram();
        let before = hist.total();
        let excess: u64 = hist.bins.iter().map(|&b| u64::from(b.saturating_sub(3))).sum();
        hist.clip(3);
        assert_eq!(hist.total(), before);
        // Each bin receives at most the uniform share plus one residual count
        // on top of the cap.
        let share = (excess / 256) as u32;
        assert!(hist.bins.iter().all(|&b| b <= 3 + share + 1));
    }

    #[test]
    fn clip_with_high_limit_is_a_no_op() {
        let mut hist = ramp_histogram();
        let original = hist.clone();
        hist.clip(1_000_000);
        assert_eq!(hist, original);
    }

    #[test]
    fn equalizing_only_touches_the_selected_channel() {
        let mut buf = PixelBuffer::new(2, 2, 3);
        for px in buf.data.chunks_exact_mut(3) {
            px[0] = 100;
            px[1] = 55;
            px[2] = 200;
        }
        equalize_global(&mut buf, 0).unwrap();
        assert!(buf.channel_iter(0).all(|v| v == 255));
        assert!(buf.channel_iter(1).all(|v| v == 55));
        assert!(buf.channel_iter(2).all(|v| v == 200));
    }

    #[test]
    fn empty_histogram_is_rejected() {
        let hist = Histogram::new();
        assert!(ToneMap::equalize(&hist).is_err());
        assert!(ToneMap::bucket_remap(&hist).is_err());
    }

    #[test]
    fn out_of_range_channel_is_rejected() {
        let mut buf = PixelBuffer::new(2, 2, 1);
        assert!(matches!(
            equalize_global(&mut buf, 1),
            Err(EnhanceError::InvalidParameter(_))
        ));
    }
}
