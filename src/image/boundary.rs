//! Resolution of window coordinates that fall outside the image extent.

use serde::{Deserialize, Serialize};

/// Rule for mapping an out-of-range coordinate to a valid sample.
///
/// A windowed filter picks one policy for an entire invocation; policies are
/// never mixed within a single pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Saturate to `[0, dim - 1]`.
    #[default]
    Clamp,
    /// Reflect off the edge without repeating the edge sample
    /// (`-i` below zero, `2(dim-1) - i` above), then clamp. Substitutes the
    /// nearest valid neighbor on the opposite side of the missing one.
    Mirror,
}

impl BoundaryPolicy {
    /// Map a possibly out-of-range coordinate into `[0, dim - 1]`.
    ///
    /// `dim` must be non-zero; buffers are guarded against emptiness before
    /// any window loop runs.
    #[inline]
    pub fn resolve(self, coord: isize, dim: usize) -> usize {
        debug_assert!(dim > 0, "boundary resolution requires a non-empty axis");
        let max = (dim - 1) as isize;
        let c = match self {
            BoundaryPolicy::Clamp => coord.clamp(0, max),
            BoundaryPolicy::Mirror => {
                let reflected = if coord < 0 {
                    -coord
                } else if coord > max {
                    2 * max - coord
                } else {
                    coord
                };
                reflected.clamp(0, max)
            }
        };
        c as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_saturates() {
        assert_eq!(BoundaryPolicy::Clamp.resolve(-3, 5), 0);
        assert_eq!(BoundaryPolicy::Clamp.resolve(7, 5), 4);
        assert_eq!(BoundaryPolicy::Clamp.resolve(2, 5), 2);
    }

    #[test]
    fn mirror_reflects_without_repeating_edge() {
        assert_eq!(BoundaryPolicy::Mirror.resolve(-1, 5), 1);
        assert_eq!(BoundaryPolicy::Mirror.resolve(-2, 5), 2);
        assert_eq!(BoundaryPolicy::Mirror.resolve(5, 5), 3);
        assert_eq!(BoundaryPolicy::Mirror.resolve(6, 5), 2);
    }

    #[test]
    fn mirror_on_single_pixel_axis() {
        assert_eq!(BoundaryPolicy::Mirror.resolve(-1, 1), 0);
        assert_eq!(BoundaryPolicy::Mirror.resolve(4, 1), 0);
    }
}
