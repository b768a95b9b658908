//! Fixed-coefficient RGB ↔ luma/chroma transforms.
//!
//! ITU-style studio-range weighting on the forward path: luma is biased by
//! +16, the two chroma channels by +128. Every output is clamped to
//! `[0, 255]` and then truncated, never rounded. The inverse applies
//! full-range coefficients without rescaling luma, so the pair is lossy even
//! for in-gamut colors; both halves of that contract are fixed.

use crate::error::{EnhanceError, Result};
use crate::image::PixelBuffer;

/// Index of the luma channel in a transformed buffer.
pub const LUMA_CHANNEL: usize = 0;

#[inline]
fn quantize(v: f64) -> u8 {
    // `as` truncates toward zero after the clamp; callers rely on
    // truncation, not rounding.
    v.clamp(0.0, 255.0) as u8
}

/// Convert an RGB buffer to luma/chroma, channel order `[Y, Cb, Cr]`.
pub fn rgb_to_luma_chroma(src: &PixelBuffer) -> Result<PixelBuffer> {
    ensure_rgb(src)?;
    let mut out = src.same_shape();
    for (rgb, yuv) in src.data.chunks_exact(3).zip(out.data.chunks_exact_mut(3)) {
        let (r, g, b) = (rgb[0] as f64, rgb[1] as f64, rgb[2] as f64);
        yuv[0] = quantize(0.257 * r + 0.504 * g + 0.098 * b + 16.0);
        yuv[1] = quantize(-0.148 * r - 0.291 * g + 0.439 * b + 128.0);
        yuv[2] = quantize(0.439 * r - 0.368 * g - 0.071 * b + 128.0);
    }
    Ok(out)
}

/// Convert a luma/chroma buffer back to RGB. Lossy inverse of
/// [`rgb_to_luma_chroma`]: truncation error does not cancel.
pub fn luma_chroma_to_rgb(src: &PixelBuffer) -> Result<PixelBuffer> {
    ensure_rgb(src)?;
    let mut out = src.same_shape();
    for (yuv, rgb) in src.data.chunks_exact(3).zip(out.data.chunks_exact_mut(3)) {
        let y = yuv[0] as f64;
        let cb = yuv[1] as f64 - 128.0;
        let cr = yuv[2] as f64 - 128.0;
        rgb[0] = quantize(y + 1.13983 * cr);
        rgb[1] = quantize(y - 0.39465 * cb - 0.58060 * cr);
        rgb[2] = quantize(y + 2.03211 * cb);
    }
    Ok(out)
}

fn ensure_rgb(buf: &PixelBuffer) -> Result<()> {
    buf.ensure_nonempty()?;
    if buf.channels != 3 {
        return Err(EnhanceError::invalid(format!(
            "color transform expects 3 channels, got {}",
            buf.channels
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_pixel(r: u8, g: u8, b: u8) -> PixelBuffer {
        PixelBuffer::from_raw(1, 1, 3, vec![r, g, b]).unwrap()
    }

    #[test]
    fn neutral_gray_has_centered_chroma() {
        let yuv = rgb_to_luma_chroma(&single_pixel(128, 128, 128)).unwrap();
        // 0.859 * 128 + 16 = 125.9, truncated.
        assert_eq!(yuv.data[0], 125);
        assert_eq!(yuv.data[1], 128);
        assert_eq!(yuv.data[2], 128);
    }

    #[test]
    fn near_gray_round_trip_is_close() {
        // The inverse does not rescale luma, so only low-chroma colors come
        // back near their originals. Saturated colors drift much further.
        for &(r, g, b) in &[(128u8, 128u8, 128u8), (120, 128, 135), (60, 64, 58)] {
            let yuv = rgb_to_luma_chroma(&single_pixel(r, g, b)).unwrap();
            let back = luma_chroma_to_rgb(&yuv).unwrap();
            for (orig, got) in [r, g, b].iter().zip(back.data.iter()) {
                let err = (*orig as i16 - *got as i16).abs();
                assert!(err <= 16, "({r},{g},{b}) came back with error {err}");
            }
        }
    }

    #[test]
    fn saturated_values_clamp_instead_of_wrapping() {
        // Pure blue drives Cb far above center; the inverse then pushes the
        // blue channel past 255 and must clamp.
        let yuv = rgb_to_luma_chroma(&single_pixel(0, 0, 255)).unwrap();
        let back = luma_chroma_to_rgb(&yuv).unwrap();
        assert!(back.data.iter().all(|&v| v <= 255));
        assert!(back.data[2] > 200);
    }

    #[test]
    fn grayscale_buffer_is_rejected() {
        let gray = PixelBuffer::new(2, 2, 1);
        assert!(matches!(
            rgb_to_luma_chroma(&gray),
            Err(EnhanceError::InvalidParameter(_))
        ));
    }
}
