use raster_enhance::PixelBuffer;

/// Generates a constant single-channel buffer.
pub fn constant_gray(width: usize, height: usize, value: u8) -> PixelBuffer {
    PixelBuffer::from_raw(width, height, 1, vec![value; width * height])
        .expect("geometry matches data")
}

/// Generates a horizontal luminance ramp compressed into `[low, high]`.
pub fn low_contrast_ramp_rgb(width: usize, height: usize, low: u8, high: u8) -> PixelBuffer {
    assert!(width > 1, "ramp needs at least two columns");
    let span = (high - low) as usize;
    let mut img = PixelBuffer::new(width, height, 3);
    for y in 0..height {
        for x in 0..width {
            let v = low + (x * span / (width - 1)) as u8;
            img.set(x, y, 0, v);
            img.set(x, y, 1, v);
            img.set(x, y, 2, v);
        }
    }
    img
}

/// Scatters isolated full-white impulses over a copy of `clean`. Impulse
/// sites are spaced so no two share a 3x3 neighborhood.
pub fn with_impulse_noise(clean: &PixelBuffer, stride: usize) -> PixelBuffer {
    assert!(stride >= 3, "impulses must not share a median window");
    let mut noisy = clean.clone();
    let mut y = 2;
    while y + 2 < noisy.h {
        let mut x = 2;
        while x + 2 < noisy.w {
            for c in 0..noisy.channels {
                noisy.set(x, y, c, 255);
            }
            x += stride;
        }
        y += stride;
    }
    noisy
}
