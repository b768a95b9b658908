//! I/O helpers for headerless raw sample streams and JSON.
//!
//! - `load_raw`: read a flat byte file into a `PixelBuffer` of declared geometry.
//! - `save_raw`: write a buffer's backing samples unchanged.
//! - `save_png_preview`: render a 1- or 3-channel buffer to PNG for inspection.
//! - `write_json_file`: pretty-print a serializable value to disk.
//!
//! Raw streams carry no header: width, height and channel count are caller
//! knowledge and the bytes are passed through untransformed.

use super::PixelBuffer;
use image::{DynamicImage, GrayImage, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Read a flat raw sample file into a buffer of the declared geometry.
pub fn load_raw(path: &Path, w: usize, h: usize, channels: usize) -> Result<PixelBuffer, String> {
    let data =
        fs::read(path).map_err(|e| format!("Failed to read raw file {}: {e}", path.display()))?;
    PixelBuffer::from_raw(w, h, channels, data).map_err(|e| {
        format!(
            "Raw file {} does not match {w}x{h}x{channels}: {e}",
            path.display()
        )
    })
}

/// Write a buffer's backing sample sequence to disk, unchanged.
pub fn save_raw(buffer: &PixelBuffer, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    fs::write(path, &buffer.data)
        .map_err(|e| format!("Failed to write raw file {}: {e}", path.display()))
}

/// Save a grayscale or RGB buffer as a PNG preview.
pub fn save_png_preview(buffer: &PixelBuffer, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let (w, h) = (buffer.w as u32, buffer.h as u32);
    let img = match buffer.channels {
        1 => GrayImage::from_raw(w, h, buffer.data.clone())
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(|| "Failed to create grayscale preview buffer".to_string())?,
        3 => RgbImage::from_raw(w, h, buffer.data.clone())
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| "Failed to create RGB preview buffer".to_string())?,
        c => return Err(format!("Cannot preview a {c}-channel buffer")),
    };
    img.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
