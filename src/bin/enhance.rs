use raster_enhance::image::io::{load_raw, save_png_preview, save_raw, write_json_file};
use raster_enhance::metrics;
use raster_enhance::{Pipeline, PixelBuffer};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct EnhanceToolConfig {
    pub input: RawInputConfig,
    #[serde(default)]
    pub pipeline: Pipeline,
    pub output: OutputConfig,
    /// Optional reference raw image (same geometry) to score the result against.
    #[serde(default)]
    pub reference: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct RawInputConfig {
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
    #[serde(default = "default_channels")]
    pub channels: usize,
}

fn default_channels() -> usize {
    1
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub raw: PathBuf,
    #[serde(default)]
    pub preview_png: Option<PathBuf>,
    #[serde(default)]
    pub metrics_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<EnhanceToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let input = load_raw(
        &config.input.path,
        config.input.width,
        config.input.height,
        config.input.channels,
    )?;

    let enhanced = config
        .pipeline
        .run(&input)
        .map_err(|e| format!("Pipeline failed: {e}"))?;

    save_raw(&enhanced, &config.output.raw)?;
    println!(
        "Saved enhanced image to {} ({}x{}x{})",
        config.output.raw.display(),
        enhanced.w,
        enhanced.h,
        enhanced.channels
    );

    if let Some(preview) = &config.output.preview_png {
        save_png_preview(&enhanced, preview)?;
        println!("Saved preview to {}", preview.display());
    }

    if let Some(reference_path) = &config.reference {
        let reference = load_raw(
            reference_path,
            enhanced.w,
            enhanced.h,
            enhanced.channels,
        )?;
        let report = score(&reference, &enhanced)
            .map_err(|e| format!("Metric computation failed: {e}"))?;
        println!(
            "vs {}: mse={:.3} psnr={:.2} dB",
            reference_path.display(),
            report.mse,
            report.psnr_db
        );
        if let Some(metrics_path) = &config.output.metrics_json {
            write_json_file(metrics_path, &report)?;
            println!("Saved metrics to {}", metrics_path.display());
        }
    }

    Ok(())
}

fn score(
    reference: &PixelBuffer,
    enhanced: &PixelBuffer,
) -> raster_enhance::Result<QualityReport> {
    Ok(QualityReport {
        width: enhanced.w,
        height: enhanced.h,
        channels: enhanced.channels,
        mse: metrics::mse(reference, enhanced)?,
        psnr_db: metrics::psnr(reference, enhanced)?,
    })
}

fn usage() -> String {
    "Usage: enhance <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QualityReport {
    width: usize,
    height: usize,
    channels: usize,
    mse: f64,
    psnr_db: f64,
}
