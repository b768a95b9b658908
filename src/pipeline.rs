//! Composition of enhancement stages into a single recipe.
//!
//! A `Pipeline` is an ordered list of [`Stage`]s, each consuming the previous
//! stage's output. Stages deserialize from JSON (tagged by `op`), so a whole
//! recipe can live in a config file next to the input geometry.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::{luma_chroma_to_rgb, rgb_to_luma_chroma};
use crate::demosaic::demosaic_bilinear;
use crate::error::{EnhanceError, Result};
use crate::filters::{
    bilateral_iterated, box_blur, gaussian_blur, median_filter, non_local_means, BilateralParams,
    NlmParams,
};
use crate::image::{BoundaryPolicy, PixelBuffer};
use crate::tone::{apply_clahe, bucket_remap, equalize_global, ClaheParams};

fn default_iterations() -> usize {
    1
}

/// One enhancement step.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Stage {
    /// Uniform-weight smoothing.
    BoxBlur { size: usize },
    /// Gaussian smoothing.
    GaussianBlur { size: usize, sigma: f64 },
    /// Edge-preserving smoothing, optionally iterated.
    Bilateral {
        #[serde(flatten)]
        params: BilateralParams,
        #[serde(default = "default_iterations")]
        iterations: usize,
    },
    /// Patch-similarity denoising.
    NonLocalMeans {
        #[serde(flatten)]
        params: NlmParams,
    },
    /// Rank-order denoising.
    Median { size: usize },
    /// CFA mosaic to RGB reconstruction.
    Demosaic,
    /// RGB to luma/chroma.
    RgbToLumaChroma,
    /// Luma/chroma back to RGB.
    LumaChromaToRgb,
    /// Global histogram equalization of one channel.
    EqualizeGlobal {
        #[serde(default)]
        channel: usize,
    },
    /// Quantile bucket remapping of one channel.
    BucketRemap {
        #[serde(default)]
        channel: usize,
    },
    /// Tiled contrast-limited adaptive equalization.
    Clahe {
        #[serde(flatten)]
        params: ClaheParams,
    },
    /// Painterly recipe: median, iterated bilateral, blend against a
    /// Gaussian blur of the stage input.
    Watercolor {
        #[serde(default)]
        params: WatercolorParams,
    },
}

impl Stage {
    /// Short name for logs.
    fn name(&self) -> &'static str {
        match self {
            Stage::BoxBlur { .. } => "box_blur",
            Stage::GaussianBlur { .. } => "gaussian_blur",
            Stage::Bilateral { .. } => "bilateral",
            Stage::NonLocalMeans { .. } => "non_local_means",
            Stage::Median { .. } => "median",
            Stage::Demosaic => "demosaic",
            Stage::RgbToLumaChroma => "rgb_to_luma_chroma",
            Stage::LumaChromaToRgb => "luma_chroma_to_rgb",
            Stage::EqualizeGlobal { .. } => "equalize_global",
            Stage::BucketRemap { .. } => "bucket_remap",
            Stage::Clahe { .. } => "clahe",
            Stage::Watercolor { .. } => "watercolor",
        }
    }

    /// Apply this stage to `src`, producing a fresh buffer.
    pub fn apply(&self, src: &PixelBuffer) -> Result<PixelBuffer> {
        match self {
            Stage::BoxBlur { size } => box_blur(src, *size, BoundaryPolicy::Clamp),
            Stage::GaussianBlur { size, sigma } => {
                gaussian_blur(src, *size, *sigma, BoundaryPolicy::Clamp)
            }
            Stage::Bilateral { params, iterations } => {
                bilateral_iterated(src, params, *iterations)
            }
            Stage::NonLocalMeans { params } => non_local_means(src, params),
            Stage::Median { size } => median_filter(src, *size),
            Stage::Demosaic => demosaic_bilinear(src),
            Stage::RgbToLumaChroma => rgb_to_luma_chroma(src),
            Stage::LumaChromaToRgb => luma_chroma_to_rgb(src),
            Stage::EqualizeGlobal { channel } => {
                let mut out = src.clone();
                equalize_global(&mut out, *channel)?;
                Ok(out)
            }
            Stage::BucketRemap { channel } => {
                let mut out = src.clone();
                bucket_remap(&mut out, *channel)?;
                Ok(out)
            }
            Stage::Clahe { params } => {
                let mut out = src.clone();
                apply_clahe(&mut out, params)?;
                Ok(out)
            }
            Stage::Watercolor { params } => watercolor(src, params),
        }
    }
}

/// Ordered enhancement recipe.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Run every stage in order. The source is never mutated; each stage
    /// reads its predecessor's complete output.
    pub fn run(&self, src: &PixelBuffer) -> Result<PixelBuffer> {
        src.ensure_nonempty()?;
        let mut current = src.clone();
        for (i, stage) in self.stages.iter().enumerate() {
            current = stage.apply(&current)?;
            debug!(
                "pipeline stage {i} ({}) -> {}x{}x{}",
                stage.name(),
                current.w,
                current.h,
                current.channels
            );
        }
        Ok(current)
    }
}

/// Per-sample linear combination `clamp(alpha * a - beta * b, 0, 255)`.
pub fn blend(a: &PixelBuffer, b: &PixelBuffer, alpha: f64, beta: f64) -> Result<PixelBuffer> {
    a.ensure_nonempty()?;
    if a.data.len() != b.data.len() {
        return Err(EnhanceError::SizeMismatch {
            expected: a.data.len(),
            actual: b.data.len(),
        });
    }
    let mut out = a.same_shape();
    for ((&x, &y), dst) in a.data.iter().zip(b.data.iter()).zip(out.data.iter_mut()) {
        *dst = (alpha * x as f64 - beta * y as f64).clamp(0.0, 255.0) as u8;
    }
    Ok(out)
}

/// Parameters for the watercolor recipe.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct WatercolorParams {
    pub median_size: usize,
    pub bilateral: BilateralParams,
    pub bilateral_iterations: usize,
    pub gaussian_size: usize,
    pub gaussian_sigma: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl Default for WatercolorParams {
    fn default() -> Self {
        Self {
            median_size: 3,
            bilateral: BilateralParams::default(),
            bilateral_iterations: 10,
            gaussian_size: 7,
            gaussian_sigma: 2.0,
            alpha: 1.4,
            beta: 0.4,
        }
    }
}

/// Painterly enhancement: median pre-smoothing followed by iterated bilateral
/// filtering, then a linear blend against a Gaussian blur of the *original*
/// image to sharpen by contrast.
pub fn watercolor(src: &PixelBuffer, params: &WatercolorParams) -> Result<PixelBuffer> {
    let smoothed = median_filter(src, params.median_size)?;
    let flattened =
        bilateral_iterated(&smoothed, &params.bilateral, params.bilateral_iterations)?;
    let blurred = gaussian_blur(
        src,
        params.gaussian_size,
        params.gaussian_sigma,
        BoundaryPolicy::Clamp,
    )?;
    blend(&flattened, &blurred, params.alpha, params.beta)
}
