#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod color;
pub mod demosaic;
pub mod error;
pub mod filters;
pub mod image;
pub mod kernel;
pub mod metrics;
pub mod pipeline;
pub mod tone;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{EnhanceError, Result};
pub use crate::image::{BoundaryPolicy, PixelBuffer};
pub use crate::kernel::Kernel;
pub use crate::pipeline::{blend, Pipeline, Stage};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use raster_enhance::prelude::*;
///
/// # fn main() -> raster_enhance::Result<()> {
/// let noisy = PixelBuffer::from_raw(768, 512, 1, vec![0u8; 768 * 512])?;
/// let recipe = Pipeline::new(vec![
///     Stage::Median { size: 3 },
///     Stage::GaussianBlur { size: 5, sigma: 1.5 },
/// ]);
/// let clean = recipe.run(&noisy)?;
/// println!("psnr = {:.2} dB", metrics::psnr(&noisy, &clean)?);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::filters::{BilateralParams, NlmParams};
    pub use crate::metrics;
    pub use crate::tone::ClaheParams;
    pub use crate::{BoundaryPolicy, Pipeline, PixelBuffer, Stage};
}
