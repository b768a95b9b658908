//! Error types shared by every enhancement operation.
//!
//! All failures here are configuration or programming errors: they are
//! detected up front, before any destination buffer is touched, and are
//! never retried.

use thiserror::Error;

/// Errors produced by filters, tone mappers and metrics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnhanceError {
    /// A caller-supplied scalar is outside its valid domain
    /// (even kernel size, non-positive sigma, non-partitioning tile grid, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two buffers compared or combined sample-by-sample have different lengths.
    #[error("size mismatch: expected {expected} samples, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The source buffer holds no samples.
    #[error("source buffer is empty")]
    EmptySource,
}

pub type Result<T> = std::result::Result<T, EnhanceError>;

impl EnhanceError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EnhanceError::InvalidParameter(msg.into())
    }
}
