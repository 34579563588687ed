//! Error type shared by every pipeline stage.

use thiserror::Error;

/// Errors raised before any grid work begins.
///
/// Numeric corner cases inside the pipeline (zero horizontal gradient,
/// all-zero magnitude, out-of-bounds neighbours) are handled in place and
/// never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CannyError {
    #[error("invalid sigma {0}: smoothing parameter must be finite and greater than zero")]
    InvalidSigma(f32),

    #[error("invalid high threshold {0}: must be finite and greater than zero")]
    InvalidThreshold(f32),

    #[error("sample buffer size mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, CannyError>;
