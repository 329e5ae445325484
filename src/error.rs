//! Error types for rasterfx.
//!
//! Only configuration problems are errors. Per-pixel arithmetic is clamped,
//! never reported, and cancellation is a normal [`RunOutcome`](crate::RunOutcome).

use thiserror::Error;

/// Errors that can occur while building images, filters or runners
#[derive(Debug, Error)]
pub enum FilterError {
    /// Kernel dimensions or weights are unusable
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Filter or runner parameters are out of range
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Raw pixel buffer does not match the declared dimensions
    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Pixel array has a channel count other than RGB or RGBA
    #[error("unsupported channel count: expected 3 or 4, got {actual}")]
    UnsupportedChannels {
        /// Channel count of the rejected array
        actual: usize,
    },

    /// Dedicated worker pool could not be created
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for rasterfx operations
pub type FilterResult<T> = Result<T, FilterError>;
