//! Error types for the segmentation pipeline.
//!
//! The numeric core fails fast on malformed inputs before any processing
//! starts; everything that can legitimately happen mid-pipeline (out-of-range
//! neighborhood taps, empty clusters, non-convergence) is handled in-band and
//! never surfaces as an error.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, SegmenterError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmenterError {
    /// The pixel buffer does not cover the declared dimensions.
    #[error("image buffer too small: need at least {expected} bytes, got {actual}")]
    ImageSizeMismatch { expected: usize, actual: usize },

    /// Zero width or height.
    #[error("image has zero width or height")]
    EmptyImage,

    /// Cluster count outside the supported range (labels are 8-bit).
    #[error("cluster count must be in 1..=256, got {k}")]
    InvalidClusterCount { k: usize },

    /// The normalization neighborhood must be odd so it can be centered.
    #[error("normalization window must be odd and positive, got {window}")]
    InvalidWindow { window: usize },
}
