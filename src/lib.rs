#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod segmenter;

// Numeric building blocks – public for tooling and experiments.
pub mod config;
pub mod features;
pub mod filters;
pub mod kmeans;
pub mod render;

// --- High-level re-exports -------------------------------------------------

// Main entry points: segmenter + results.
pub use crate::segmenter::{Segmentation, SegmenterParams, TextureSegmenter};

pub use crate::diagnostics::{ClusteringStage, SegmentationReport};
pub use crate::error::{Result, SegmenterError};
pub use crate::features::FeatureField;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use texture_segmenter::prelude::*;
///
/// # fn main() {
/// let (w, h) = (256usize, 256usize);
/// let gray = vec![0u8; w * h];
/// let img = ImageU8 { w, h, stride: w, data: &gray };
///
/// let segmenter = TextureSegmenter::new(SegmenterParams {
///     k: 4,
///     seed: Some(42),
///     ..Default::default()
/// });
///
/// let report = segmenter.process(img).expect("segmentation failed");
/// println!(
///     "k={} converged={} latency_ms={:.3}",
///     report.clustering.k, report.clustering.converged, report.timings.total_ms
/// );
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageU8;
    pub use crate::{SegmenterParams, TextureSegmenter};
}
