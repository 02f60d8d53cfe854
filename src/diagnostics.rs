//! Serializable reports describing what the pipeline did.
//!
//! [`SegmentationReport`] is the main entry point returned by
//! [`TextureSegmenter::process`](crate::TextureSegmenter::process), bundling
//! the input descriptor, per-stage timings and a summary of the clustering
//! run. The raw segmentation (labels, centroids) rides along outside the
//! serialized form; JSON consumers get the compact summary only.
use crate::render::grey_levels;
use crate::segmenter::Segmentation;
use serde::Serialize;

/// Shape of the processed input.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
}

/// Wall-clock timings of the pipeline stages, in milliseconds.
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTimings {
    pub features_ms: f64,
    pub clustering_ms: f64,
    pub render_ms: f64,
    pub total_ms: f64,
}

/// Summary of one clustering run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteringStage {
    pub k: usize,
    pub iterations: usize,
    pub converged: bool,
    /// Members per cluster after the final assignment.
    pub cluster_sizes: Vec<usize>,
    /// Grey level each cluster renders to.
    pub grey_levels: Vec<u8>,
}

impl ClusteringStage {
    pub fn from_segmentation(seg: &Segmentation, max_intensity: u8) -> Self {
        Self {
            k: seg.k,
            iterations: seg.iterations,
            converged: seg.converged,
            cluster_sizes: seg.cluster_sizes(),
            grey_levels: grey_levels(seg.k, max_intensity),
        }
    }
}

/// Full report for one `process` call.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationReport {
    pub input: InputDescriptor,
    pub timings: StageTimings,
    pub clustering: ClusteringStage,
    /// The segmentation itself; excluded from serialized reports.
    #[serde(skip)]
    pub segmentation: Segmentation,
    /// Posterized grey rendering of the labels; excluded from JSON.
    #[serde(skip)]
    pub rendered: crate::image::GrayImageU8,
}
