//! Texture segmenter orchestrating the two-stage pipeline.
//!
//! Overview
//! - Validates the input view and converts it to a float grid once.
//! - Extracts the 9-channel Laws feature field (normalization + filtering).
//! - Runs k-means over the descriptors with a seedable random source.
//! - Posterizes the final labels into evenly spaced grey levels.
//!
//! The feature field is exposed separately ([`TextureSegmenter::compute_features`]
//! and [`TextureSegmenter::segment_field`]) so that several cluster counts can
//! be compared on one extraction pass, which is how the reference experiment
//! runs K = 4, 5 and 6 on the same image.
use crate::diagnostics::{ClusteringStage, InputDescriptor, SegmentationReport, StageTimings};
use crate::error::{Result, SegmenterError};
use crate::features::{self, FeatureField};
use crate::filters::{FilterBank, CHANNELS};
use crate::image::{GrayImageU8, ImageF32, ImageU8};
use crate::kmeans::{self, EmptyClusterPolicy, KMeansOptions};
use crate::render;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::time::Instant;

/// Segmenter-wide parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SegmenterParams {
    /// Number of clusters for [`TextureSegmenter::process`].
    pub k: usize,
    /// Side of the illumination-normalization neighborhood (odd, default 15).
    pub norm_window: usize,
    /// Iteration cap for the clustering loop.
    pub max_iterations: usize,
    /// Empty-cluster handling during centroid updates.
    pub empty_cluster_policy: EmptyClusterPolicy,
    /// Top of the grey range used when rendering labels.
    pub max_intensity: u8,
    /// Seed for centroid initialization; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SegmenterParams {
    fn default() -> Self {
        Self {
            k: 4,
            norm_window: 15,
            max_iterations: 100,
            empty_cluster_policy: EmptyClusterPolicy::ZeroMean,
            max_intensity: 255,
            seed: None,
        }
    }
}

/// Terminal result of one clustering run, congruent to the input image.
#[derive(Clone, Debug)]
pub struct Segmentation {
    pub k: usize,
    pub w: usize,
    pub h: usize,
    /// Row-major cluster index per pixel.
    pub labels: Vec<u8>,
    /// Final centroid per cluster.
    pub centroids: Vec<[f32; CHANNELS]>,
    pub iterations: usize,
    pub converged: bool,
}

impl Segmentation {
    /// Members per cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.k];
        for &label in &self.labels {
            sizes[label as usize] += 1;
        }
        sizes
    }

    /// Posterize the labels into evenly spaced grey levels.
    pub fn render(&self, max_intensity: u8) -> GrayImageU8 {
        render::posterize(&self.labels, self.w, self.h, self.k, max_intensity)
    }
}

/// Two-stage Laws-texture segmenter.
pub struct TextureSegmenter {
    params: SegmenterParams,
    bank: FilterBank,
}

impl TextureSegmenter {
    pub fn new(params: SegmenterParams) -> Self {
        Self {
            params,
            bank: FilterBank::laws(),
        }
    }

    pub fn params(&self) -> &SegmenterParams {
        &self.params
    }

    /// Extract the 9-channel feature field for `gray`. The field can be
    /// reused across several [`segment_field`](Self::segment_field) calls.
    pub fn compute_features(&self, gray: ImageU8<'_>) -> Result<FeatureField> {
        validate_input(&gray)?;
        let img = ImageF32::from_u8(&gray);
        features::extract(&img, &self.bank, self.params.norm_window)
    }

    /// Run one clustering pass over a precomputed feature field.
    pub fn segment_field(&self, field: &FeatureField, k: usize) -> Result<Segmentation> {
        let options = KMeansOptions {
            k,
            max_iterations: self.params.max_iterations,
            empty_cluster_policy: self.params.empty_cluster_policy,
        };
        let mut rng = self.make_rng();
        let clustering = kmeans::cluster(field, &options, &mut rng)?;
        Ok(Segmentation {
            k,
            w: field.w,
            h: field.h,
            labels: clustering.labels,
            centroids: clustering.centroids,
            iterations: clustering.iterations,
            converged: clustering.converged,
        })
    }

    /// Full pipeline at the configured cluster count, with stage timings.
    pub fn process(&self, gray: ImageU8<'_>) -> Result<SegmentationReport> {
        let t0 = Instant::now();

        let t_features = Instant::now();
        let field = self.compute_features(gray)?;
        let features_ms = elapsed_ms(t_features);

        let t_cluster = Instant::now();
        let segmentation = self.segment_field(&field, self.params.k)?;
        let clustering_ms = elapsed_ms(t_cluster);

        let t_render = Instant::now();
        let rendered = segmentation.render(self.params.max_intensity);
        let render_ms = elapsed_ms(t_render);

        Ok(SegmentationReport {
            input: InputDescriptor {
                width: field.w,
                height: field.h,
            },
            timings: StageTimings {
                features_ms,
                clustering_ms,
                render_ms,
                total_ms: elapsed_ms(t0),
            },
            clustering: ClusteringStage::from_segmentation(
                &segmentation,
                self.params.max_intensity,
            ),
            segmentation,
            rendered,
        })
    }

    fn make_rng(&self) -> StdRng {
        match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn elapsed_ms(t: Instant) -> f64 {
    t.elapsed().as_secs_f64() * 1000.0
}

fn validate_input(gray: &ImageU8<'_>) -> Result<()> {
    if gray.w == 0 || gray.h == 0 {
        return Err(SegmenterError::EmptyImage);
    }
    if gray.stride < gray.w {
        return Err(SegmenterError::ImageSizeMismatch {
            expected: gray.w,
            actual: gray.stride,
        });
    }
    let required = gray.stride * (gray.h - 1) + gray.w;
    if gray.data.len() < required {
        return Err(SegmenterError::ImageSizeMismatch {
            expected: required,
            actual: gray.data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_buffer_fails_before_processing() {
        let bytes = vec![0u8; 10];
        let img = ImageU8 {
            w: 4,
            h: 4,
            stride: 4,
            data: &bytes,
        };
        let segmenter = TextureSegmenter::new(SegmenterParams::default());
        assert_eq!(
            segmenter.compute_features(img).unwrap_err(),
            SegmenterError::ImageSizeMismatch {
                expected: 16,
                actual: 10
            }
        );
    }

    #[test]
    fn zero_sized_input_is_rejected() {
        let img = ImageU8 {
            w: 0,
            h: 0,
            stride: 0,
            data: &[],
        };
        let segmenter = TextureSegmenter::new(SegmenterParams::default());
        assert_eq!(
            segmenter.compute_features(img).unwrap_err(),
            SegmenterError::EmptyImage
        );
    }

    #[test]
    fn field_is_reusable_across_cluster_counts() {
        let bytes: Vec<u8> = (0..16 * 16).map(|i| (i * 7 % 251) as u8).collect();
        let img = ImageU8 {
            w: 16,
            h: 16,
            stride: 16,
            data: &bytes,
        };
        let segmenter = TextureSegmenter::new(SegmenterParams {
            seed: Some(11),
            norm_window: 7,
            ..Default::default()
        });
        let field = segmenter.compute_features(img).unwrap();
        for k in [4usize, 5, 6] {
            let seg = segmenter.segment_field(&field, k).unwrap();
            assert_eq!(seg.k, k);
            assert_eq!(seg.labels.len(), 256);
            assert_eq!(seg.cluster_sizes().iter().sum::<usize>(), 256);
            assert!(seg.labels.iter().all(|&l| (l as usize) < k));
        }
    }
}
