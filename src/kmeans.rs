//! K-means clustering over 9-dimensional texture descriptors.
//!
//! Algorithm
//! - Initialize `k` centroids by sampling descriptors at uniformly random
//!   pixel coordinates, with replacement. Duplicate picks are possible and
//!   deliberately not corrected.
//! - Assign every pixel to the nearest centroid by Euclidean distance; only a
//!   strictly smaller distance replaces the current best, so ties resolve to
//!   the lowest centroid index.
//! - Recompute each centroid as the component-wise mean of its members. A
//!   cluster that lost all members either keeps the zero accumulator
//!   ([`EmptyClusterPolicy::ZeroMean`], the reference behaviour) or is
//!   reseeded from a random pixel ([`EmptyClusterPolicy::Reseed`]).
//! - Stop when every centroid's 9-D displacement is exactly zero. Once the
//!   assignment stops changing the recomputed means are bitwise identical,
//!   so exact-zero convergence is reached in practice; `max_iterations`
//!   bounds the loop and a capped run returns `converged = false` instead of
//!   erroring.
//!
//! Randomness is injected by the caller (`&mut impl Rng`), which makes runs
//! reproducible under a fixed seed.
use crate::error::{Result, SegmenterError};
use crate::features::FeatureField;
use crate::filters::CHANNELS;
use log::debug;
use rand::Rng;
use serde::Deserialize;

/// What to do with a cluster that ends an update with no members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyClusterPolicy {
    /// Keep the all-zero accumulated mean (reference behaviour).
    ZeroMean,
    /// Re-draw the centroid from a random pixel's descriptor.
    Reseed,
}

/// Options for a single clustering run.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct KMeansOptions {
    /// Number of clusters (1..=256; labels are 8-bit).
    pub k: usize,
    /// Iteration cap; reaching it yields a best-effort, non-converged result.
    pub max_iterations: usize,
    /// Empty-cluster handling, see [`EmptyClusterPolicy`].
    pub empty_cluster_policy: EmptyClusterPolicy,
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self {
            k: 4,
            max_iterations: 100,
            empty_cluster_policy: EmptyClusterPolicy::ZeroMean,
        }
    }
}

/// Result of one clustering run over a feature field.
#[derive(Clone, Debug)]
pub struct Clustering {
    /// Final centroid per cluster, in index order.
    pub centroids: Vec<[f32; CHANNELS]>,
    /// Row-major cluster index per pixel.
    pub labels: Vec<u8>,
    /// Assign/update rounds performed.
    pub iterations: usize,
    /// True when every centroid delta reached exactly zero.
    pub converged: bool,
}

impl Clustering {
    /// Number of members per cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.centroids.len()];
        for &label in &self.labels {
            sizes[label as usize] += 1;
        }
        sizes
    }
}

#[inline]
fn distance(a: &[f32; CHANNELS], b: &[f32; CHANNELS]) -> f32 {
    let mut sum = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        let d = x - y;
        sum += d * d;
    }
    sum.sqrt()
}

fn sample_descriptor<R: Rng>(field: &FeatureField, rng: &mut R) -> [f32; CHANNELS] {
    let x = rng.gen_range(0..field.w);
    let y = rng.gen_range(0..field.h);
    *field.get(x, y)
}

/// Cluster the descriptors of `field` into `options.k` groups.
pub fn cluster<R: Rng>(
    field: &FeatureField,
    options: &KMeansOptions,
    rng: &mut R,
) -> Result<Clustering> {
    let k = options.k;
    if k == 0 || k > 256 {
        return Err(SegmenterError::InvalidClusterCount { k });
    }
    if field.w == 0 || field.h == 0 {
        return Err(SegmenterError::EmptyImage);
    }

    let mut centroids: Vec<[f32; CHANNELS]> =
        (0..k).map(|_| sample_descriptor(field, rng)).collect();
    let mut labels = vec![0u8; field.w * field.h];
    let mut iterations = 0usize;
    let mut converged = false;

    while iterations < options.max_iterations {
        iterations += 1;

        // Assignment: strict improvement only, so ties keep the lowest index.
        for (label, v) in labels.iter_mut().zip(field.vectors()) {
            let mut best = f32::INFINITY;
            let mut best_idx = 0usize;
            for (c, centroid) in centroids.iter().enumerate() {
                let d = distance(v, centroid);
                if d < best {
                    best = d;
                    best_idx = c;
                }
            }
            *label = best_idx as u8;
        }

        // Update: accumulate member sums, divide by member count.
        let mut sums = vec![[0.0f32; CHANNELS]; k];
        let mut counts = vec![0usize; k];
        for (&label, v) in labels.iter().zip(field.vectors()) {
            let c = label as usize;
            counts[c] += 1;
            for (s, x) in sums[c].iter_mut().zip(v) {
                *s += x;
            }
        }

        let mut all_stationary = true;
        for c in 0..k {
            let mut updated = sums[c];
            if counts[c] > 0 {
                let n = counts[c] as f32;
                for s in &mut updated {
                    *s /= n;
                }
            } else if options.empty_cluster_policy == EmptyClusterPolicy::Reseed {
                updated = sample_descriptor(field, rng);
            }
            let delta = distance(&centroids[c], &updated);
            debug!(
                "k-means iter {iterations}: cluster {c} members={} delta={delta:.6}",
                counts[c]
            );
            if delta != 0.0 {
                all_stationary = false;
            }
            centroids[c] = updated;
        }

        if all_stationary {
            converged = true;
            break;
        }
    }

    Ok(Clustering {
        centroids,
        labels,
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field_from(vectors: Vec<[f32; CHANNELS]>, w: usize, h: usize) -> FeatureField {
        FeatureField::from_vectors(w, h, vectors)
    }

    /// Deterministic pseudo-varied field for convergence tests.
    fn varied_field(w: usize, h: usize) -> FeatureField {
        let mut data = Vec::with_capacity(w * h);
        for i in 0..w * h {
            let mut v = [0.0f32; CHANNELS];
            for (c, x) in v.iter_mut().enumerate() {
                *x = ((i * 37 + c * 11) % 101) as f32 - 50.0;
            }
            data.push(v);
        }
        field_from(data, w, h)
    }

    #[test]
    fn zero_k_is_rejected() {
        let field = varied_field(4, 4);
        let mut rng = StdRng::seed_from_u64(0);
        let options = KMeansOptions {
            k: 0,
            ..Default::default()
        };
        assert_eq!(
            cluster(&field, &options, &mut rng).unwrap_err(),
            SegmenterError::InvalidClusterCount { k: 0 }
        );
    }

    #[test]
    fn single_cluster_converges_to_global_mean() {
        let field = varied_field(8, 8);
        let mut rng = StdRng::seed_from_u64(1);
        let options = KMeansOptions {
            k: 1,
            ..Default::default()
        };
        let result = cluster(&field, &options, &mut rng).unwrap();
        assert!(result.converged);
        assert!(result.iterations <= 3, "iterations={}", result.iterations);
        assert!(result.labels.iter().all(|&l| l == 0));

        let n = field.vectors().len() as f32;
        let mut mean = [0.0f32; CHANNELS];
        for v in field.vectors() {
            for (m, x) in mean.iter_mut().zip(v) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }
        for (a, b) in result.centroids[0].iter().zip(&mean) {
            assert!((a - b).abs() < 1e-3, "centroid {a} vs mean {b}");
        }
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let field = varied_field(10, 10);
        let options = KMeansOptions {
            k: 3,
            ..Default::default()
        };
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = cluster(&field, &options, &mut rng_a).unwrap();
        let b = cluster(&field, &options, &mut rng_b).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.centroids, b.centroids);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn ties_resolve_to_lowest_index_and_empty_cluster_zeroes_out() {
        // Every descriptor is identical, so both initial centroids coincide
        // and every distance ties: all pixels must land in cluster 0.
        let v = [3.0f32; CHANNELS];
        let field = field_from(vec![v; 16], 4, 4);
        let mut rng = StdRng::seed_from_u64(5);
        let options = KMeansOptions {
            k: 2,
            ..Default::default()
        };
        let result = cluster(&field, &options, &mut rng).unwrap();
        assert!(result.labels.iter().all(|&l| l == 0));
        assert!(result.converged);
        assert_eq!(result.centroids[0], v);
        // Cluster 1 never gains members; ZeroMean leaves the zero accumulator.
        assert_eq!(result.centroids[1], [0.0; CHANNELS]);
        assert_eq!(result.cluster_sizes(), vec![16, 0]);
    }

    #[test]
    fn reseed_policy_redraws_empty_clusters() {
        let v = [3.0f32; CHANNELS];
        let field = field_from(vec![v; 16], 4, 4);
        let mut rng = StdRng::seed_from_u64(5);
        let options = KMeansOptions {
            k: 2,
            empty_cluster_policy: EmptyClusterPolicy::Reseed,
            ..Default::default()
        };
        let result = cluster(&field, &options, &mut rng).unwrap();
        assert!(result.labels.iter().all(|&l| l == 0));
        assert!(result.converged);
        // Reseeding draws from the field, where every descriptor equals `v`.
        assert_eq!(result.centroids[1], v);
    }

    #[test]
    fn iteration_cap_reports_non_convergence() {
        let field = varied_field(10, 10);
        let mut rng = StdRng::seed_from_u64(9);
        let options = KMeansOptions {
            k: 3,
            max_iterations: 1,
            ..Default::default()
        };
        let result = cluster(&field, &options, &mut rng).unwrap();
        assert_eq!(result.iterations, 1);
        assert!(!result.converged);
    }
}
