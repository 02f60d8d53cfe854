//! Posterization of cluster labels into evenly spaced grey levels.
//!
//! Cluster index `i` maps to `floor(i * (max_intensity / k))`, so the `k`
//! levels are distinct and strictly increasing whenever `max_intensity >= k`.
//! The intensity scale only affects visual contrast, not the segmentation.
use crate::image::GrayImageU8;

/// Grey level for each cluster index `0..k`.
pub fn grey_levels(k: usize, max_intensity: u8) -> Vec<u8> {
    let scale = max_intensity as f32 / k as f32;
    (0..k).map(|i| (i as f32 * scale).floor() as u8).collect()
}

/// Map a row-major label grid to a grey image using [`grey_levels`].
pub fn posterize(labels: &[u8], w: usize, h: usize, k: usize, max_intensity: u8) -> GrayImageU8 {
    debug_assert_eq!(labels.len(), w * h);
    let levels = grey_levels(k, max_intensity);
    let data = labels.iter().map(|&l| levels[l as usize]).collect();
    GrayImageU8::new(w, h, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_clusters_span_the_display_range() {
        let levels = grey_levels(4, 255);
        assert_eq!(levels, vec![0, 63, 127, 191]);
        for pair in levels.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn levels_are_distinct_for_reference_cluster_counts() {
        for k in [2usize, 4, 5, 6] {
            let levels = grey_levels(k, 255);
            assert_eq!(levels.len(), k);
            for pair in levels.windows(2) {
                assert!(pair[0] < pair[1], "k={k}: {levels:?}");
            }
        }
    }

    #[test]
    fn posterize_maps_labels_through_levels() {
        let labels = [0u8, 1, 2, 3];
        let img = posterize(&labels, 2, 2, 4, 255);
        assert_eq!(img.pixels(), &[0, 63, 127, 191]);
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 2);
    }
}
