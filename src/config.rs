//! Runtime configuration for the demo binary, loaded from JSON.
use crate::SegmenterParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Dimensions of a headerless raw input file (one byte per pixel).
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct RawInputConfig {
    pub width: usize,
    pub height: usize,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where to write the JSON report; stdout summary only when absent.
    pub json_out: Option<PathBuf>,
    /// Directory for the posterized PNGs, one per cluster count.
    pub segmented_dir: Option<PathBuf>,
    /// Directory for min-max scaled feature-map PNGs (debug aid).
    pub feature_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input_path: PathBuf,
    /// Set for raw inputs; PNG/JPEG inputs carry their own dimensions.
    #[serde(default)]
    pub raw: Option<RawInputConfig>,
    /// Cluster counts to compare on one feature extraction.
    #[serde(default = "default_cluster_counts")]
    pub cluster_counts: Vec<usize>,
    #[serde(default)]
    pub params: SegmenterParams,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_cluster_counts() -> Vec<usize> {
    vec![4, 5, 6]
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}
