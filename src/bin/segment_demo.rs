//! Demo: segment a greyscale image at several cluster counts.
//!
//! Usage:
//!   segment_demo <config.json>
//!   segment_demo <image> [width height]
//!
//! The second form reads a headerless raw file when dimensions are given,
//! otherwise any format the `image` crate can decode. The feature field is
//! computed once and clustered at each configured K (default 4, 5, 6);
//! posterized PNGs and an optional JSON report are written next to the input
//! or into the configured directories.
use log::info;
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use texture_segmenter::config::{self, OutputConfig, RawInputConfig, RuntimeConfig};
use texture_segmenter::diagnostics::ClusteringStage;
use texture_segmenter::filters::CHANNEL_NAMES;
use texture_segmenter::image::io::{
    load_grayscale_image, read_raw_grayscale, save_grayscale_f32, save_grayscale_u8,
    write_json_file,
};
use texture_segmenter::{SegmenterParams, TextureSegmenter};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoReport {
    input: PathBuf,
    width: usize,
    height: usize,
    features_ms: f64,
    runs: Vec<ClusteringStage>,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config = parse_cli()?;

    let gray = match &config.raw {
        Some(raw) => read_raw_grayscale(&config.input_path, raw.width, raw.height)?,
        None => load_grayscale_image(&config.input_path)?,
    };
    info!(
        "loaded {} ({}x{})",
        config.input_path.display(),
        gray.width(),
        gray.height()
    );

    let segmenter = TextureSegmenter::new(config.params.clone());

    let t0 = std::time::Instant::now();
    let field = segmenter
        .compute_features(gray.as_view())
        .map_err(|e| e.to_string())?;
    let features_ms = t0.elapsed().as_secs_f64() * 1000.0;
    info!("feature extraction took {features_ms:.1} ms");

    if let Some(dir) = &config.output.feature_dir {
        for (c, name) in CHANNEL_NAMES.iter().enumerate() {
            let path = dir.join(format!("feature_{c}_{name}.png"));
            save_grayscale_f32(&field.channel_image(c), &path)?;
        }
        info!("feature maps written to {}", dir.display());
    }

    let mut runs = Vec::with_capacity(config.cluster_counts.len());
    for &k in &config.cluster_counts {
        let seg = segmenter
            .segment_field(&field, k)
            .map_err(|e| e.to_string())?;
        let stage = ClusteringStage::from_segmentation(&seg, config.params.max_intensity);
        println!(
            "k={k}: iterations={} converged={} cluster_sizes={:?}",
            stage.iterations, stage.converged, stage.cluster_sizes
        );

        let out_path = segmented_path(&config, k);
        save_grayscale_u8(&seg.render(config.params.max_intensity), &out_path)?;
        println!("  wrote {}", out_path.display());
        runs.push(stage);
    }

    if let Some(path) = &config.output.json_out {
        let report = DemoReport {
            input: config.input_path.clone(),
            width: gray.width(),
            height: gray.height(),
            features_ms,
            runs,
        };
        write_json_file(path, &report)?;
        println!("JSON report written to {}", path.display());
    }

    Ok(())
}

fn segmented_path(config: &RuntimeConfig, k: usize) -> PathBuf {
    let stem = config
        .input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "segmented".to_string());
    let name = format!("{stem}_k{k}.png");
    match &config.output.segmented_dir {
        Some(dir) => dir.join(name),
        None => config
            .input_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(name),
    }
}

fn parse_cli() -> Result<RuntimeConfig, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.len() {
        1 if args[0].ends_with(".json") => config::load_config(Path::new(&args[0])),
        1 => Ok(default_config(PathBuf::from(&args[0]), None)),
        3 => {
            let width: usize = args[1].parse().map_err(|_| "invalid width".to_string())?;
            let height: usize = args[2].parse().map_err(|_| "invalid height".to_string())?;
            Ok(default_config(
                PathBuf::from(&args[0]),
                Some(RawInputConfig { width, height }),
            ))
        }
        _ => Err("usage: segment_demo <config.json> | segment_demo <image> [width height]"
            .to_string()),
    }
}

fn default_config(input_path: PathBuf, raw: Option<RawInputConfig>) -> RuntimeConfig {
    RuntimeConfig {
        input_path,
        raw,
        cluster_counts: vec![4, 5, 6],
        params: SegmenterParams::default(),
        output: OutputConfig::default(),
    }
}
