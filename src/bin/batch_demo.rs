//! Batch driver: run the detector over every image in a directory.
//!
//! Per-image failures are independent: a file that fails to decode or
//! detect is reported and skipped, and the batch continues.
use circle_detector::image::io::{load_grayscale_image, write_json_file};
use circle_detector::types::Circle;
use circle_detector::{CircleDetector, CircleParams, Polarity};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

#[derive(Debug, Deserialize)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    #[serde(default)]
    pub detector: DetectorConfig,
    pub output_json: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub min_radius: f32,
    pub max_radius: f32,
    pub polarity: Polarity,
    pub sensitivity: f32,
    pub edge_threshold: Option<f32>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_radius: 10.0,
            max_radius: 40.0,
            polarity: Polarity::Bright,
            sensitivity: 0.95,
            edge_threshold: None,
        }
    }
}

impl DetectorConfig {
    fn to_params(&self) -> CircleParams {
        let mut params = CircleParams::new(self.min_radius, self.max_radius);
        params.polarity = self.polarity;
        params.sensitivity = self.sensitivity;
        params.edge_threshold = self.edge_threshold;
        params
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    let detector = CircleDetector::new(config.detector.to_params());

    let mut image_paths = collect_image_paths(&config.input_dir)?;
    image_paths.sort();

    let mut entries = Vec::with_capacity(image_paths.len());
    let mut failures = 0usize;
    for path in &image_paths {
        match process_image(&detector, path) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                failures += 1;
                eprintln!("Skipping {}: {err}", path.display());
            }
        }
    }

    let summary = BatchSummary {
        input_dir: config.input_dir.clone(),
        images: entries.len(),
        failures,
        entries,
    };
    write_json_file(&config.output_json, &summary)?;

    println!(
        "Processed {} images ({} failed), summary at {}",
        summary.images,
        failures,
        config.output_json.display()
    );
    Ok(())
}

fn process_image(detector: &CircleDetector, path: &Path) -> Result<BatchEntry, String> {
    let gray = load_grayscale_image(path)?;
    let found = detector
        .detect(gray.as_view())
        .map_err(|e| format!("detection failed: {e}"))?;
    Ok(BatchEntry {
        file: path.to_path_buf(),
        latency_ms: found.latency_ms,
        circles: found.circles,
    })
}

fn collect_image_paths(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let reader =
        fs::read_dir(dir).map_err(|e| format!("Failed to read directory {}: {e}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in reader {
        let entry = entry.map_err(|e| format!("Failed to list {}: {e}", dir.display()))?;
        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_image {
            paths.push(path);
        }
    }
    Ok(paths)
}

fn load_config(path: &Path) -> Result<BatchConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn usage() -> String {
    "Usage: batch_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchEntry {
    file: PathBuf,
    latency_ms: f64,
    circles: Vec<Circle>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchSummary {
    input_dir: PathBuf,
    images: usize,
    failures: usize,
    entries: Vec<BatchEntry>,
}
