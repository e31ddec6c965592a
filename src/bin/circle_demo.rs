use circle_detector::diagnostics::DetectionReport;
use circle_detector::edges::{select_edge_pixels, sobel_gradients};
use circle_detector::hough::{accumulate_votes, RadiusSamples};
use circle_detector::image::io::{load_grayscale_image, save_normalized_f32, write_json_file};
use circle_detector::image::normalize_u8;
use circle_detector::{CircleDetector, CircleParams, Polarity};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct DemoConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub detector: DetectorConfig,
    pub output: DemoOutputConfig,
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

#[derive(Debug, Deserialize)]
pub struct DemoOutputConfig {
    #[serde(rename = "circles_json")]
    pub circles_json: PathBuf,
    /// Optional PNG of the accumulator magnitude, rescaled to full range.
    #[serde(default, rename = "accumulator_image")]
    pub accumulator_image: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<DemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
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

    let gray = load_grayscale_image(&config.input)?;
    let params = config.detector.to_params();
    let detector = CircleDetector::new(params);

    let report = detector
        .detect_with_diagnostics(gray.as_view())
        .map_err(|e| format!("Detection failed for {}: {e}", config.input.display()))?;

    if let Some(accum_path) = &config.output.accumulator_image {
        save_accumulator_image(&gray.as_view(), detector.params(), accum_path)?;
        println!("Saved accumulator magnitude to {}", accum_path.display());
    }

    let summary = DemoSummary {
        input: config.input.clone(),
        circle_count: report.result.len(),
        report,
    };
    write_json_file(&config.output.circles_json, &summary)?;

    println!(
        "Found {} circles in {} ({:.3} ms), report at {}",
        summary.circle_count,
        config.input.display(),
        summary.report.result.latency_ms,
        config.output.circles_json.display()
    );

    Ok(())
}

/// Re-run the accumulation stages to materialize the magnitude map; the
/// detector itself does not retain it.
fn save_accumulator_image(
    view: &circle_detector::image::ImageU8<'_>,
    params: &CircleParams,
    path: &Path,
) -> Result<(), String> {
    let normalized = normalize_u8(view);
    let samples = RadiusSamples::build(params.min_radius, params.max_radius)
        .map_err(|e| format!("Invalid radius range: {e}"))?;
    let grad = sobel_gradients(&normalized);
    let selection = select_edge_pixels(&grad, params.edge_threshold);
    let accumulator = accumulate_votes(
        &grad,
        &selection.pixels,
        &samples,
        params.polarity,
        &params.accum,
    );
    save_normalized_f32(&accumulator.magnitude(), path)
}

fn usage() -> String {
    "Usage: circle_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoSummary {
    input: PathBuf,
    circle_count: usize,
    report: DetectionReport,
}
