//! Structured, serializable diagnostics for the detector pipeline.
//!
//! Every stage reports its wall-clock time and the counters a tool needs to
//! judge what happened: how many edge pixels voted, how the work was
//! chunked, how many candidates survived the sensitivity filter. The demo
//! binaries serialize the whole trace to JSON.

use crate::types::CircleSet;
use serde::Serialize;

/// Timing entry for a single pipeline stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one detector run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn with_total(total_ms: f64) -> Self {
        Self {
            total_ms,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }
}

/// Shape of the processed image.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
}

/// Gradient computation summary.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientStage {
    pub elapsed_ms: f64,
    pub max_magnitude: f32,
}

/// Edge selection summary.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStage {
    pub elapsed_ms: f64,
    /// Normalized threshold actually applied.
    pub threshold: f32,
    /// True when the threshold came from the automatic bimodal split.
    pub auto_threshold: bool,
    pub pixels: usize,
}

/// Vote accumulation summary.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccumulationStage {
    pub elapsed_ms: f64,
    pub radius_samples: usize,
    /// Edge pixels per chunk under the working-set cap.
    pub chunk_len: usize,
    pub chunks: usize,
}

/// Center extraction and sensitivity filtering summary.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStage {
    pub elapsed_ms: f64,
    /// Candidates produced by peak extraction.
    pub candidates: usize,
    /// Candidates surviving the metric threshold.
    pub kept: usize,
}

/// Radius decoding summary.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeStage {
    pub elapsed_ms: f64,
    pub circles: usize,
}

/// Full per-stage trace of one detector run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    pub gradient: Option<GradientStage>,
    pub edges: Option<EdgeStage>,
    pub accumulation: Option<AccumulationStage>,
    pub extraction: Option<ExtractionStage>,
    pub decode: Option<DecodeStage>,
}

/// Detection result together with its diagnostics trace.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub result: CircleSet,
    pub trace: PipelineTrace,
}
