//! Public result and error types.

use serde::Serialize;

/// One detected circle, in pixel coordinates of the input image.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Circle {
    /// Center row (y).
    pub row: f32,
    /// Center column (x).
    pub col: f32,
    /// Estimated radius.
    pub radius: f32,
    /// Accumulator evidence at the center after smoothing and suppression.
    pub metric: f32,
}

/// Detection outcome: circles sorted by descending metric.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CircleSet {
    pub circles: Vec<Circle>,
    pub latency_ms: f64,
}

impl CircleSet {
    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }
}

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors surfaced before any accumulation work starts.
///
/// Degenerate inputs (flat image, no edge pixels) are not errors; the
/// detector returns an empty [`CircleSet`] for those.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectError {
    /// Input buffer does not describe a 2-D image of the stated shape.
    InvalidImage { reason: String },
    /// Radius range is non-positive, inverted, or yields fewer than two
    /// samples after stepping.
    InvalidRadiusRange { min: f32, max: f32 },
    /// Sensitivity must lie in (0, 1].
    InvalidSensitivity(f32),
    /// Edge threshold must lie in (0, 1].
    InvalidEdgeThreshold(f32),
}

impl std::fmt::Display for DetectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidImage { reason } => write!(f, "invalid image: {}", reason),
            Self::InvalidRadiusRange { min, max } => {
                write!(f, "invalid radius range [{}, {}]", min, max)
            }
            Self::InvalidSensitivity(s) => {
                write!(f, "sensitivity {} outside (0, 1]", s)
            }
            Self::InvalidEdgeThreshold(t) => {
                write!(f, "edge threshold {} outside (0, 1]", t)
            }
        }
    }
}

impl std::error::Error for DetectError {}
