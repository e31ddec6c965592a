#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod detector;
pub mod diagnostics;
pub mod image;
pub mod types;

// Lower-level building blocks – public for tooling, considered internals.
pub mod edges;
pub mod hough;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{CircleDetector, CircleParams, Polarity};
pub use crate::types::{Circle, CircleSet, DetectError};

// Per-run diagnostics returned by the detector.
pub use crate::diagnostics::{DetectionReport, PipelineTrace};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use circle_detector::prelude::*;
///
/// # fn main() {
/// let (w, h) = (640usize, 480usize);
/// let gray = vec![0u8; w * h];
/// let img = ImageU8 { w, h, stride: w, data: &gray };
///
/// let detector = CircleDetector::new(CircleParams::new(10.0, 40.0));
/// let found = detector.detect(img).expect("valid parameters");
/// println!("found {} circles", found.len());
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageU8;
    pub use crate::{Circle, CircleDetector, CircleParams, CircleSet, Polarity};
}
