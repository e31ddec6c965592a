//! Circle detector orchestrating the phase-coded Hough pipeline.
//!
//! Overview
//! - Computes Sobel gradients and selects edge pixels above a magnitude
//!   threshold (caller-supplied or automatic bimodal split).
//! - Accumulates one complex vote per (edge pixel, radius sample) into an
//!   image-shaped accumulator, in bounded-size chunks.
//! - Extracts center candidates from the smoothed, peak-suppressed
//!   accumulator magnitude and filters them against the sensitivity
//!   threshold.
//! - Decodes each surviving center's radius from the accumulator phase.
//!
//! Modules
//! - [`params`] – configuration types used by the detector and the demos.
//! - `pipeline` – the [`CircleDetector`] implementation.
//!
//! Degenerate inputs (flat images, gradient-free regions) produce empty
//! results; only unusable parameters are errors.

pub mod params;
mod pipeline;

pub use params::{AccumParams, CircleParams, ExtractParams, Polarity};
pub use pipeline::CircleDetector;
