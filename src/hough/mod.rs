//! The phase-coded circular Hough engine.
//!
//! Overview
//! - [`radius`] builds the sampled radius ladder and its log-phase code: one
//!   full phase turn spread log-linearly from the first to the last sample,
//!   so relative radius differences resolve with comparable sensitivity
//!   across the whole range.
//! - [`accum`] casts one complex vote per (edge pixel, radius sample) at the
//!   candidate center position, scatter-adding into an image-shaped
//!   accumulator. Edge pixels are processed in bounded-size chunks so the
//!   vote working set never exceeds a configured element cap.
//! - [`peaks`] turns the accumulator magnitude into center candidates:
//!   box smoothing, grayscale reconstruction by dilation to suppress shallow
//!   maxima, a 3×3 local-maximum mask, connected-component centroids, and a
//!   stable sort by descending evidence.
//!
//! Key invariant: accumulation is a pure sum, so the final accumulator is
//! independent of chunk partitioning and edge ordering up to floating-point
//! summation order.

pub mod accum;
pub mod peaks;
pub mod radius;

pub use accum::{accumulate_votes, chunk_len, Accumulator};
pub use peaks::{extract_centers, CenterCandidate};
pub use radius::{RadiusSamples, RADIUS_STEP};
