//! Gradient field and edge-pixel selection, the vote sources of the pipeline.
//!
//! - Gradient computation (fixed 3×3 Sobel pair) returning `gx`, `gy` and the
//!   Euclidean magnitude, with replicated borders.
//! - Edge selection by thresholding the magnitude relative to its maximum,
//!   either with a caller-supplied normalized threshold or an automatic
//!   global bimodal (Otsu) split.
//!
//! Pixels with zero magnitude can never pass the threshold comparison, so the
//! voting stage never normalizes a zero gradient.

pub mod grad;
pub mod select;

pub use grad::{sobel_gradients, GradientField};
pub use select::{select_edge_pixels, EdgeSelection};
