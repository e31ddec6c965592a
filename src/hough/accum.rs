//! Phase-coded vote accumulation over the image plane.
//!
//! Every selected edge pixel casts, for each radius sample, one complex vote
//! at the candidate center implied by its unit gradient direction and the
//! polarity-signed radius. Votes land by rounding to the nearest pixel and
//! scatter-add into a dense image-shaped accumulator; candidates outside the
//! image are dropped.
//!
//! Edge pixels are processed in chunks of at most
//! `max_working_set / radius_samples` pixels, so the staged vote buffer never
//! exceeds the configured element cap however many edges or radii there are.
//! Chunks contribute by pure addition: the final accumulator does not depend
//! on the partitioning, only on floating-point summation order.
//!
//! With the `parallel` feature, chunks fan out over a rayon pool and partial
//! accumulators are summed in a reduction; the default path is sequential
//! and bit-deterministic.

use crate::detector::params::{AccumParams, Polarity};
use crate::edges::grad::GradientField;
use crate::hough::radius::RadiusSamples;
use crate::image::ImageF32;
use num_complex::Complex;

/// Complex Hough accumulator. Magnitude measures center evidence, phase
/// encodes the dominant radius.
#[derive(Clone, Debug)]
pub struct Accumulator {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Complex<f32>>,
}

impl Accumulator {
    fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Complex::new(0.0, 0.0); width * height],
        }
    }

    /// Per-cell magnitude as a float image.
    pub fn magnitude(&self) -> ImageF32 {
        ImageF32 {
            w: self.width,
            h: self.height,
            stride: self.width,
            data: self.cells.iter().map(|c| c.norm()).collect(),
        }
    }

    /// Accumulated phase at (x, y), in (-π, π].
    pub fn phase_at(&self, x: usize, y: usize) -> f32 {
        self.cells[y * self.width + x].arg()
    }
}

/// Edge pixels per chunk for the given cap and ladder length.
pub fn chunk_len(params: &AccumParams, radius_samples: usize) -> usize {
    (params.max_working_set / radius_samples.max(1)).max(1)
}

/// Run the vote accumulation. An empty edge set yields an all-zero
/// accumulator.
pub fn accumulate_votes(
    grad: &GradientField,
    edges: &[(u32, u32)],
    samples: &RadiusSamples,
    polarity: Polarity,
    params: &AccumParams,
) -> Accumulator {
    let width = grad.mag.w;
    let height = grad.mag.h;
    if edges.is_empty() || width == 0 || height == 0 {
        return Accumulator::zeros(width, height);
    }

    let weights = samples.weights();
    let signed: Vec<f32> = match polarity {
        Polarity::Bright => samples.radii().to_vec(),
        Polarity::Dark => samples.radii().iter().map(|&r| -r).collect(),
    };
    let chunk = chunk_len(params, samples.len());

    let cells = accumulate_cells(grad, edges, &signed, &weights, chunk, width, height);
    Accumulator {
        width,
        height,
        cells,
    }
}

#[cfg(not(feature = "parallel"))]
fn accumulate_cells(
    grad: &GradientField,
    edges: &[(u32, u32)],
    signed_radii: &[f32],
    weights: &[Complex<f32>],
    chunk: usize,
    width: usize,
    height: usize,
) -> Vec<Complex<f32>> {
    let mut cells = vec![Complex::new(0.0, 0.0); width * height];
    // Vote arena reused across chunks; capacity is the working-set cap.
    let mut votes: Vec<(u32, Complex<f32>)> =
        Vec::with_capacity(chunk.saturating_mul(weights.len()));
    for chunk_pixels in edges.chunks(chunk) {
        votes.clear();
        collect_chunk_votes(grad, chunk_pixels, signed_radii, weights, &mut votes);
        for &(idx, w) in &votes {
            cells[idx as usize] += w;
        }
    }
    cells
}

#[cfg(feature = "parallel")]
fn accumulate_cells(
    grad: &GradientField,
    edges: &[(u32, u32)],
    signed_radii: &[f32],
    weights: &[Complex<f32>],
    chunk: usize,
    width: usize,
    height: usize,
) -> Vec<Complex<f32>> {
    use rayon::prelude::*;

    edges
        .par_chunks(chunk)
        .fold(
            || vec![Complex::new(0.0, 0.0); width * height],
            |mut cells, chunk_pixels| {
                let mut votes: Vec<(u32, Complex<f32>)> =
                    Vec::with_capacity(chunk_pixels.len().saturating_mul(weights.len()));
                collect_chunk_votes(grad, chunk_pixels, signed_radii, weights, &mut votes);
                for &(idx, w) in &votes {
                    cells[idx as usize] += w;
                }
                cells
            },
        )
        .reduce(
            || vec![Complex::new(0.0, 0.0); width * height],
            |mut a, b| {
                for (dst, src) in a.iter_mut().zip(b) {
                    *dst += src;
                }
                a
            },
        )
}

fn collect_chunk_votes(
    grad: &GradientField,
    chunk_pixels: &[(u32, u32)],
    signed_radii: &[f32],
    weights: &[Complex<f32>],
    out: &mut Vec<(u32, Complex<f32>)>,
) {
    let width = grad.mag.w as i64;
    let height = grad.mag.h as i64;
    for &(ex, ey) in chunk_pixels {
        let i = ey as usize * grad.mag.stride + ex as usize;
        let m = grad.mag.data[i];
        if m <= 0.0 {
            continue;
        }
        let ux = grad.gx.data[i] / m;
        let uy = grad.gy.data[i] / m;
        for (k, &rr) in signed_radii.iter().enumerate() {
            // Gradients point toward increasing intensity, so a bright
            // object's center lies along +grad and a dark one's along -grad;
            // the sign is folded into rr.
            let xc = ex as f32 + rr * ux;
            let yc = ey as f32 + rr * uy;
            let xi = xc.round() as i64;
            let yi = yc.round() as i64;
            if xi < 0 || yi < 0 || xi >= width || yi >= height {
                continue;
            }
            out.push(((yi * width + xi) as u32, weights[k]));
        }
    }
}
