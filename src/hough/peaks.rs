//! Center extraction from the accumulator magnitude.
//!
//! Stages, in order:
//! 1. Smooth with a uniform box filter (default 5×5).
//! 2. Suppress shallow maxima: grayscale reconstruction by dilation of
//!    `smoothed - supp` under `smoothed`, where `supp` is the suppression
//!    threshold backed off by one float spacing so rounding can never push
//!    the suppressed level above the peak.
//! 3. Mask pixels whose 3×3 local maximum exceeds a third of the global
//!    peak.
//! 4. Label 8-connected components of the mask and take one centroid per
//!    component; the metric is the reconstructed map sampled at the
//!    integer-rounded centroid.
//! 5. Sort by descending metric (stable, so ties keep label order).

use crate::detector::params::ExtractParams;
use crate::image::{ImageF32, ImageView};
use std::cmp::Ordering;

/// Candidate circle center with its evidence metric.
#[derive(Clone, Copy, Debug)]
pub struct CenterCandidate {
    /// Sub-pixel centroid row.
    pub row: f32,
    /// Sub-pixel centroid column.
    pub col: f32,
    /// Reconstructed accumulator magnitude at the rounded centroid.
    pub metric: f32,
}

/// Extract center candidates, strongest first. Returns an empty vector when
/// no pixel survives the local-maximum cut.
pub fn extract_centers(
    magnitude: &ImageF32,
    supp_threshold: f32,
    params: &ExtractParams,
) -> Vec<CenterCandidate> {
    if magnitude.w == 0 || magnitude.h == 0 {
        return Vec::new();
    }

    let smoothed = box_filter(magnitude, params.smooth_filter_size);

    let supp = (supp_threshold - float_spacing(supp_threshold)).max(0.0);
    let mut marker = smoothed.clone();
    for v in marker.data.iter_mut() {
        *v -= supp;
    }
    let recon = reconstruct_by_dilation(&marker, &smoothed);

    let local_max = max_filter(&recon, params.local_max_window);
    let peak = local_max.max_value();
    if peak <= 0.0 {
        return Vec::new();
    }
    let cut = peak / 3.0;
    let mask: Vec<bool> = local_max.data.iter().map(|&v| v > cut).collect();

    let (labels, regions) = label_components(&mask, local_max.w, local_max.h);
    let mut candidates = component_centroids(&labels, regions, &recon);
    candidates.sort_by(|a, b| b.metric.partial_cmp(&a.metric).unwrap_or(Ordering::Equal));
    candidates
}

/// Uniform box average with replicated borders. `size <= 1` is a no-op.
fn box_filter(src: &ImageF32, size: usize) -> ImageF32 {
    if size <= 1 {
        return src.clone();
    }
    let half = (size / 2) as isize;
    let window = 2 * half + 1;
    let norm = 1.0 / (window * window) as f32;
    let w = src.w as isize;
    let h = src.h as isize;
    let mut out = ImageF32::new(src.w, src.h);
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0;
            for dy in -half..=half {
                let sy = (y + dy).clamp(0, h - 1) as usize;
                let row = src.row(sy);
                for dx in -half..=half {
                    let sx = (x + dx).clamp(0, w - 1) as usize;
                    sum += row[sx];
                }
            }
            out.set(x as usize, y as usize, sum * norm);
        }
    }
    out
}

/// Sliding-window maximum with replicated borders.
fn max_filter(src: &ImageF32, size: usize) -> ImageF32 {
    if size <= 1 {
        return src.clone();
    }
    let half = (size / 2) as isize;
    let w = src.w as isize;
    let h = src.h as isize;
    let mut out = ImageF32::new(src.w, src.h);
    for y in 0..h {
        for x in 0..w {
            let mut best = f32::NEG_INFINITY;
            for dy in -half..=half {
                let sy = (y + dy).clamp(0, h - 1) as usize;
                let row = src.row(sy);
                for dx in -half..=half {
                    let sx = (x + dx).clamp(0, w - 1) as usize;
                    best = best.max(row[sx]);
                }
            }
            out.set(x as usize, y as usize, best);
        }
    }
    out
}

/// Smallest representable increment at the magnitude of `x`.
fn float_spacing(x: f32) -> f32 {
    if !(x > 0.0) || !x.is_finite() {
        return f32::MIN_POSITIVE;
    }
    f32::from_bits(x.to_bits() + 1) - x
}

/// Grayscale reconstruction of `marker` by dilation under `mask`,
/// 8-connected.
///
/// Iterated raster/anti-raster sweeps: each pass propagates values downhill
/// through the image, clipped to the mask, until a full double sweep changes
/// nothing. Regional maxima of the mask whose prominence is below
/// `mask - marker` get merged into their surroundings; taller maxima are
/// truncated to plateaus at `peak - supp`.
fn reconstruct_by_dilation(marker: &ImageF32, mask: &ImageF32) -> ImageF32 {
    let w = mask.w;
    let h = mask.h;
    let mut out = marker.clone();
    for (v, &cap) in out.data.iter_mut().zip(&mask.data) {
        *v = v.min(cap);
    }
    if w == 0 || h == 0 {
        return out;
    }

    loop {
        let mut changed = false;

        // Forward raster: pull from the already-visited half-neighborhood.
        for y in 0..h {
            for x in 0..w {
                let mut v = out.get(x, y);
                if x > 0 {
                    v = v.max(out.get(x - 1, y));
                }
                if y > 0 {
                    v = v.max(out.get(x, y - 1));
                    if x > 0 {
                        v = v.max(out.get(x - 1, y - 1));
                    }
                    if x + 1 < w {
                        v = v.max(out.get(x + 1, y - 1));
                    }
                }
                v = v.min(mask.get(x, y));
                if v > out.get(x, y) {
                    out.set(x, y, v);
                    changed = true;
                }
            }
        }

        // Backward anti-raster with the mirrored half-neighborhood.
        for y in (0..h).rev() {
            for x in (0..w).rev() {
                let mut v = out.get(x, y);
                if x + 1 < w {
                    v = v.max(out.get(x + 1, y));
                }
                if y + 1 < h {
                    v = v.max(out.get(x, y + 1));
                    if x + 1 < w {
                        v = v.max(out.get(x + 1, y + 1));
                    }
                    if x > 0 {
                        v = v.max(out.get(x - 1, y + 1));
                    }
                }
                v = v.min(mask.get(x, y));
                if v > out.get(x, y) {
                    out.set(x, y, v);
                    changed = true;
                }
            }
        }

        if !changed {
            break;
        }
    }
    out
}

/// Two-pass union-find labeling of an 8-connected binary mask.
///
/// Returns per-pixel labels (0 = background) and the number of components;
/// labels are renumbered 1..=count in first-encounter order.
fn label_components(mask: &[bool], w: usize, h: usize) -> (Vec<u32>, usize) {
    let mut labels = vec![0u32; w * h];
    let mut parent: Vec<u32> = vec![0];

    fn find(parent: &mut [u32], mut x: u32) -> u32 {
        while parent[x as usize] != x {
            parent[x as usize] = parent[parent[x as usize] as usize];
            x = parent[x as usize];
        }
        x
    }

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            if !mask[idx] {
                continue;
            }

            let mut neighbors = [0u32; 4];
            let mut n = 0;
            if x > 0 && labels[idx - 1] > 0 {
                neighbors[n] = labels[idx - 1];
                n += 1;
            }
            if y > 0 {
                if labels[idx - w] > 0 {
                    neighbors[n] = labels[idx - w];
                    n += 1;
                }
                if x > 0 && labels[idx - w - 1] > 0 {
                    neighbors[n] = labels[idx - w - 1];
                    n += 1;
                }
                if x + 1 < w && labels[idx - w + 1] > 0 {
                    neighbors[n] = labels[idx - w + 1];
                    n += 1;
                }
            }

            if n == 0 {
                let fresh = parent.len() as u32;
                parent.push(fresh);
                labels[idx] = fresh;
            } else {
                let mut min_label = neighbors[0];
                for &nb in &neighbors[1..n] {
                    min_label = min_label.min(nb);
                }
                labels[idx] = min_label;
                for &nb in &neighbors[..n] {
                    let ra = find(&mut parent, min_label);
                    let rb = find(&mut parent, nb);
                    if ra != rb {
                        let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
                        parent[hi as usize] = lo;
                    }
                }
            }
        }
    }

    // Flatten provisional labels to 1..=count in first-encounter order.
    let mut remap = vec![0u32; parent.len()];
    let mut count = 0u32;
    for label in labels.iter_mut() {
        if *label == 0 {
            continue;
        }
        let root = find(&mut parent, *label);
        if remap[root as usize] == 0 {
            count += 1;
            remap[root as usize] = count;
        }
        *label = remap[root as usize];
    }

    (labels, count as usize)
}

/// Unweighted centroid per labeled region, metric sampled from `map` at the
/// integer-rounded centroid.
fn component_centroids(labels: &[u32], regions: usize, map: &ImageF32) -> Vec<CenterCandidate> {
    #[derive(Clone, Copy, Default)]
    struct RegionAccum {
        sum_row: f64,
        sum_col: f64,
        pixels: u64,
    }

    let w = map.w;
    let mut accums = vec![RegionAccum::default(); regions + 1];
    for (idx, &label) in labels.iter().enumerate() {
        if label == 0 {
            continue;
        }
        let acc = &mut accums[label as usize];
        acc.sum_row += (idx / w) as f64;
        acc.sum_col += (idx % w) as f64;
        acc.pixels += 1;
    }

    accums
        .into_iter()
        .skip(1)
        .filter(|acc| acc.pixels > 0)
        .map(|acc| {
            let row = (acc.sum_row / acc.pixels as f64) as f32;
            let col = (acc.sum_col / acc.pixels as f64) as f32;
            let ri = (row.round() as usize).min(map.h - 1);
            let ci = (col.round() as usize).min(map.w - 1);
            CenterCandidate {
                row,
                col,
                metric: map.get(ci, ri),
            }
        })
        .collect()
}
