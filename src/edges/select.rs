//! Edge-pixel selection above a gradient-magnitude threshold.
//!
//! The threshold is expressed as a fraction of the maximum magnitude. When
//! the caller does not supply one, a global bimodal split is computed: the
//! magnitude is rescaled to 0..255, an Otsu cut is taken on the histogram,
//! and the cut is normalized back to (0, 1].
use crate::edges::grad::GradientField;
use crate::image::ImageF32;

/// Selected edge pixels plus the normalized threshold that produced them.
#[derive(Clone, Debug)]
pub struct EdgeSelection {
    /// Edge coordinates as (x, y) pairs. Order only affects chunk boundaries
    /// downstream, never the accumulated result.
    pub pixels: Vec<(u32, u32)>,
    /// Normalized threshold actually applied, in [0, 1].
    pub threshold: f32,
    /// True when the threshold came from the automatic Otsu split.
    pub auto_threshold: bool,
}

/// Collect all pixels whose magnitude exceeds `threshold * max(mag)`.
///
/// A uniformly zero gradient field yields an empty selection.
pub fn select_edge_pixels(grad: &GradientField, edge_threshold: Option<f32>) -> EdgeSelection {
    let max_mag = grad.max_magnitude();
    if max_mag <= 0.0 {
        return EdgeSelection {
            pixels: Vec::new(),
            threshold: edge_threshold.unwrap_or(0.0),
            auto_threshold: edge_threshold.is_none(),
        };
    }

    let auto_threshold = edge_threshold.is_none();
    let threshold = match edge_threshold {
        Some(t) => t,
        None => otsu_threshold(&grad.mag, max_mag),
    };
    let cut = threshold * max_mag;

    let mut pixels = Vec::new();
    for y in 0..grad.mag.h {
        let row_start = y * grad.mag.stride;
        let row = &grad.mag.data[row_start..row_start + grad.mag.w];
        for (x, &m) in row.iter().enumerate() {
            if m > cut {
                pixels.push((x as u32, y as u32));
            }
        }
    }

    EdgeSelection {
        pixels,
        threshold,
        auto_threshold,
    }
}

/// Otsu cut on the magnitude rescaled to 0..255, normalized back to [0, 1].
fn otsu_threshold(mag: &ImageF32, max_mag: f32) -> f32 {
    let mut hist = [0u64; 256];
    for &v in &mag.data {
        let bin = ((v / max_mag) * 255.0).clamp(0.0, 255.0) as usize;
        hist[bin] += 1;
    }
    otsu_cut(&hist) as f32 / 255.0
}

/// Standard between-class-variance maximization over a 256-bin histogram.
fn otsu_cut(hist: &[u64; 256]) -> u8 {
    let total: f64 = hist.iter().map(|&c| c as f64).sum();
    if total <= 0.0 {
        return 0;
    }
    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut weight_bg = 0.0f64;
    let mut sum_bg = 0.0f64;
    let mut best_variance = 0.0f64;
    let mut best_cut = 0u8;

    for (level, &count) in hist.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += level as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let diff = mean_bg - mean_fg;
        let variance = weight_bg * weight_fg * diff * diff;
        if variance > best_variance {
            best_variance = variance;
            best_cut = level as u8;
        }
    }

    best_cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::grad::sobel_gradients;

    #[test]
    fn otsu_separates_a_bimodal_histogram() {
        let mut hist = [0u64; 256];
        hist[10] = 500;
        hist[200] = 500;
        let cut = otsu_cut(&hist);
        assert!(cut >= 10 && cut < 200, "cut={}", cut);
    }

    #[test]
    fn flat_gradient_selects_nothing() {
        let img = ImageF32::new(10, 10);
        let grad = sobel_gradients(&img);
        let sel = select_edge_pixels(&grad, None);
        assert!(sel.pixels.is_empty());
    }

    #[test]
    fn explicit_threshold_keeps_only_strong_pixels() {
        // Single bright pixel: the strongest responses ring it.
        let mut img = ImageF32::new(9, 9);
        img.set(4, 4, 1.0);
        let grad = sobel_gradients(&img);
        let strict = select_edge_pixels(&grad, Some(0.9));
        let loose = select_edge_pixels(&grad, Some(0.1));
        assert!(!loose.pixels.is_empty());
        assert!(strict.pixels.len() < loose.pixels.len());
        assert!(!strict.auto_threshold);
    }

    #[test]
    fn auto_threshold_reports_normalized_cut() {
        let mut img = ImageF32::new(16, 16);
        for y in 0..16 {
            for x in 8..16 {
                img.set(x, y, 1.0);
            }
        }
        let grad = sobel_gradients(&img);
        let sel = select_edge_pixels(&grad, None);
        assert!(sel.auto_threshold);
        assert!(sel.threshold >= 0.0 && sel.threshold <= 1.0);
        assert!(!sel.pixels.is_empty());
    }
}
