//! Image gradients with magnitude, the first stage of the pipeline.
//!
//! - Correlates a fixed 3×3 Sobel kernel pair (`X` and `Y`) with border
//!   clamping (replicate).
//! - Outputs per-pixel `gx`, `gy`, `mag = sqrt(gx^2 + gy^2)`.
//!
//! The gradient points toward increasing intensity: for a bright disk on a
//! dark background, the direction at a boundary pixel aims at the disk
//! center. The voting stage relies on that orientation convention.
//!
//! Complexity: O(W·H); memory: three float buffers.
use crate::image::{ImageF32, ImageView};

type Kernel3 = [[f32; 3]; 3];

// d/dx: positive where intensity grows to the right.
const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
// d/dy: positive where intensity grows downward (its transpose).
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Per-pixel gradient buffers.
#[derive(Clone, Debug)]
pub struct GradientField {
    /// Horizontal derivative (correlation with kernel X)
    pub gx: ImageF32,
    /// Vertical derivative (correlation with kernel Y)
    pub gy: ImageF32,
    /// Euclidean magnitude per pixel: `sqrt(gx^2 + gy^2)`
    pub mag: ImageF32,
}

impl GradientField {
    /// Largest gradient magnitude in the field.
    pub fn max_magnitude(&self) -> f32 {
        self.mag.max_value()
    }
}

/// Compute Sobel gradients on a single-channel float image.
pub fn sobel_gradients(l: &ImageF32) -> GradientField {
    let w = l.w;
    let h = l.h;
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);

    if w == 0 || h == 0 {
        return GradientField { gx, gy, mag };
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        let out_gx = gx.row_mut(y);
        let out_gy = gy.row_mut(y);
        let out_mag = mag.row_mut(y);
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];

            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, src_row) in rows.iter().enumerate() {
                let kx_row = &SOBEL_KERNEL_X[ky];
                let ky_row = &SOBEL_KERNEL_Y[ky];
                sum_x += src_row[x_idx[0]] * kx_row[0]
                    + src_row[x_idx[1]] * kx_row[1]
                    + src_row[x_idx[2]] * kx_row[2];
                sum_y += src_row[x_idx[0]] * ky_row[0]
                    + src_row[x_idx[1]] * ky_row[1]
                    + src_row[x_idx[2]] * ky_row[2];
            }

            out_gx[x] = sum_x;
            out_gy[x] = sum_y;
            out_mag[x] = (sum_x * sum_x + sum_y * sum_y).sqrt();
        }
    }

    GradientField { gx, gy, mag }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_image(w: usize, h: usize, vertical: bool) -> ImageF32 {
        let mut img = ImageF32::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let bright = if vertical { x >= w / 2 } else { y >= h / 2 };
                img.set(x, y, if bright { 1.0 } else { 0.0 });
            }
        }
        img
    }

    #[test]
    fn vertical_step_gives_positive_gx() {
        let img = step_image(8, 8, true);
        let grad = sobel_gradients(&img);
        let x = 8 / 2 - 1;
        assert!(grad.gx.get(x, 4) > 0.0);
        assert!(grad.gy.get(x, 4).abs() < 1e-6);
        assert!(grad.mag.get(x, 4) > 0.0);
    }

    #[test]
    fn horizontal_step_gives_positive_gy() {
        let img = step_image(8, 8, false);
        let grad = sobel_gradients(&img);
        let y = 8 / 2 - 1;
        assert!(grad.gy.get(4, y) > 0.0);
        assert!(grad.gx.get(4, y).abs() < 1e-6);
    }

    #[test]
    fn flat_image_has_zero_magnitude() {
        let mut img = ImageF32::new(6, 6);
        for v in img.data.iter_mut() {
            *v = 0.5;
        }
        let grad = sobel_gradients(&img);
        assert_eq!(grad.max_magnitude(), 0.0);
    }
}
