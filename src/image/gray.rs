//! Grayscale normalization into the float domain the pipeline consumes.
//!
//! Every stage downstream of the gradient computation works on a
//! single-channel float matrix with values in `[0, 1]`. The helpers here
//! produce that matrix from 8-bit views or caller-supplied raw buffers;
//! color decoding itself lives in [`crate::image::io`].

use super::{ImageF32, ImageU8, ImageView};
use crate::types::DetectError;

/// Rescale an 8-bit grayscale view to floats in `[0, 1]`.
pub fn normalize_u8(gray: &ImageU8<'_>) -> ImageF32 {
    let mut out = ImageF32::new(gray.w, gray.h);
    for y in 0..gray.h {
        let src = gray.row(y);
        let dst = out.row_mut(y);
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = s as f32 / 255.0;
        }
    }
    out
}

/// Wrap a caller-supplied row-major float buffer, validating the shape.
///
/// Values are expected in `[0, 1]` already; no rescaling is applied.
pub fn from_raw_f32(width: usize, height: usize, data: Vec<f32>) -> Result<ImageF32, DetectError> {
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidImage {
            reason: format!("empty dimensions {}x{}", width, height),
        });
    }
    if data.len() != width * height {
        return Err(DetectError::InvalidImage {
            reason: format!(
                "buffer length {} does not match {}x{}={}",
                data.len(),
                width,
                height,
                width * height
            ),
        });
    }
    Ok(ImageF32 {
        w: width,
        h: height,
        stride: width,
        data,
    })
}
