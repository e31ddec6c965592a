//! Detector pipeline driving circle detection end-to-end.
//!
//! [`CircleDetector`] wires the stages into one call: gradient extraction,
//! edge selection, phase-coded vote accumulation, center extraction,
//! sensitivity filtering and radius decoding. Each stage produces a fresh
//! artifact consumed by the next; nothing is mutated across stage
//! boundaries, and the input image can be discarded once the gradients
//! exist.
//!
//! Typical usage:
//! ```no_run
//! use circle_detector::{CircleDetector, CircleParams};
//! use circle_detector::image::ImageU8;
//!
//! # fn example(gray: ImageU8) {
//! let detector = CircleDetector::new(CircleParams::new(10.0, 40.0));
//! match detector.detect(gray) {
//!     Ok(found) => println!("{} circles", found.len()),
//!     Err(err) => eprintln!("bad parameters: {err}"),
//! }
//! # }
//! ```
use super::params::CircleParams;
use crate::diagnostics::{
    AccumulationStage, DecodeStage, DetectionReport, EdgeStage, ExtractionStage, GradientStage,
    InputDescriptor, PipelineTrace, TimingBreakdown,
};
use crate::edges::{select_edge_pixels, sobel_gradients};
use crate::hough::{accumulate_votes, chunk_len, extract_centers, RadiusSamples};
use crate::image::{gray, ImageF32, ImageU8};
use crate::types::{Circle, CircleSet, DetectError};
use log::debug;
use std::time::Instant;

/// Circle detector orchestrating the phase-coded Hough pipeline.
pub struct CircleDetector {
    params: CircleParams,
}

impl CircleDetector {
    /// Create a detector with the supplied parameters. Parameter errors
    /// surface on the first `detect` call.
    pub fn new(params: CircleParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CircleParams {
        &self.params
    }

    /// Run on an 8-bit grayscale view, returning the compact result.
    pub fn detect(&self, image: ImageU8<'_>) -> Result<CircleSet, DetectError> {
        Ok(self.detect_with_diagnostics(image)?.result)
    }

    /// Run on an 8-bit grayscale view with a full diagnostics trace.
    pub fn detect_with_diagnostics(
        &self,
        image: ImageU8<'_>,
    ) -> Result<DetectionReport, DetectError> {
        let normalized = gray::normalize_u8(&image);
        self.detect_f32_with_diagnostics(&normalized)
    }

    /// Run on an already-normalized float image in `[0, 1]`.
    pub fn detect_f32(&self, image: &ImageF32) -> Result<CircleSet, DetectError> {
        Ok(self.detect_f32_with_diagnostics(image)?.result)
    }

    /// Run on an already-normalized float image with a diagnostics trace.
    pub fn detect_f32_with_diagnostics(
        &self,
        image: &ImageF32,
    ) -> Result<DetectionReport, DetectError> {
        self.params.validate()?;
        let samples = RadiusSamples::build(self.params.min_radius, self.params.max_radius)?;

        debug!(
            "CircleDetector::detect start w={} h={} radii={} polarity={:?}",
            image.w,
            image.h,
            samples.len(),
            self.params.polarity
        );
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        let grad_start = Instant::now();
        let grad = sobel_gradients(image);
        let grad_ms = grad_start.elapsed().as_secs_f64() * 1000.0;
        let gradient_stage = GradientStage {
            elapsed_ms: grad_ms,
            max_magnitude: grad.max_magnitude(),
        };

        let edge_start = Instant::now();
        let selection = select_edge_pixels(&grad, self.params.edge_threshold);
        let edge_ms = edge_start.elapsed().as_secs_f64() * 1000.0;
        let edge_stage = EdgeStage {
            elapsed_ms: edge_ms,
            threshold: selection.threshold,
            auto_threshold: selection.auto_threshold,
            pixels: selection.pixels.len(),
        };
        debug!(
            "CircleDetector::detect edges={} threshold={:.4} auto={}",
            selection.pixels.len(),
            selection.threshold,
            selection.auto_threshold
        );

        timings.push("gradient", grad_ms);
        timings.push("edge_select", edge_ms);

        if selection.pixels.is_empty() {
            // Flat or gradient-free input: empty result, not an error.
            debug!("CircleDetector::detect no edge pixels -> empty result");
            let latency = total_start.elapsed().as_secs_f64() * 1000.0;
            timings.total_ms = latency;
            return Ok(DetectionReport {
                result: CircleSet {
                    circles: Vec::new(),
                    latency_ms: latency,
                },
                trace: PipelineTrace {
                    input: InputDescriptor {
                        width: image.w,
                        height: image.h,
                    },
                    timings,
                    gradient: Some(gradient_stage),
                    edges: Some(edge_stage),
                    accumulation: None,
                    extraction: None,
                    decode: None,
                },
            });
        }

        let accum_start = Instant::now();
        let accumulator = accumulate_votes(
            &grad,
            &selection.pixels,
            &samples,
            self.params.polarity,
            &self.params.accum,
        );
        let accum_ms = accum_start.elapsed().as_secs_f64() * 1000.0;
        let per_chunk = chunk_len(&self.params.accum, samples.len());
        let accumulation_stage = AccumulationStage {
            elapsed_ms: accum_ms,
            radius_samples: samples.len(),
            chunk_len: per_chunk,
            chunks: selection.pixels.len().div_ceil(per_chunk),
        };
        timings.push("accumulate", accum_ms);

        let accum_threshold = self.params.accum_threshold();
        let extract_start = Instant::now();
        let magnitude = accumulator.magnitude();
        let candidates = extract_centers(&magnitude, accum_threshold, &self.params.extract);
        let total_candidates = candidates.len();
        let kept: Vec<_> = candidates
            .into_iter()
            .filter(|c| c.metric >= accum_threshold)
            .collect();
        let extract_ms = extract_start.elapsed().as_secs_f64() * 1000.0;
        let extraction_stage = ExtractionStage {
            elapsed_ms: extract_ms,
            candidates: total_candidates,
            kept: kept.len(),
        };
        timings.push("extract_centers", extract_ms);
        debug!(
            "CircleDetector::detect candidates={} kept={}",
            total_candidates,
            kept.len()
        );

        let decode_start = Instant::now();
        let circles: Vec<Circle> = kept
            .iter()
            .map(|c| {
                let ci = (c.col.round() as usize).min(accumulator.width - 1);
                let ri = (c.row.round() as usize).min(accumulator.height - 1);
                let radius = samples.decode_phase(accumulator.phase_at(ci, ri));
                Circle {
                    row: c.row,
                    col: c.col,
                    radius,
                    metric: c.metric,
                }
            })
            .collect();
        let decode_ms = decode_start.elapsed().as_secs_f64() * 1000.0;
        let decode_stage = DecodeStage {
            elapsed_ms: decode_ms,
            circles: circles.len(),
        };
        timings.push("decode_radii", decode_ms);

        let latency = total_start.elapsed().as_secs_f64() * 1000.0;
        timings.total_ms = latency;
        debug!(
            "CircleDetector::detect done circles={} latency_ms={:.3}",
            circles.len(),
            latency
        );

        Ok(DetectionReport {
            result: CircleSet {
                circles,
                latency_ms: latency,
            },
            trace: PipelineTrace {
                input: InputDescriptor {
                    width: image.w,
                    height: image.h,
                },
                timings,
                gradient: Some(gradient_stage),
                edges: Some(edge_stage),
                accumulation: Some(accumulation_stage),
                extraction: Some(extraction_stage),
                decode: Some(decode_stage),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::params::Polarity;

    #[test]
    fn invalid_parameters_fail_before_any_work() {
        let image = ImageF32::new(32, 32);

        let mut params = CircleParams::new(0.0, 10.0);
        let detector = CircleDetector::new(params.clone());
        assert!(matches!(
            detector.detect_f32(&image),
            Err(DetectError::InvalidRadiusRange { .. })
        ));

        params = CircleParams::new(5.0, 20.0);
        params.sensitivity = 1.5;
        let detector = CircleDetector::new(params);
        assert!(matches!(
            detector.detect_f32(&image),
            Err(DetectError::InvalidSensitivity(_))
        ));
    }

    #[test]
    fn flat_image_yields_empty_result_with_trace() {
        let mut image = ImageF32::new(64, 64);
        for v in image.data.iter_mut() {
            *v = 0.7;
        }
        let mut params = CircleParams::new(5.0, 20.0);
        params.polarity = Polarity::Dark;
        let detector = CircleDetector::new(params);
        let report = detector.detect_f32_with_diagnostics(&image).unwrap();
        assert!(report.result.is_empty());
        assert!(report.trace.accumulation.is_none());
        let edges = report.trace.edges.expect("edge stage recorded");
        assert_eq!(edges.pixels, 0);
    }
}
