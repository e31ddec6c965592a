//! Radius sampling and the log-phase radius code.
//!
//! Radii are sampled from `min` to `max` inclusive at a fixed 0.5 step. The
//! phase code maps the sampled range onto one full turn, log-linearly:
//!
//! `phi(r) = (ln r - ln r_first) / (ln r_last - ln r_first) * 2π - π`
//!
//! Each radius gets a complex vote weight `exp(i·phi(r)) / (2π·r)` whose
//! magnitude compensates for larger circles contributing proportionally more
//! boundary pixels. Decoding inverts the map on the accumulated phase.

use crate::types::DetectError;
use num_complex::Complex;
use std::f32::consts::PI;

/// Fixed sampling step between candidate radii.
pub const RADIUS_STEP: f32 = 0.5;

const TWO_PI: f32 = 2.0 * PI;
// Absorbs float noise at the top of the ladder so the end radius is included.
const END_SLACK: f32 = 1e-4;

/// Ordered, strictly increasing radius ladder with its phase code.
#[derive(Clone, Debug)]
pub struct RadiusSamples {
    radii: Vec<f32>,
    ln_first: f32,
    ln_span: f32,
}

impl RadiusSamples {
    /// Build the ladder, failing fast on an unusable range.
    ///
    /// At least two samples are required for the phase-range normalization,
    /// so `max_radius` must reach past `min_radius` by a full step.
    pub fn build(min_radius: f32, max_radius: f32) -> Result<Self, DetectError> {
        let invalid = DetectError::InvalidRadiusRange {
            min: min_radius,
            max: max_radius,
        };
        if !min_radius.is_finite() || !max_radius.is_finite() {
            return Err(invalid);
        }
        if min_radius <= 0.0 || max_radius < min_radius {
            return Err(invalid);
        }

        let mut radii = Vec::new();
        let mut k = 0usize;
        loop {
            let r = min_radius + RADIUS_STEP * k as f32;
            if r > max_radius + END_SLACK {
                break;
            }
            radii.push(r);
            k += 1;
        }
        if radii.len() < 2 {
            return Err(invalid);
        }

        let ln_first = radii[0].ln();
        let ln_span = radii[radii.len() - 1].ln() - ln_first;
        Ok(Self {
            radii,
            ln_first,
            ln_span,
        })
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    pub fn radii(&self) -> &[f32] {
        &self.radii
    }

    /// Phase code of radius `r`, in [-π, π] over the sampled range.
    pub fn phase_of(&self, r: f32) -> f32 {
        (r.ln() - self.ln_first) / self.ln_span * TWO_PI - PI
    }

    /// Complex vote weight per sample: magnitude `1/(2π·r)`, phase `phi(r)`.
    pub fn weights(&self) -> Vec<Complex<f32>> {
        self.radii
            .iter()
            .map(|&r| Complex::from_polar(1.0 / (TWO_PI * r), self.phase_of(r)))
            .collect()
    }

    /// Invert the phase code back into a radius estimate.
    ///
    /// Valid when the votes at the queried accumulator cell are dominated by
    /// a single radius; interference between radii at one cell is inherent
    /// to phase coding.
    pub fn decode_phase(&self, phase: f32) -> f32 {
        ((phase + PI) / TWO_PI * self.ln_span + self.ln_first).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unusable_ranges() {
        assert!(RadiusSamples::build(0.0, 10.0).is_err());
        assert!(RadiusSamples::build(-2.0, 10.0).is_err());
        assert!(RadiusSamples::build(10.0, 5.0).is_err());
        // Single sample after stepping.
        assert!(RadiusSamples::build(5.0, 5.2).is_err());
        assert!(RadiusSamples::build(f32::NAN, 10.0).is_err());
    }

    #[test]
    fn ladder_is_inclusive_and_stepped() {
        let s = RadiusSamples::build(5.0, 8.0).unwrap();
        assert_eq!(s.len(), 7);
        assert_eq!(s.radii()[0], 5.0);
        assert!((s.radii()[6] - 8.0).abs() < 1e-5);
    }

    #[test]
    fn phase_spans_one_full_turn() {
        let s = RadiusSamples::build(10.0, 30.0).unwrap();
        let first = s.phase_of(s.radii()[0]);
        let last = s.phase_of(*s.radii().last().unwrap());
        assert!((first + PI).abs() < 1e-5, "first={}", first);
        assert!((last - PI).abs() < 1e-4, "last={}", last);
    }

    #[test]
    fn decode_round_trips_every_sample() {
        let s = RadiusSamples::build(4.0, 25.0).unwrap();
        for &r in s.radii() {
            let decoded = s.decode_phase(s.phase_of(r));
            assert!((decoded - r).abs() < 1e-2, "r={} decoded={}", r, decoded);
        }
    }

    #[test]
    fn weight_magnitude_decays_with_radius() {
        let s = RadiusSamples::build(5.0, 20.0).unwrap();
        let w = s.weights();
        for pair in w.windows(2) {
            assert!(pair[1].norm() < pair[0].norm());
        }
        // |w| = 1/(2πr) exactly.
        assert!((w[0].norm() - 1.0 / (TWO_PI * 5.0)).abs() < 1e-7);
    }

    #[test]
    fn accumulated_vote_phase_recovers_the_radius() {
        // A cell holding exactly one sample's weight decodes to that sample.
        let s = RadiusSamples::build(6.0, 18.0).unwrap();
        let w = s.weights();
        for (k, &r) in s.radii().iter().enumerate() {
            // Skip the ladder ends where -π/+π wrap-around is ambiguous.
            if k == 0 || k == s.len() - 1 {
                continue;
            }
            let decoded = s.decode_phase(w[k].arg());
            assert!(
                (decoded - r).abs() < RADIUS_STEP,
                "r={} decoded={}",
                r,
                decoded
            );
        }
    }
}
