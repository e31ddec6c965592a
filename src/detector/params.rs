//! Parameter types configuring the detector stages.
//!
//! All knobs the pipeline consumes live here as explicit structures with
//! documented defaults; nothing is read from free-floating globals. The
//! radius range is the only parameter without a meaningful universal
//! default, so [`CircleParams::new`] takes it explicitly.

use crate::types::DetectError;
use serde::{Deserialize, Serialize};

/// Contrast polarity of the circles to look for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Objects brighter than their background.
    Bright,
    /// Objects darker than their background.
    Dark,
}

/// Bounded-memory knobs for the vote accumulation stage.
#[derive(Clone, Debug)]
pub struct AccumParams {
    /// Cap on staged vote elements per chunk; the chunk length is
    /// `max_working_set / radius_samples`.
    pub max_working_set: usize,
}

impl Default for AccumParams {
    fn default() -> Self {
        Self {
            max_working_set: 1_000_000,
        }
    }
}

/// Knobs for the center-extraction stage.
#[derive(Clone, Debug)]
pub struct ExtractParams {
    /// Side of the uniform smoothing filter applied to the accumulator
    /// magnitude (odd).
    pub smooth_filter_size: usize,
    /// Side of the local-maximum window (odd).
    pub local_max_window: usize,
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            smooth_filter_size: 5,
            local_max_window: 3,
        }
    }
}

/// Detector-wide parameters.
#[derive(Clone, Debug)]
pub struct CircleParams {
    /// Smallest candidate radius, in pixels (> 0).
    pub min_radius: f32,
    /// Largest candidate radius, in pixels (>= min_radius + one step).
    pub max_radius: f32,
    /// Contrast polarity of the sought circles.
    pub polarity: Polarity,
    /// Detection sensitivity in (0, 1]; candidates with metric below
    /// `1 - sensitivity` are discarded.
    pub sensitivity: f32,
    /// Normalized gradient threshold in (0, 1]; `None` selects it
    /// automatically with a global bimodal split.
    pub edge_threshold: Option<f32>,
    /// Vote-accumulation memory bounds.
    pub accum: AccumParams,
    /// Center-extraction windows.
    pub extract: ExtractParams,
}

impl CircleParams {
    /// Parameters for the given radius range with every other knob at its
    /// default.
    pub fn new(min_radius: f32, max_radius: f32) -> Self {
        Self {
            min_radius,
            max_radius,
            polarity: Polarity::Bright,
            sensitivity: 0.95,
            edge_threshold: None,
            accum: AccumParams::default(),
            extract: ExtractParams::default(),
        }
    }

    /// Check the unit-interval knobs; the radius range is validated when the
    /// sample ladder is built.
    pub fn validate(&self) -> Result<(), DetectError> {
        if !(self.sensitivity > 0.0 && self.sensitivity <= 1.0) {
            return Err(DetectError::InvalidSensitivity(self.sensitivity));
        }
        if let Some(t) = self.edge_threshold {
            if !(t > 0.0 && t <= 1.0) {
                return Err(DetectError::InvalidEdgeThreshold(t));
            }
        }
        Ok(())
    }

    /// Metric threshold implied by the sensitivity.
    pub fn accum_threshold(&self) -> f32 {
        1.0 - self.sensitivity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_documented_values() {
        let p = CircleParams::new(10.0, 40.0);
        assert_eq!(p.accum.max_working_set, 1_000_000);
        assert_eq!(p.extract.smooth_filter_size, 5);
        assert_eq!(p.extract.local_max_window, 3);
        assert_eq!(p.polarity, Polarity::Bright);
        assert!((p.sensitivity - 0.95).abs() < 1e-6);
        assert!(p.edge_threshold.is_none());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn unit_interval_knobs_are_checked() {
        let mut p = CircleParams::new(10.0, 40.0);
        p.sensitivity = 0.0;
        assert!(matches!(
            p.validate(),
            Err(DetectError::InvalidSensitivity(_))
        ));
        p.sensitivity = 0.5;
        p.edge_threshold = Some(1.5);
        assert!(matches!(
            p.validate(),
            Err(DetectError::InvalidEdgeThreshold(_))
        ));
        p.edge_threshold = Some(0.3);
        assert!(p.validate().is_ok());
        assert!((p.accum_threshold() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn polarity_parses_lowercase() {
        let p: Polarity = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(p, Polarity::Dark);
    }
}
