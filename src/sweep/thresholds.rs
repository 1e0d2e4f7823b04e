//! Threshold grid for the eccentricity sweep.
//!
//! A range `[min, max]` split into `steps` equal intervals yields `steps + 1`
//! qualifiers, both endpoints included. Qualifiers are produced lazily.

use serde::Serialize;

use super::SweepError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepRange {
    pub min: f64,
    pub max: f64,
    pub steps: usize,
}

/// Largest accepted number of intervals.
pub const MAX_STEPS: usize = 1_000_000;

impl SweepRange {
    /// Validated range.
    pub fn new(min: f64, max: f64, steps: usize) -> Result<Self, SweepError> {
        if !(min.is_finite() && max.is_finite()) {
            return Err(SweepError::InvalidRange {
                reason: format!("bounds must be finite (min={min}, max={max})"),
            });
        }
        if min < 0.0 {
            return Err(SweepError::InvalidRange {
                reason: format!("minimum eccentricity must be >= 0 (got {min})"),
            });
        }
        if max < min {
            return Err(SweepError::InvalidRange {
                reason: format!("maximum ({max}) is below minimum ({min})"),
            });
        }
        if steps == 0 {
            return Err(SweepError::InvalidRange {
                reason: "number of steps must be >= 1".to_string(),
            });
        }
        if steps > MAX_STEPS {
            return Err(SweepError::InvalidRange {
                reason: format!("number of steps must be <= {MAX_STEPS} (got {steps})"),
            });
        }
        Ok(Self { min, max, steps })
    }

    pub fn step_size(&self) -> f64 {
        (self.max - self.min) / self.steps as f64
    }

    /// Qualifier for step `i` (`0..=steps`).
    pub fn threshold(&self, i: usize) -> f64 {
        self.min + self.step_size() * i as f64
    }

    pub fn thresholds(&self) -> impl Iterator<Item = f64> + '_ {
        (0..=self.steps).map(|i| self.threshold(i))
    }
}
