//! encounters-params: the planetary parameter form state.
//!
//! Design rules:
//! - Every numeric field has a fixed domain; assignments are clamped into it.
//! - Climate and star type start unset; everything else has a default.
//! - Changing the star type overwrites the orbital distance (the coupling rule).
//! - Consumers read immutable snapshots, never the live state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod kinds;
pub mod state;

pub use kinds::{ClimateType, StarType};
pub use state::{NumericField, ParameterSnapshot, ParameterState};

/// Closed numeric range a form field may hold, with an optional slider step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
}

impl Domain {
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: None,
        }
    }

    pub const fn stepped(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step: Some(step),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamp into `[min, max]`, then snap to the step grid if there is one.
    ///
    /// Bounds are multiples of the step, so snapping never leaves the range.
    pub fn clamp(&self, value: f64) -> f64 {
        let mut value = value.clamp(self.min, self.max);
        if let Some(step) = self.step {
            // Round through the inverse step so 0.1 steps land on the
            // nearest representable decimal (8.3, not 8.299999999999999).
            let scale = (1.0 / step).round();
            value = (value * scale).round() / scale;
        }
        value
    }
}

/// Errors raised when a widget event cannot be applied to the form.
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("unknown climate type: {0}")]
    UnknownClimate(String),

    #[error("unknown star type: {0}")]
    UnknownStar(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}
