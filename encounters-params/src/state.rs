//! Live form state and its snapshots.
//!
//! `ParameterState` is the single writer for every planetary input. Widgets
//! push value-change events into it; the request side only ever sees a
//! `ParameterSnapshot` copied out at submit time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::{ClimateType, Domain, ParamError, StarType};

/// The numeric (slider-backed) fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumericField {
    PlanetSize,
    DistanceFromStar,
    N2,
    O2,
    Co2,
    DayLength,
    YearLength,
    AxialTilt,
    Timeline,
}

impl NumericField {
    pub const ALL: [NumericField; 9] = [
        NumericField::PlanetSize,
        NumericField::DistanceFromStar,
        NumericField::N2,
        NumericField::O2,
        NumericField::Co2,
        NumericField::DayLength,
        NumericField::YearLength,
        NumericField::AxialTilt,
        NumericField::Timeline,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NumericField::PlanetSize => "planet-size",
            NumericField::DistanceFromStar => "distance",
            NumericField::N2 => "n2",
            NumericField::O2 => "o2",
            NumericField::Co2 => "co2",
            NumericField::DayLength => "day-length",
            NumericField::YearLength => "year-length",
            NumericField::AxialTilt => "axial-tilt",
            NumericField::Timeline => "timeline",
        }
    }

    pub fn domain(&self) -> Domain {
        match self {
            NumericField::PlanetSize => Domain::stepped(5000.0, 20000.0, 1.0),
            NumericField::DistanceFromStar => Domain::stepped(0.9, 1.5, 0.1),
            NumericField::N2 | NumericField::O2 | NumericField::Co2 => {
                Domain::stepped(0.0, 100.0, 1.0)
            }
            NumericField::DayLength => Domain::stepped(1.0, 48.0, 1.0),
            NumericField::YearLength => Domain::stepped(1.0, 1000.0, 1.0),
            NumericField::AxialTilt => Domain::new(0.0, 90.0),
            NumericField::Timeline => Domain::stepped(4.0, 12.0, 0.1),
        }
    }

    /// Unit suffix shown next to the slider.
    pub fn unit(&self) -> &'static str {
        match self {
            NumericField::PlanetSize => "Km",
            NumericField::DistanceFromStar => "AU",
            NumericField::N2 | NumericField::O2 | NumericField::Co2 => "%",
            NumericField::DayLength => "hours",
            NumericField::YearLength => "days",
            NumericField::AxialTilt => "°",
            NumericField::Timeline => "billion years",
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericField {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        let key = match key.as_str() {
            "size" => "planet-size",
            "distance-from-star" => "distance",
            "day" => "day-length",
            "year" => "year-length",
            "tilt" => "axial-tilt",
            other => other,
        };
        NumericField::ALL
            .into_iter()
            .find(|f| f.name() == key)
            .ok_or_else(|| ParamError::UnknownField(s.trim().to_string()))
    }
}

/// Immutable copy of every field value at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    /// Diameter in km. [5000, 20000]
    pub planet_size: u32,
    pub climate_type: Option<ClimateType>,
    pub star_type: Option<StarType>,
    /// AU. [0.9, 1.5] for manual input; the star coupling may write 0.2.
    pub distance_from_star: f64,
    /// Relative atmosphere composition, percent. [0, 100] each, no sum constraint.
    pub n2: u32,
    pub o2: u32,
    pub co2: u32,
    /// Earth hours. [1, 48]
    pub day_length: u32,
    /// Earth days. [1, 1000]
    pub year_length: u32,
    /// Degrees. [0, 90]
    pub axial_tilt: f64,
    /// Planet age in billion years. [4, 12], step 0.1
    pub timeline: f64,
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        Self {
            planet_size: 10000,
            climate_type: None,
            star_type: None,
            distance_from_star: 1.0,
            n2: 50,
            o2: 50,
            co2: 50,
            day_length: 24,
            year_length: 365,
            axial_tilt: 23.5,
            timeline: 8.0,
        }
    }
}

impl ParameterSnapshot {
    /// Current value of a numeric field, widened to `f64`.
    pub fn value(&self, field: NumericField) -> f64 {
        match field {
            NumericField::PlanetSize => f64::from(self.planet_size),
            NumericField::DistanceFromStar => self.distance_from_star,
            NumericField::N2 => f64::from(self.n2),
            NumericField::O2 => f64::from(self.o2),
            NumericField::Co2 => f64::from(self.co2),
            NumericField::DayLength => f64::from(self.day_length),
            NumericField::YearLength => f64::from(self.year_length),
            NumericField::AxialTilt => self.axial_tilt,
            NumericField::Timeline => self.timeline,
        }
    }
}

/// The form's mutable state. One instance per session.
#[derive(Debug, Clone, Default)]
pub struct ParameterState {
    values: ParameterSnapshot,
}

impl ParameterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy out the current values for downstream consumption.
    pub fn snapshot(&self) -> ParameterSnapshot {
        self.values.clone()
    }

    pub fn value(&self, field: NumericField) -> f64 {
        self.values.value(field)
    }

    pub fn climate_type(&self) -> Option<ClimateType> {
        self.values.climate_type
    }

    pub fn star_type(&self) -> Option<StarType> {
        self.values.star_type
    }

    /// Assign a numeric field, clamped (and snapped) into its domain.
    ///
    /// Returns the value actually stored. Non-finite input is rejected and
    /// leaves the field untouched.
    pub fn set(&mut self, field: NumericField, value: f64) -> Result<f64, ParamError> {
        if !value.is_finite() {
            warn!(field = field.name(), value, "rejected non-finite input");
            return Err(ParamError::NonFinite {
                field: field.name(),
                value,
            });
        }

        let stored = field.domain().clamp(value);
        if stored != value {
            debug!(field = field.name(), requested = value, stored, "clamped input");
        }

        let v = &mut self.values;
        match field {
            NumericField::PlanetSize => v.planet_size = stored as u32,
            NumericField::DistanceFromStar => v.distance_from_star = stored,
            NumericField::N2 => v.n2 = stored as u32,
            NumericField::O2 => v.o2 = stored as u32,
            NumericField::Co2 => v.co2 = stored as u32,
            NumericField::DayLength => v.day_length = stored as u32,
            NumericField::YearLength => v.year_length = stored as u32,
            NumericField::AxialTilt => v.axial_tilt = stored,
            NumericField::Timeline => v.timeline = stored,
        }
        Ok(stored)
    }

    pub fn set_climate_type(&mut self, climate: Option<ClimateType>) {
        self.values.climate_type = climate;
    }

    /// Assign the star type and run the star/distance coupling rule.
    ///
    /// The rule fires only when the value actually changes to a known star.
    /// Returns the coupled distance when it fired.
    pub fn set_star_type(&mut self, star: Option<StarType>) -> Option<f64> {
        if self.values.star_type == star {
            return None;
        }
        self.values.star_type = star;
        self.apply_star_coupling()
    }

    /// Overwrite the orbital distance from the current star type.
    ///
    /// Writes the mapped value directly, bypassing the manual domain.
    fn apply_star_coupling(&mut self) -> Option<f64> {
        let star = self.values.star_type?;
        let distance = star.coupled_distance_au();
        debug!(
            star = star.as_str(),
            previous = self.values.distance_from_star,
            distance,
            "star type changed, distance coupled"
        );
        self.values.distance_from_star = distance;
        Some(distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_form() {
        let s = ParameterState::new().snapshot();
        assert_eq!(s.planet_size, 10000);
        assert_eq!(s.climate_type, None);
        assert_eq!(s.star_type, None);
        assert_eq!(s.distance_from_star, 1.0);
        assert_eq!((s.n2, s.o2, s.co2), (50, 50, 50));
        assert_eq!(s.day_length, 24);
        assert_eq!(s.year_length, 365);
        assert_eq!(s.axial_tilt, 23.5);
        assert_eq!(s.timeline, 8.0);
    }

    #[test]
    fn every_default_is_inside_its_domain() {
        let s = ParameterSnapshot::default();
        for field in NumericField::ALL {
            assert!(field.domain().contains(s.value(field)), "{field}");
        }
    }

    #[test]
    fn field_names_parse_back() {
        for field in NumericField::ALL {
            assert_eq!(field.name().parse::<NumericField>(), Ok(field));
        }
        assert_eq!("tilt".parse::<NumericField>(), Ok(NumericField::AxialTilt));
        assert_eq!("Planet_Size".parse::<NumericField>(), Ok(NumericField::PlanetSize));
        assert!("gravity".parse::<NumericField>().is_err());
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let mut state = ParameterState::new();
        assert!(state.set(NumericField::AxialTilt, f64::NAN).is_err());
        assert!(state.set(NumericField::PlanetSize, f64::INFINITY).is_err());
        assert_eq!(state.snapshot(), ParameterSnapshot::default());
    }

    #[test]
    fn same_star_twice_fires_coupling_once() {
        let mut state = ParameterState::new();
        assert_eq!(state.set_star_type(Some(StarType::Sun)), Some(1.2));
        state.set(NumericField::DistanceFromStar, 1.4).unwrap();
        assert_eq!(state.set_star_type(Some(StarType::Sun)), None);
        assert_eq!(state.value(NumericField::DistanceFromStar), 1.4);
    }
}
