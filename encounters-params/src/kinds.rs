//! Categorical inputs: climate and host star.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParamError;

/// Dominant surface climate of the planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimateType {
    Tropical,
    Arid,
    Temperate,
    Polar,
}

impl ClimateType {
    pub const ALL: [ClimateType; 4] = [
        ClimateType::Tropical,
        ClimateType::Arid,
        ClimateType::Temperate,
        ClimateType::Polar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClimateType::Tropical => "Tropical",
            ClimateType::Arid => "Arid",
            ClimateType::Temperate => "Temperate",
            ClimateType::Polar => "Polar",
        }
    }
}

impl fmt::Display for ClimateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClimateType {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ClimateType::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParamError::UnknownClimate(s.to_string()))
    }
}

/// Class of the host star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarType {
    /// Main-sequence, Sun-like star.
    Sun,
    /// Cool red dwarf.
    Dwarf,
}

impl StarType {
    pub const ALL: [StarType; 2] = [StarType::Sun, StarType::Dwarf];

    pub fn as_str(&self) -> &'static str {
        match self {
            StarType::Sun => "Sun",
            StarType::Dwarf => "Dwarf",
        }
    }

    /// Human-facing label for radio widgets.
    pub fn label(&self) -> &'static str {
        match self {
            StarType::Sun => "Main Sequence (Sun-like)",
            StarType::Dwarf => "Red Dwarf (Cooler)",
        }
    }

    /// Orbital distance (AU) the coupling rule assigns for this star.
    pub fn coupled_distance_au(&self) -> f64 {
        match self {
            StarType::Sun => 1.2,
            StarType::Dwarf => 0.2,
        }
    }
}

impl fmt::Display for StarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StarType {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        StarType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParamError::UnknownStar(s.to_string()))
    }
}
