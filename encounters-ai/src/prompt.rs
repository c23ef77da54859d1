//! Snapshot validation and prompt compilation.
//!
//! `validate` is the only gate between the form and the generation service:
//! it turns a snapshot into a `PlanetSpec`, which cannot exist with an unset
//! climate or star. `compile` is then infallible and deterministic.

use std::fmt;

use encounters_params::{ClimateType, ParameterSnapshot, StarType};
use thiserror::Error;

/// Alert shown to the user when a required selection is missing.
pub const VALIDATION_ALERT: &str = "Error: Please complete each field.";

/// Persona and task framing. The rendered parameter block follows it.
const PREAMBLE: &str = "You are an astrobiologist who is deeply passionate about explaining \
what life on other worlds could look like, and you have been commissioned to do exactly that. \
You will be given information about a hypothetical planet. Use it, together with your extensive \
knowledge, to write a thorough description of roughly 5000 words about the forms of life that \
could be found there. Describe 5 alien species in vivid detail, with emphasis on their physical \
appearance and on how they coexist with one another. You are a skilled orator and your \
description should read like a David Attenborough nature documentary. Aim to intrigue the \
reader and stimulate their imagination while staying scientifically accurate. The information \
below can be used to infer further properties, including but not limited to gravitational \
strength, whether the planet is tidally locked, and the presence of moons and magnetic fields. \
Atmosphere composition is given in approximate relative values where 0 is low and 100 is high; \
assume other relevant gases are present as well. N2 is nitrogen, O2 is oxygen and CO2 is carbon \
dioxide. Timeline is the age of the planet. Take all of these factors into consideration. If any \
input seems impossible even in the hypothetical realm, adjust it to a slightly more plausible \
scenario and include a brief disclaimer at the end of your output. Here is the information about \
the planet you have been commissioned to work with: ";

/// A required selection was missing at submit time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("incomplete input, missing: {}", .missing.join(", "))]
pub struct IncompleteInput {
    pub missing: Vec<&'static str>,
}

impl IncompleteInput {
    /// The fixed, user-facing text for this error.
    pub fn alert(&self) -> &'static str {
        VALIDATION_ALERT
    }
}

/// A snapshot with every required selection present.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetSpec {
    pub climate: ClimateType,
    pub star: StarType,
    pub params: ParameterSnapshot,
}

/// Check that climate and star type are both selected.
///
/// Numeric fields always carry in-domain defaults and are not checked.
pub fn validate(snapshot: &ParameterSnapshot) -> Result<PlanetSpec, IncompleteInput> {
    match (snapshot.climate_type, snapshot.star_type) {
        (Some(climate), Some(star)) => Ok(PlanetSpec {
            climate,
            star,
            params: snapshot.clone(),
        }),
        (climate, star) => {
            let mut missing = Vec::new();
            if climate.is_none() {
                missing.push("climate type");
            }
            if star.is_none() {
                missing.push("star type");
            }
            Err(IncompleteInput { missing })
        }
    }
}

/// Renders the labelled parameter block, one field per line.
impl fmt::Display for PlanetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.params;
        writeln!(f, "Planet Size (Diameter): {} Km", p.planet_size)?;
        writeln!(f, "Climate Type: {}", self.climate)?;
        writeln!(f, "Type of Star: {}", self.star)?;
        writeln!(f, "Distance from Star (AU): {}", p.distance_from_star)?;
        writeln!(f, "Atmosphere:")?;
        writeln!(f, "N2: {}%", p.n2)?;
        writeln!(f, "O2: {}%", p.o2)?;
        writeln!(f, "CO2: {}%", p.co2)?;
        writeln!(f, "Day Length (Earth Hours): {}", p.day_length)?;
        writeln!(f, "Year Length (Earth Days): {}", p.year_length)?;
        writeln!(f, "Axial Tilt (Degrees): {}°", p.axial_tilt)?;
        writeln!(f, "Timeline: {} Billion Years", p.timeline)
    }
}

/// The exact text sent to the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPrompt(String);

impl CompiledPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CompiledPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Interpolate the parameter block after the fixed preamble.
pub fn compile(spec: &PlanetSpec) -> CompiledPrompt {
    CompiledPrompt(format!("{PREAMBLE}\n{spec}"))
}
