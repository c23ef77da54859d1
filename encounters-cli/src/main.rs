//! Close Encounters CLI - visions of life beyond Earth.
//!
//! Set planetary parameters, compile them into a prompt, and let a text
//! model describe what might live there.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use encounters_ai::{ClientConfig, FormSession, GeminiClient, RequestResult};
use encounters_params::{ClimateType, NumericField, ParamError, ParameterState, StarType};

mod form;

#[derive(Parser)]
#[command(name = "encounters")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model name (overrides ENCOUNTERS_MODEL). The API key is read from GOOGLE_API_KEY.
    #[arg(long, global = true)]
    model: Option<String>,

    /// API base URL (overrides ENCOUNTERS_ENDPOINT).
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one narrative from the given parameters.
    Generate {
        #[command(flatten)]
        planet: PlanetArgs,

        /// Print the compiled prompt instead of calling the service.
        #[arg(long)]
        dry_run: bool,
    },
    /// Interactive form session on stdin.
    Form,
}

/// Field values, applied as change events. Out-of-range numbers are clamped.
#[derive(Args)]
struct PlanetArgs {
    /// Planet diameter in km (5000-20000).
    #[arg(long)]
    planet_size: Option<f64>,

    /// Tropical, Arid, Temperate or Polar.
    #[arg(long)]
    climate: Option<ClimateType>,

    /// Sun (main sequence) or Dwarf (red dwarf). Sets the distance.
    #[arg(long)]
    star: Option<StarType>,

    /// Distance from star in AU (0.9-1.5). Applied after --star.
    #[arg(long)]
    distance: Option<f64>,

    /// Relative N2 level (0-100).
    #[arg(long)]
    n2: Option<f64>,

    /// Relative O2 level (0-100).
    #[arg(long)]
    o2: Option<f64>,

    /// Relative CO2 level (0-100).
    #[arg(long)]
    co2: Option<f64>,

    /// Day length in Earth hours (1-48).
    #[arg(long)]
    day_length: Option<f64>,

    /// Year length in Earth days (1-1000).
    #[arg(long)]
    year_length: Option<f64>,

    /// Axial tilt in degrees (0-90).
    #[arg(long)]
    axial_tilt: Option<f64>,

    /// Planet age in billion years (4-12).
    #[arg(long)]
    timeline: Option<f64>,
}

impl PlanetArgs {
    /// Replay the flags into the form as if a user had moved each widget.
    fn apply(&self, state: &mut ParameterState) -> Result<(), ParamError> {
        let numeric = [
            (NumericField::PlanetSize, self.planet_size),
            (NumericField::N2, self.n2),
            (NumericField::O2, self.o2),
            (NumericField::Co2, self.co2),
            (NumericField::DayLength, self.day_length),
            (NumericField::YearLength, self.year_length),
            (NumericField::AxialTilt, self.axial_tilt),
            (NumericField::Timeline, self.timeline),
        ];
        for (field, value) in numeric {
            if let Some(value) = value {
                state.set(field, value)?;
            }
        }

        if self.climate.is_some() {
            state.set_climate_type(self.climate);
        }
        if self.star.is_some() {
            state.set_star_type(self.star);
        }
        // After the star, so an explicit distance wins over the coupled one.
        if let Some(distance) = self.distance {
            state.set(NumericField::DistanceFromStar, distance)?;
        }
        Ok(())
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn client_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let config = client_config(&cli);
    tracing::debug!(?config, "client configured");
    let mut session = FormSession::new(Arc::new(GeminiClient::new(config)));
    tracing::info!(session = %session.id(), "form session started");

    match cli.command {
        Commands::Generate { planet, dry_run } => {
            planet.apply(session.state_mut())?;
            generate_once(&mut session, dry_run).await
        }
        Commands::Form => form::run(&mut session).await,
    }
}

async fn generate_once(session: &mut FormSession, dry_run: bool) -> anyhow::Result<ExitCode> {
    if dry_run {
        return Ok(match session.preview_prompt() {
            Ok(prompt) => {
                println!("{prompt}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{}", err.alert());
                ExitCode::from(2)
            }
        });
    }

    println!("{}", session.result().display_text());
    match session.generate().await {
        Ok(result) => {
            println!("{}", result.display_text());
            Ok(match result {
                RequestResult::Success(_) => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            })
        }
        Err(err) => {
            eprintln!("{}", err.alert());
            Ok(ExitCode::from(2))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_distance_overrides_star_coupling() {
        let cli = Cli::parse_from([
            "encounters",
            "generate",
            "--climate",
            "arid",
            "--star",
            "sun",
            "--distance",
            "1.4",
        ]);
        let Commands::Generate { planet, .. } = cli.command else {
            panic!("expected generate");
        };

        let mut state = ParameterState::new();
        planet.apply(&mut state).unwrap();

        assert_eq!(state.climate_type(), Some(ClimateType::Arid));
        assert_eq!(state.star_type(), Some(StarType::Sun));
        assert_eq!(state.value(NumericField::DistanceFromStar), 1.4);
    }

    #[test]
    fn star_alone_couples_distance() {
        let cli = Cli::parse_from(["encounters", "generate", "--star", "Dwarf", "--n2", "120"]);
        let Commands::Generate { planet, .. } = cli.command else {
            panic!("expected generate");
        };

        let mut state = ParameterState::new();
        planet.apply(&mut state).unwrap();

        assert_eq!(state.value(NumericField::DistanceFromStar), 0.2);
        assert_eq!(state.value(NumericField::N2), 100.0);
    }

    #[test]
    fn unknown_climate_is_a_parse_error() {
        let parsed = Cli::try_parse_from(["encounters", "generate", "--climate", "swamp"]);
        assert!(parsed.is_err());
    }
}
