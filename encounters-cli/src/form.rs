// Line-oriented form session: each input line is one widget event or action.

use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use tokio::io::{AsyncBufReadExt, BufReader};

use encounters_ai::{FormSession, PLACEHOLDER_TEXT};
use encounters_params::{ClimateType, NumericField, ParameterState, StarType};

const HELP: &str = "\
commands:
  set <field> <value>     fields: planet-size distance n2 o2 co2 day-length year-length axial-tilt timeline
  climate <name|none>     Tropical, Arid, Temperate, Polar
  star <name|none>        Sun, Dwarf (sets the distance)
  show                    current values and output
  json                    current values as JSON
  prompt                  the prompt a generate would send
  generate                submit to the model
  help | quit";

#[derive(Debug, Clone, PartialEq)]
enum FormCommand {
    Set(NumericField, f64),
    Climate(Option<ClimateType>),
    Star(Option<StarType>),
    Show,
    Json,
    Prompt,
    Generate,
    Help,
    Quit,
}

fn optional<T>(arg: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match arg.to_ascii_lowercase().as_str() {
        "none" | "unset" => Ok(None),
        _ => Ok(Some(arg.parse()?)),
    }
}

impl FromStr for FormCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let cmd = match words.as_slice() {
            ["set", field, value] => {
                let value: f64 = value
                    .parse()
                    .with_context(|| format!("not a number: {value}"))?;
                FormCommand::Set(field.parse()?, value)
            }
            ["climate", name] => FormCommand::Climate(optional(name)?),
            ["star", name] => FormCommand::Star(optional(name)?),
            ["show"] => FormCommand::Show,
            ["json"] => FormCommand::Json,
            ["prompt"] => FormCommand::Prompt,
            ["generate"] => FormCommand::Generate,
            ["help"] | ["?"] => FormCommand::Help,
            ["quit"] | ["exit"] => FormCommand::Quit,
            [] => bail!("empty command"),
            [other, ..] => return Err(anyhow!("unrecognised command: {other} (try `help`)")),
        };
        Ok(cmd)
    }
}

fn render_field(state: &ParameterState, field: NumericField) -> String {
    let value = state.value(field);
    match field.unit() {
        unit @ ("%" | "°") => format!("{value}{unit}"),
        unit => format!("{value} {unit}"),
    }
}

fn show(session: &FormSession) {
    let state = session.state();
    let unset = || "(unset)".to_string();
    println!("climate: {}", state.climate_type().map_or_else(unset, |c| c.to_string()));
    println!("star: {}", state.star_type().map_or_else(unset, |s| s.label().to_string()));
    for field in NumericField::ALL {
        println!("{field}: {}", render_field(state, field));
    }
    println!("output: {}", session.result().display_text());
}

pub async fn run(session: &mut FormSession) -> anyhow::Result<ExitCode> {
    println!("Close Encounters: Visions of Life Beyond Earth");
    println!("Adjust the variables below to see what life could inhabit such a planet.");
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<FormCommand>() {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };

        match command {
            FormCommand::Set(field, value) => match session.state_mut().set(field, value) {
                Ok(_) => println!("{field}: {}", render_field(session.state(), field)),
                Err(err) => eprintln!("{err}"),
            },
            FormCommand::Climate(climate) => session.state_mut().set_climate_type(climate),
            FormCommand::Star(star) => {
                if let Some(distance) = session.state_mut().set_star_type(star) {
                    println!("distance: {distance} AU");
                }
            }
            FormCommand::Show => show(session),
            FormCommand::Json => {
                let json = serde_json::to_string_pretty(&session.state().snapshot())
                    .context("serialize snapshot")?;
                println!("{json}");
            }
            FormCommand::Prompt => match session.preview_prompt() {
                Ok(prompt) => println!("{prompt}"),
                Err(err) => eprintln!("{}", err.alert()),
            },
            FormCommand::Generate => {
                if session.preview_prompt().is_ok() {
                    println!("{PLACEHOLDER_TEXT}");
                }
                match session.generate().await {
                    Ok(result) => println!("{}", result.display_text()),
                    Err(err) => eprintln!("{}", err.alert()),
                }
            }
            FormCommand::Help => println!("{HELP}"),
            FormCommand::Quit => break,
        }
    }
    Ok(ExitCode::SUCCESS)
}
