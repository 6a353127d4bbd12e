pub mod batch;
pub mod config;
pub mod rating;
pub mod score;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use flowscore_core::{
    flow_coaching_message, Config, HourBasis, RatingScale, ScoreResult, ScoringOptions,
    ValidationMode,
};
use serde::Serialize;

pub type CliResult = flowscore_core::error::Result<()>;

/// Scoring options that override the config file for one invocation.
#[derive(Args, Debug)]
pub struct ScoringOverrides {
    /// Reject inconsistent sessions instead of scoring them
    #[arg(long)]
    pub strict: bool,
    /// Clock used for the start hour: local, recorded or utc
    #[arg(long, value_name = "BASIS")]
    pub hour_basis: Option<HourBasis>,
    /// Scale of the focus ratings in the input (5 or 10)
    #[arg(long, value_name = "POINTS", value_parser = parse_rating_scale)]
    pub rating_scale: Option<RatingScale>,
    /// Attach a coaching message to each result
    #[arg(long)]
    pub coach: bool,
    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

impl ScoringOverrides {
    pub fn apply(&self, mut options: ScoringOptions) -> ScoringOptions {
        if self.strict {
            options.validation = ValidationMode::Strict;
        }
        if let Some(basis) = self.hour_basis {
            options.hour_basis = basis;
        }
        if let Some(scale) = self.rating_scale {
            options.rating_scale = scale;
        }
        options
    }
}

fn parse_rating_scale(raw: &str) -> Result<RatingScale, String> {
    let points: u8 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a rating scale"))?;
    RatingScale::try_from(points)
}

/// A score as printed by the CLI, optionally with its coaching message.
#[derive(Debug, Serialize)]
pub struct ScoreOutput {
    #[serde(flatten)]
    pub result: ScoreResult,
    #[serde(rename = "coachingMessage", skip_serializing_if = "Option::is_none")]
    pub coaching_message: Option<String>,
}

impl ScoreOutput {
    pub fn new(result: ScoreResult, coach: bool) -> Self {
        Self {
            coaching_message: coach.then(|| flow_coaching_message(&result)),
            result,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config, flowscore_core::ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Read the input file, or stdin when no file (or `-`) is given.
pub fn read_input(file: Option<&PathBuf>) -> std::io::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> CliResult {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
