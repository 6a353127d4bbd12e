use std::path::{Path, PathBuf};

use clap::Args;
use flowscore_core::{FlowScoreEngine, SessionRecord};

use super::{load_config, print_json, read_input, CliResult, ScoreOutput, ScoringOverrides};

#[derive(Args)]
pub struct ScoreArgs {
    /// Session JSON file (stdin when omitted or "-")
    file: Option<PathBuf>,
    #[command(flatten)]
    overrides: ScoringOverrides,
}

pub fn run(args: ScoreArgs, config_path: Option<&Path>) -> CliResult {
    let config = load_config(config_path)?;
    let input = read_input(args.file.as_ref())?;
    let session: SessionRecord = serde_json::from_str(&input)?;

    let engine = FlowScoreEngine::with_options(args.overrides.apply(config.scoring));
    let result = engine.try_score(&session)?;

    let output = ScoreOutput::new(result, args.overrides.coach || config.output.coach);
    print_json(&output, config.output.pretty && !args.overrides.compact)
}
