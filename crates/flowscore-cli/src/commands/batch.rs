use std::path::{Path, PathBuf};

use clap::Args;
use flowscore_core::{
    analyze_score_distribution, CoreError, FlowScoreEngine, ScoreDistribution, SessionRecord,
    ValidationError,
};
use serde::Serialize;

use super::{load_config, print_json, read_input, CliResult, ScoreOutput, ScoringOverrides};

#[derive(Args)]
pub struct BatchArgs {
    /// JSON array of sessions (stdin when omitted or "-")
    file: Option<PathBuf>,
    #[command(flatten)]
    overrides: ScoringOverrides,
}

#[derive(Serialize)]
struct BatchOutput {
    results: Vec<ScoreOutput>,
    distribution: ScoreDistribution,
}

pub fn run(args: BatchArgs, config_path: Option<&Path>) -> CliResult {
    let config = load_config(config_path)?;
    let input = read_input(args.file.as_ref())?;
    let sessions: Vec<SessionRecord> = serde_json::from_str(&input)?;

    let engine = FlowScoreEngine::with_options(args.overrides.apply(config.scoring));
    let coach = args.overrides.coach || config.output.coach;

    let mut results = Vec::with_capacity(sessions.len());
    for (index, session) in sessions.iter().enumerate() {
        let result = engine
            .try_score(session)
            .map_err(|source| CoreError::Session { index, source })?;
        results.push(ScoreOutput::new(result, coach));
    }

    let scores: Vec<u32> = results.iter().map(|r| r.result.score).collect();
    let distribution = analyze_score_distribution(&scores)
        .ok_or_else(|| ValidationError::EmptyCollection("sessions".to_string()))?;
    tracing::debug!(count = distribution.count, mean = distribution.mean, "scored batch");

    let output = BatchOutput {
        results,
        distribution,
    };
    print_json(&output, config.output.pretty && !args.overrides.compact)
}
