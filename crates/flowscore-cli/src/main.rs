use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "flowscore", version, about = "Flow Score CLI")]
struct Cli {
    /// Config file (defaults to ~/.config/flowscore/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log scoring details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one session read from a JSON file or stdin
    Score(commands::score::ScoreArgs),
    /// Score a JSON array of sessions and summarize the distribution
    Batch(commands::batch::BatchArgs),
    /// Focus rating helpers
    Rating {
        #[command(subcommand)]
        action: commands::rating::RatingAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Install the stderr subscriber. `FLOWSCORE_LOG` overrides the level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FLOWSCORE_LOG")
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Score(args) => commands::score::run(args, config_path),
        Commands::Batch(args) => commands::batch::run(args, config_path),
        Commands::Rating { action } => commands::rating::run(action),
        Commands::Config { action } => commands::config::run(action, config_path),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
