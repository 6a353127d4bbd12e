use std::path::Path;

use clap::Subcommand;
use flowscore_core::{Config, ConfigError};

use super::{load_config, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "scoring.hour_basis", "output.pretty")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

fn save(config: &Config, config_path: Option<&Path>) -> Result<(), ConfigError> {
    match config_path {
        Some(path) => config.save_to(path),
        None => config.save(),
    }
}

pub fn run(action: ConfigAction, config_path: Option<&Path>) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config(config_path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(ConfigError::UnknownKey(key).into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config(config_path)?;
            config.set(&key, &value)?;
            save(&config, config_path)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = load_config(config_path)?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            save(&Config::default(), config_path)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
