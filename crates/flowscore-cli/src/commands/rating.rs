use clap::Subcommand;
use flowscore_core::{convert_focus_rating, ValidationError};

use super::CliResult;

#[derive(Subcommand)]
pub enum RatingAction {
    /// Convert a 1-5 rating to the 1-10 scale
    Convert {
        /// Rating on the five-point scale
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
}

pub fn run(action: RatingAction) -> CliResult {
    match action {
        RatingAction::Convert { value } => {
            if !value.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: "rating".to_string(),
                    message: format!("expected a finite number, got {value}"),
                }
                .into());
            }
            println!("{}", convert_focus_rating(value));
        }
    }
    Ok(())
}
