//! # Flow Score Core Library
//!
//! This library scores completed study sessions. A session's timestamps,
//! self-reported focus rating and category blocks go in; a 300-1000 flow
//! score with an explainable breakdown comes out. A standalone CLI exposes
//! the same operations for scripting.
//!
//! ## Architecture
//!
//! - **Session**: Plain data types describing one completed session, with
//!   ISO-8601 interchange and an opt-in validation pass
//! - **Scoring**: The flow score engine and its five sub-scores (focus,
//!   duration, break hygiene, deep work, time of day)
//! - **Coaching**: Picks one tip from a finished score
//! - **Config**: TOML-based engine and output options
//!
//! ## Key Components
//!
//! - [`FlowScoreEngine`]: Stateless scorer configured by [`ScoringOptions`]
//! - [`calculate_flow_score`]: Scores with default options
//! - [`flow_coaching_message`]: Encouragement plus the weakest component's tip
//! - [`convert_focus_rating`]: 1-5 to 1-10 rating conversion
//! - [`Config`]: Configuration management

pub mod coaching;
pub mod config;
pub mod distribution;
pub mod error;
pub mod rating;
pub mod scoring;
pub mod session;

pub use coaching::{flow_coaching_message, weakest_component, ScoreTier, WeightedComponent};
pub use config::{Config, OutputConfig};
pub use distribution::{analyze_score_distribution, Percentiles, ScoreDistribution};
pub use error::{ConfigError, CoreError, ValidationError};
pub use rating::convert_focus_rating;
pub use scoring::{
    calculate_flow_score, FlowComponents, FlowDetails, FlowScoreEngine, FlowWeights, HourBasis,
    RatingScale, ScoreResult, ScoringOptions, ValidationMode, MAX_SCORE, MIN_SCORE,
};
pub use session::{CategoryBlock, CategoryId, SessionBuilder, SessionRecord};
