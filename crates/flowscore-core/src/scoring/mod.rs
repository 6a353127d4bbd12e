//! Flow score engine.
//!
//! Converts one completed [`SessionRecord`] into a 300-1000 score with an
//! explainable breakdown. The score is a weighted sum of five components:
//!
//! ```text
//! base  = 1000 × (0.40·focus + 0.25·duration + 0.15·breaks + 0.15·deepWork + 0.05·1.0)
//! score = round(clamp(base × timeMultiplier, 300, 1000))
//! ```
//!
//! The 5% time-of-day weight contributes a constant 1.0 inside the sum; the
//! actual time-of-day effect is applied afterwards as a multiplier.
//!
//! The engine holds only immutable options. Scoring has no side effects
//! beyond `tracing` events and can run concurrently from any thread.

pub mod components;

use chrono::{DateTime, FixedOffset, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::rating::convert_focus_rating;
use crate::session::{CategoryBlock, SessionRecord};

pub use components::{
    break_score, deep_work_score, duration_score, focus_score, time_of_day_multiplier, DeepWork,
    DEFAULT_FOCUS_RATING,
};

/// Lowest score the engine reports.
pub const MIN_SCORE: u32 = 300;
/// Highest score the engine reports.
pub const MAX_SCORE: u32 = 1000;

/// Weights of the components in the base score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowWeights {
    pub focus: f64,
    pub duration: f64,
    pub breaks: f64,
    pub deep_work: f64,
    /// Weight of the constant time-of-day placeholder
    pub time_of_day: f64,
}

impl FlowWeights {
    pub const STANDARD: FlowWeights = FlowWeights {
        focus: 0.40,
        duration: 0.25,
        breaks: 0.15,
        deep_work: 0.15,
        time_of_day: 0.05,
    };

    /// Weighted sum on a 0-1000 scale, before the time-of-day multiplier.
    pub fn base_score(&self, components: &FlowComponents) -> f64 {
        1000.0
            * (self.focus * components.focus
                + self.duration * components.duration
                + self.breaks * components.breaks
                + self.deep_work * components.deep_work
                + self.time_of_day * 1.0)
    }
}

impl Default for FlowWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Raw component values of a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowComponents {
    pub focus: f64,
    pub duration: f64,
    pub breaks: f64,
    pub deep_work: f64,
    /// In [0.95, 1.02]
    pub time_multiplier: f64,
}

/// Diagnostic aggregates reported alongside a score.
///
/// Minute values are rounded half-up to whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDetails {
    pub total_minutes: i64,
    pub focus_minutes: i64,
    pub break_minutes: i64,
    pub subject_count: usize,
    pub avg_block_length: i64,
    pub start_hour: u32,
}

/// Result of scoring one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Always within [`MIN_SCORE`, `MAX_SCORE`]
    pub score: u32,
    pub components: FlowComponents,
    pub details: FlowDetails,
}

/// Clock the session's start hour is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HourBasis {
    /// Wall-clock hour in the local timezone of the running process
    #[default]
    Local,
    /// Wall-clock hour in the offset the timestamp was recorded with
    Recorded,
    /// Hour in UTC
    Utc,
}

impl HourBasis {
    pub fn hour_of(self, instant: &DateTime<FixedOffset>) -> u32 {
        match self {
            HourBasis::Local => instant.with_timezone(&Local).hour(),
            HourBasis::Recorded => instant.hour(),
            HourBasis::Utc => instant.with_timezone(&Utc).hour(),
        }
    }
}

impl std::str::FromStr for HourBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(HourBasis::Local),
            "recorded" => Ok(HourBasis::Recorded),
            "utc" => Ok(HourBasis::Utc),
            other => Err(format!("unknown hour basis '{other}' (expected local, recorded or utc)")),
        }
    }
}

/// How [`FlowScoreEngine::try_score`] treats inconsistent input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Score anything; the final clamp bounds the result
    #[default]
    Lenient,
    /// Reject sessions that fail [`SessionRecord::validate`]
    Strict,
}

/// Scale of the incoming focus ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RatingScale {
    /// Ratings are already 1-10
    #[default]
    Ten,
    /// Ratings are 1-5 and converted before scoring
    Five,
}

impl TryFrom<u8> for RatingScale {
    type Error = String;

    fn try_from(points: u8) -> Result<Self, Self::Error> {
        match points {
            10 => Ok(RatingScale::Ten),
            5 => Ok(RatingScale::Five),
            other => Err(format!("unsupported rating scale {other} (expected 5 or 10)")),
        }
    }
}

impl From<RatingScale> for u8 {
    fn from(scale: RatingScale) -> Self {
        match scale {
            RatingScale::Ten => 10,
            RatingScale::Five => 5,
        }
    }
}

/// Engine options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoringOptions {
    #[serde(default)]
    pub hour_basis: HourBasis,
    #[serde(default)]
    pub validation: ValidationMode,
    #[serde(default)]
    pub rating_scale: RatingScale,
}

/// Flow score engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowScoreEngine {
    options: ScoringOptions,
}

impl FlowScoreEngine {
    /// Create an engine with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom options
    pub fn with_options(options: ScoringOptions) -> Self {
        Self { options }
    }

    /// Get current options
    pub fn options(&self) -> &ScoringOptions {
        &self.options
    }

    /// Score a session. Never fails.
    ///
    /// Inconsistent input (reversed timestamps, negative durations) is scored
    /// anyway and logged; the final clamp keeps the score within bounds.
    pub fn score(&self, session: &SessionRecord) -> ScoreResult {
        let total_minutes = session.total_minutes();
        if total_minutes < 0.0 {
            warn!(
                start = %session.start_time,
                end = %session.end_time,
                "session ends before it starts; scoring anyway"
            );
        }

        let (study_blocks, break_blocks) = session.partition_blocks();
        if let Some(block) = session.category_blocks.iter().find(|b| b.duration < 0) {
            warn!(
                category = %block.category_id,
                duration = block.duration,
                "category block has a negative duration"
            );
        }

        let break_minutes = total_seconds(&break_blocks) as f64 / 60.0;
        let focus_minutes = total_minutes - break_minutes;
        let start_hour = self.options.hour_basis.hour_of(&session.start_time);

        let rating = match self.options.rating_scale {
            RatingScale::Ten => session.focus_rating,
            RatingScale::Five => session.focus_rating.map(convert_focus_rating),
        };

        let deep_work = deep_work_score(&study_blocks, focus_minutes);
        let components = FlowComponents {
            focus: focus_score(rating),
            duration: duration_score(focus_minutes),
            breaks: break_score(focus_minutes, break_minutes, total_minutes, &break_blocks),
            deep_work: deep_work.score,
            time_multiplier: time_of_day_multiplier(start_hour),
        };

        let base = FlowWeights::STANDARD.base_score(&components);
        let score = clamp_score(base * components.time_multiplier);

        debug!(
            score,
            base,
            focus = components.focus,
            duration = components.duration,
            breaks = components.breaks,
            deep_work = components.deep_work,
            time_multiplier = components.time_multiplier,
            "scored session"
        );

        ScoreResult {
            score,
            components,
            details: FlowDetails {
                total_minutes: round_half_up(total_minutes),
                focus_minutes: round_half_up(focus_minutes),
                break_minutes: round_half_up(break_minutes),
                subject_count: deep_work.subject_count,
                avg_block_length: round_half_up(deep_work.avg_block_length),
                start_hour,
            },
        }
    }

    /// Score a session, validating it first when the engine is strict.
    ///
    /// # Errors
    ///
    /// In [`ValidationMode::Strict`], returns the first problem reported by
    /// [`SessionRecord::validate`]. Lenient engines always succeed.
    pub fn try_score(&self, session: &SessionRecord) -> Result<ScoreResult, ValidationError> {
        if self.options.validation == ValidationMode::Strict {
            session.validate()?;
        }
        Ok(self.score(session))
    }
}

/// Score a session with default options.
pub fn calculate_flow_score(session: &SessionRecord) -> ScoreResult {
    FlowScoreEngine::default().score(session)
}

fn total_seconds(blocks: &[&CategoryBlock]) -> i128 {
    blocks.iter().map(|b| i128::from(b.duration)).sum()
}

/// Clamp into the score range and round. NaN lands on the floor.
fn clamp_score(raw: f64) -> u32 {
    let clamped = raw.max(MIN_SCORE as f64).min(MAX_SCORE as f64);
    round_half_up(clamped) as u32
}

/// Round to the nearest integer, halves toward positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
