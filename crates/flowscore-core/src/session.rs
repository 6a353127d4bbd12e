//! Session records consumed by the flow score engine.
//!
//! A [`SessionRecord`] is one completed study session: its boundaries, an
//! optional self-reported focus rating and the [`CategoryBlock`]s recorded
//! while it ran. Records are plain values; the engine never mutates or keeps
//! them.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Category name that marks a block as rest time, compared case-insensitively.
pub const BREAK_CATEGORY_NAME: &str = "break";

/// Identifier of a category, numeric or textual depending on the producer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryId::Number(n) => write!(f, "{n}"),
            CategoryId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for CategoryId {
    fn from(value: i64) -> Self {
        CategoryId::Number(value)
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        CategoryId::Text(value.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(value: String) -> Self {
        CategoryId::Text(value)
    }
}

/// One contiguous interval of activity within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBlock {
    pub category_id: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<FixedOffset>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<FixedOffset>,
    /// Length in seconds. Trusted as-is; never recomputed from the timestamps.
    #[serde(deserialize_with = "whole_seconds")]
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_break: Option<bool>,
}

impl CategoryBlock {
    /// Create a study block whose duration is derived from its timestamps.
    pub fn new(
        category_id: impl Into<CategoryId>,
        category_name: Option<String>,
        start_time: DateTime<FixedOffset>,
        end_time: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            category_name,
            start_time,
            end_time,
            duration: (end_time - start_time).num_seconds(),
            is_break: None,
        }
    }

    /// Create a rest block, flagged explicitly and named with the sentinel.
    pub fn rest(
        category_id: impl Into<CategoryId>,
        start_time: DateTime<FixedOffset>,
        end_time: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            category_name: Some("Break".to_string()),
            is_break: Some(true),
            ..Self::new(category_id, None, start_time, end_time)
        }
    }

    /// Override the reported duration (seconds).
    pub fn with_duration(mut self, seconds: i64) -> Self {
        self.duration = seconds;
        self
    }

    /// True when the block is rest time: flagged, or named "Break".
    pub fn is_break_time(&self) -> bool {
        self.is_break == Some(true)
            || self
                .category_name
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(BREAK_CATEGORY_NAME))
    }

    /// Reported duration in (fractional) minutes.
    pub fn minutes(&self) -> f64 {
        self.duration as f64 / 60.0
    }

    /// Key used to group blocks by subject: the name, or the id when unnamed.
    pub fn subject_key(&self) -> Cow<'_, str> {
        match self.category_name.as_deref() {
            Some(name) if !name.is_empty() => Cow::Borrowed(name),
            _ => Cow::Owned(self.category_id.to_string()),
        }
    }
}

/// One completed study session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(with = "timestamp")]
    pub start_time: DateTime<FixedOffset>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<FixedOffset>,
    /// Self-reported focus on a 1-10 scale. Missing means 6.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_rating: Option<f64>,
    #[serde(default)]
    pub category_blocks: Vec<CategoryBlock>,
    /// Informational only; never used to derive the start hour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl SessionRecord {
    /// Create a session with no rating and no blocks.
    pub fn new(start_time: DateTime<FixedOffset>, end_time: DateTime<FixedOffset>) -> Self {
        Self {
            start_time,
            end_time,
            focus_rating: None,
            category_blocks: Vec::new(),
            timezone: None,
        }
    }

    pub fn with_focus_rating(mut self, rating: f64) -> Self {
        self.focus_rating = Some(rating);
        self
    }

    pub fn with_block(mut self, block: CategoryBlock) -> Self {
        self.category_blocks.push(block);
        self
    }

    pub fn with_blocks(mut self, blocks: impl IntoIterator<Item = CategoryBlock>) -> Self {
        self.category_blocks.extend(blocks);
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Session span in minutes. Negative when the timestamps are reversed.
    pub fn total_minutes(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 60_000.0
    }

    /// Split blocks into `(study, rest)` preserving their relative order.
    pub fn partition_blocks(&self) -> (Vec<&CategoryBlock>, Vec<&CategoryBlock>) {
        self.category_blocks
            .iter()
            .partition(|block| !block.is_break_time())
    }

    /// Check the preconditions lenient scoring silently tolerates.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: reversed session timestamps,
    /// a non-finite focus rating, then per block a negative duration or
    /// reversed block timestamps.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end_time < self.start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }

        if let Some(rating) = self.focus_rating {
            if !rating.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: "focus_rating".to_string(),
                    message: format!("expected a finite number, got {rating}"),
                });
            }
        }

        for (index, block) in self.category_blocks.iter().enumerate() {
            if block.duration < 0 {
                return Err(ValidationError::NegativeDuration {
                    index,
                    seconds: block.duration,
                });
            }
            if block.end_time < block.start_time {
                return Err(ValidationError::InvalidTimeRange {
                    start: block.start_time,
                    end: block.end_time,
                });
            }
        }

        Ok(())
    }
}

/// Builds a session from consecutive blocks, advancing a cursor per block.
///
/// The session ends where the last block ends.
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    start: DateTime<FixedOffset>,
    cursor: DateTime<FixedOffset>,
    focus_rating: Option<f64>,
    blocks: Vec<CategoryBlock>,
}

impl SessionBuilder {
    pub fn starting_at(start: DateTime<FixedOffset>) -> Self {
        Self {
            start,
            cursor: start,
            focus_rating: None,
            blocks: Vec::new(),
        }
    }

    pub fn focus_rating(mut self, rating: f64) -> Self {
        self.focus_rating = Some(rating);
        self
    }

    /// Append a study block for `subject` lasting `minutes`.
    pub fn study(mut self, subject: &str, minutes: i64) -> Self {
        let end = self.cursor + Duration::minutes(minutes);
        let id = self.blocks.len() as i64;
        self.blocks.push(CategoryBlock::new(
            id,
            Some(subject.to_string()),
            self.cursor,
            end,
        ));
        self.cursor = end;
        self
    }

    /// Append a break block lasting `minutes`.
    pub fn rest(mut self, minutes: i64) -> Self {
        let end = self.cursor + Duration::minutes(minutes);
        let id = self.blocks.len() as i64;
        self.blocks.push(CategoryBlock::rest(id, self.cursor, end));
        self.cursor = end;
        self
    }

    pub fn build(self) -> SessionRecord {
        SessionRecord {
            start_time: self.start,
            end_time: self.cursor,
            focus_rating: self.focus_rating,
            category_blocks: self.blocks,
            timezone: None,
        }
    }
}

/// Accept block durations written as JSON integers or whole-valued reals.
fn whole_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct WholeSeconds;

    impl serde::de::Visitor<'_> for WholeSeconds {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a whole number of seconds")
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::custom(format!("duration {v} is out of range")))
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<i64, E> {
            // i64::MAX as f64 rounds up to 2^63, which is already out of range
            if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::custom(format!("duration {v} is not a whole number of seconds")))
            }
        }
    }

    deserializer.deserialize_any(WholeSeconds)
}

/// ISO-8601 timestamp handling for session interchange.
///
/// Strings carrying an offset are taken as that instant. Date-times without
/// one are wall-clock times in the local timezone of the running process.
/// Bare dates are midnight UTC.
pub mod timestamp {
    use chrono::{
        DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    };
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::error::ValidationError;

    const NAIVE_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];

    /// Parse an ISO-8601 timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidValue`] when the string matches none
    /// of the accepted layouts.
    pub fn parse(raw: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt);
        }

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            let midnight = date.and_time(NaiveTime::MIN);
            return Ok(Utc.from_utc_datetime(&midnight).fixed_offset());
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .and_then(from_local_wall_clock)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "timestamp".to_string(),
                message: format!("'{raw}' is not an ISO-8601 date-time"),
            })
    }

    /// Resolve a wall-clock time in the local zone. Times skipped by a DST
    /// transition move forward by an hour.
    fn from_local_wall_clock(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        Local
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                Local
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest()
            })
            .map(|dt| dt.fixed_offset())
    }

    pub fn serialize<S>(dt: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}
