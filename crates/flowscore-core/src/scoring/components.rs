//! The five sub-scores combined into a flow score.
//!
//! Each function is pure and can be tested on its own. Per-subject and
//! per-break totals are accumulated in whole seconds before converting to
//! minutes, so the results do not depend on block order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::session::CategoryBlock;

/// Rating assumed when the session carries none.
pub const DEFAULT_FOCUS_RATING: f64 = 6.0;

/// Exponent applied to the normalized rating; above 1 it favours high focus.
const FOCUS_EXPONENT: f64 = 1.2;

/// Breaks between 3 and 20 minutes count toward break hygiene.
const GOOD_BREAK_MINUTES: std::ops::RangeInclusive<f64> = 3.0..=20.0;

/// Share of the session spent resting above which breaks are penalized.
const EXCESSIVE_BREAK_SHARE: f64 = 0.4;

/// Neutral deep-work score when nothing was studied.
const NEUTRAL_DEEP_WORK: f64 = 0.5;

/// Block length (minutes) that earns the full block-length reward.
const FULL_CREDIT_BLOCK_MINUTES: f64 = 25.0;

/// Average block length (minutes) below which the switching penalty applies.
const SWITCHING_BLOCK_MINUTES: f64 = 20.0;

/// Focus component from a 1-10 rating.
///
/// Missing or non-finite ratings fall back to [`DEFAULT_FOCUS_RATING`];
/// anything outside 1-10 is clamped.
pub fn focus_score(rating: Option<f64>) -> f64 {
    let rating = rating
        .filter(|r| r.is_finite())
        .unwrap_or(DEFAULT_FOCUS_RATING)
        .clamp(1.0, 10.0);
    (rating / 10.0).powf(FOCUS_EXPONENT)
}

/// Duration component: ramps up to a 50-90 minute plateau, then tapers.
pub fn duration_score(focus_minutes: f64) -> f64 {
    let m = focus_minutes;
    if m <= 10.0 {
        0.3
    } else if m <= 50.0 {
        0.3 + 0.7 * (m - 10.0) / 40.0
    } else if m <= 90.0 {
        1.0
    } else if m <= 150.0 {
        1.0 - 0.2 * (m - 90.0) / 60.0
    } else if m <= 240.0 {
        0.8 - 0.3 * (m - 150.0) / 90.0
    } else {
        0.5
    }
}

/// Break hygiene component.
///
/// Sessions with at most an hour of focus need no breaks. Longer sessions
/// earn credit for one well-sized break per full hour of focus, and lose 15%
/// when rest exceeds 40% of the session.
pub fn break_score(
    focus_minutes: f64,
    break_minutes: f64,
    total_minutes: f64,
    break_blocks: &[&CategoryBlock],
) -> f64 {
    if focus_minutes <= 60.0 {
        return if break_blocks.is_empty() { 1.0 } else { 0.9 };
    }

    let recommended = (focus_minutes / 60.0).floor();
    let good_breaks = break_blocks
        .iter()
        .filter(|b| GOOD_BREAK_MINUTES.contains(&b.minutes()))
        .count() as f64;

    let mut score = if recommended == 0.0 {
        1.0
    } else {
        (good_breaks / recommended).min(1.0)
    };

    if break_minutes > EXCESSIVE_BREAK_SHARE * total_minutes {
        score *= 0.85;
    }

    score.max(0.0)
}

/// Deep-work assessment with the aggregates reported in the details.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeepWork {
    /// Score in [0.5, 1.0]
    pub score: f64,
    /// Distinct subjects studied
    pub subject_count: usize,
    /// Focus minutes per study block
    pub avg_block_length: f64,
}

/// Deep-work component: rewards concentration on few subjects in long blocks.
///
/// Concentration is the Herfindahl index of per-subject minutes over focus
/// minutes. The result never drops below half credit.
pub fn deep_work_score(study_blocks: &[&CategoryBlock], focus_minutes: f64) -> DeepWork {
    if study_blocks.is_empty() || focus_minutes == 0.0 {
        return DeepWork {
            score: NEUTRAL_DEEP_WORK,
            subject_count: 0,
            avg_block_length: 0.0,
        };
    }

    // i128 so that durations near i64::MAX still add up exactly
    let mut seconds_by_subject: BTreeMap<String, i128> = BTreeMap::new();
    for block in study_blocks {
        *seconds_by_subject
            .entry(block.subject_key().into_owned())
            .or_insert(0) += i128::from(block.duration);
    }

    let herfindahl: f64 = seconds_by_subject
        .values()
        .map(|&seconds| (seconds as f64 / 60.0 / focus_minutes).powi(2))
        .sum();

    let block_count = study_blocks.len() as f64;
    let avg_block_length = focus_minutes / block_count;

    let mut score = 0.3
        + 0.4 * herfindahl
        + 0.3 * (avg_block_length / FULL_CREDIT_BLOCK_MINUTES).min(1.0);

    if block_count > focus_minutes / SWITCHING_BLOCK_MINUTES {
        score *= 0.92;
    }

    DeepWork {
        score: score.min(1.0).max(NEUTRAL_DEEP_WORK),
        subject_count: seconds_by_subject.len(),
        avg_block_length,
    }
}

/// Time-of-day multiplier from the session's start hour (0-23).
pub fn time_of_day_multiplier(hour: u32) -> f64 {
    match hour {
        11..=20 => 1.02,
        9..=10 | 21..=22 => 1.00,
        7..=8 | 23 => 0.98,
        _ => 0.95,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, FixedOffset, TimeZone};

    fn t0() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 15, 14, 0, 0)
            .unwrap()
    }

    fn study(subject: &str, minutes: i64) -> CategoryBlock {
        CategoryBlock::new(
            1,
            Some(subject.to_string()),
            t0(),
            t0() + Duration::minutes(minutes),
        )
    }

    fn rest(minutes: i64) -> CategoryBlock {
        CategoryBlock::rest(99, t0(), t0() + Duration::minutes(minutes))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn focus_defaults_to_six() {
        assert_eq!(focus_score(None), focus_score(Some(6.0)));
        assert!(approx(focus_score(None), 0.6_f64.powf(1.2)));
    }

    #[test]
    fn focus_clamps_out_of_range_ratings() {
        assert_eq!(focus_score(Some(0.0)), focus_score(Some(1.0)));
        assert_eq!(focus_score(Some(-4.0)), focus_score(Some(1.0)));
        assert_eq!(focus_score(Some(42.0)), 1.0);
        assert!(approx(focus_score(Some(1.0)), 0.1_f64.powf(1.2)));
    }

    #[test]
    fn focus_treats_nan_as_missing() {
        assert_eq!(focus_score(Some(f64::NAN)), focus_score(None));
    }

    #[test]
    fn focus_is_superlinear() {
        // 5/10 earns less than half credit
        assert!(focus_score(Some(5.0)) < 0.5);
        assert!(approx(focus_score(Some(10.0)), 1.0));
    }

    #[test]
    fn duration_curve_breakpoints() {
        assert!(approx(duration_score(-30.0), 0.3));
        assert!(approx(duration_score(5.0), 0.3));
        assert!(approx(duration_score(10.0), 0.3));
        assert!(approx(duration_score(30.0), 0.65));
        assert!(approx(duration_score(50.0), 1.0));
        assert!(approx(duration_score(70.0), 1.0));
        assert!(approx(duration_score(90.0), 1.0));
        assert!(approx(duration_score(120.0), 0.9));
        assert!(approx(duration_score(150.0), 0.8));
        assert!(approx(duration_score(195.0), 0.65));
        assert!(approx(duration_score(240.0), 0.5));
        assert!(approx(duration_score(600.0), 0.5));
    }

    #[test]
    fn duration_curve_is_continuous_at_band_edges() {
        for edge in [10.0, 50.0, 90.0, 150.0, 240.0] {
            let below = duration_score(edge - 1e-9);
            let above = duration_score(edge + 1e-9);
            assert!((below - above).abs() < 1e-6, "discontinuity at {edge}");
        }
    }

    #[test]
    fn short_sessions_need_no_breaks() {
        assert_eq!(break_score(45.0, 0.0, 45.0, &[]), 1.0);
        let b = rest(5);
        assert_eq!(break_score(60.0, 5.0, 65.0, &[&b]), 0.9);
    }

    #[test]
    fn long_session_without_breaks_scores_zero() {
        assert_eq!(break_score(120.0, 0.0, 120.0, &[]), 0.0);
    }

    #[test]
    fn breaks_outside_good_window_do_not_count() {
        let short = rest(2);
        let long = rest(25);
        let good = rest(10);
        // 150 focus minutes -> two recommended breaks
        assert_eq!(break_score(150.0, 27.0, 177.0, &[&short, &long]), 0.0);
        assert!(approx(break_score(150.0, 12.0, 162.0, &[&short, &good]), 0.5));
    }

    #[test]
    fn good_break_bounds_are_inclusive() {
        let three = rest(3);
        let twenty = rest(20);
        assert_eq!(break_score(130.0, 23.0, 153.0, &[&three, &twenty]), 1.0);
    }

    #[test]
    fn excessive_rest_is_penalized() {
        let b1 = rest(20);
        let b2 = rest(20);
        let b3 = rest(20);
        let score = break_score(70.0, 60.0, 130.0, &[&b1, &b2, &b3]);
        assert!(approx(score, 0.85));
    }

    #[test]
    fn deep_work_is_neutral_without_study() {
        let dw = deep_work_score(&[], 60.0);
        assert_eq!(dw.score, 0.5);
        assert_eq!(dw.subject_count, 0);
        assert_eq!(dw.avg_block_length, 0.0);

        let m = study("Math", 30);
        let dw = deep_work_score(&[&m], 0.0);
        assert_eq!(dw.score, 0.5);
        assert_eq!(dw.subject_count, 0);
    }

    #[test]
    fn single_long_block_earns_full_credit() {
        let m = study("Math", 60);
        let dw = deep_work_score(&[&m], 60.0);
        assert!(approx(dw.score, 1.0));
        assert_eq!(dw.subject_count, 1);
        assert!(approx(dw.avg_block_length, 60.0));
    }

    #[test]
    fn three_even_subjects_concentrate_to_one_third() {
        let a = study("Math", 30);
        let b = study("English", 30);
        let c = study("Science", 30);
        let dw = deep_work_score(&[&a, &b, &c], 90.0);
        // 0.3 + 0.4/3 + 0.3
        assert!(approx(dw.score, 0.3 + 0.4 / 3.0 + 0.3));
        assert_eq!(dw.subject_count, 3);
    }

    #[test]
    fn rapid_switching_hits_the_floor() {
        let subjects = ["Math", "Physics", "Chemistry", "Biology", "English", "History"];
        let blocks: Vec<CategoryBlock> = subjects
            .iter()
            .chain(subjects.iter())
            .map(|s| study(s, 5))
            .collect();
        let refs: Vec<&CategoryBlock> = blocks.iter().collect();

        let dw = deep_work_score(&refs, 60.0);
        assert_eq!(dw.score, 0.5);
        assert_eq!(dw.subject_count, 6);
        assert!(approx(dw.avg_block_length, 5.0));
    }

    #[test]
    fn switching_penalty_applies_to_short_average_blocks() {
        let m = study("Math", 5);
        let dw = deep_work_score(&[&m], 5.0);
        // (0.3 + 0.4 + 0.3 * 0.2) * 0.92
        assert!(approx(dw.score, 0.6992));
    }

    #[test]
    fn unnamed_blocks_group_by_category_id() {
        let t = t0();
        let a = CategoryBlock::new(1, None, t, t + Duration::minutes(30));
        let b = CategoryBlock::new(1, None, t, t + Duration::minutes(30));
        let c = CategoryBlock::new(2, None, t, t + Duration::minutes(30));
        let dw = deep_work_score(&[&a, &b, &c], 90.0);
        assert_eq!(dw.subject_count, 2);
    }

    #[test]
    fn time_of_day_bands() {
        for hour in 0..7 {
            assert_eq!(time_of_day_multiplier(hour), 0.95, "hour {hour}");
        }
        assert_eq!(time_of_day_multiplier(7), 0.98);
        assert_eq!(time_of_day_multiplier(8), 0.98);
        assert_eq!(time_of_day_multiplier(9), 1.00);
        assert_eq!(time_of_day_multiplier(10), 1.00);
        for hour in 11..21 {
            assert_eq!(time_of_day_multiplier(hour), 1.02, "hour {hour}");
        }
        assert_eq!(time_of_day_multiplier(21), 1.00);
        assert_eq!(time_of_day_multiplier(22), 1.00);
        assert_eq!(time_of_day_multiplier(23), 0.98);
    }
}
