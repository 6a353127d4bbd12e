//! Coaching tips derived from a score.
//!
//! The selector only looks at a finished [`ScoreResult`]. It finds the
//! component with the lowest weighted contribution and pairs its tip with an
//! encouragement line for the score's tier.

use serde::{Deserialize, Serialize};

use crate::scoring::{FlowComponents, FlowWeights, ScoreResult};

/// Score at which the tip is replaced by "Keep it up!".
pub const PEAK_SCORE: u32 = 850;

/// Components that carry a weight in the base score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeightedComponent {
    Focus,
    Duration,
    Breaks,
    DeepWork,
}

impl WeightedComponent {
    /// Tie-break order: earlier entries win equal contributions.
    pub const ALL: [WeightedComponent; 4] = [
        WeightedComponent::Focus,
        WeightedComponent::Duration,
        WeightedComponent::Breaks,
        WeightedComponent::DeepWork,
    ];

    pub fn weight(self) -> f64 {
        let w = FlowWeights::STANDARD;
        match self {
            WeightedComponent::Focus => w.focus,
            WeightedComponent::Duration => w.duration,
            WeightedComponent::Breaks => w.breaks,
            WeightedComponent::DeepWork => w.deep_work,
        }
    }

    pub fn value(self, components: &FlowComponents) -> f64 {
        match self {
            WeightedComponent::Focus => components.focus,
            WeightedComponent::Duration => components.duration,
            WeightedComponent::Breaks => components.breaks,
            WeightedComponent::DeepWork => components.deep_work,
        }
    }

    pub fn contribution(self, components: &FlowComponents) -> f64 {
        self.value(components) * self.weight()
    }

    pub fn tip(self) -> &'static str {
        match self {
            WeightedComponent::Focus => "Try eliminating distractions. Use Do Not Disturb mode.",
            WeightedComponent::Duration => "Aim for 45-60 minute focused blocks for optimal flow.",
            WeightedComponent::Breaks => "Take a 5-10 minute break every hour to maintain focus.",
            WeightedComponent::DeepWork => {
                "Stick with one subject for at least 30 minutes before switching."
            }
        }
    }
}

/// Encouragement tier of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    /// Below 500
    GettingStarted,
    /// 500-699
    BuildingMomentum,
    /// 700-849
    InTheZone,
    /// 850 and above
    Peak,
}

impl ScoreTier {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s < 500 => ScoreTier::GettingStarted,
            s if s < 700 => ScoreTier::BuildingMomentum,
            s if s < PEAK_SCORE => ScoreTier::InTheZone,
            _ => ScoreTier::Peak,
        }
    }

    pub fn encouragement(self) -> &'static str {
        match self {
            ScoreTier::GettingStarted => "Good start! ",
            ScoreTier::BuildingMomentum => "Nice work! You're building momentum. ",
            ScoreTier::InTheZone => "Great session! You're in the zone. ",
            ScoreTier::Peak => "Outstanding! Peak performance! 🔥 ",
        }
    }
}

/// Component with the lowest weighted contribution.
pub fn weakest_component(components: &FlowComponents) -> WeightedComponent {
    WeightedComponent::ALL
        .into_iter()
        .min_by(|a, b| {
            a.contribution(components)
                .total_cmp(&b.contribution(components))
        })
        .unwrap_or(WeightedComponent::Focus)
}

/// Encouragement plus either the weakest component's tip or, at peak
/// scores, "Keep it up!".
pub fn flow_coaching_message(result: &ScoreResult) -> String {
    let tier = ScoreTier::from_score(result.score);
    let advice = match tier {
        ScoreTier::Peak => "Keep it up!",
        _ => weakest_component(&result.components).tip(),
    };
    format!("{}{}", tier.encouragement(), advice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::FlowDetails;

    fn result(score: u32, focus: f64, duration: f64, breaks: f64, deep_work: f64) -> ScoreResult {
        ScoreResult {
            score,
            components: FlowComponents {
                focus,
                duration,
                breaks,
                deep_work,
                time_multiplier: 1.02,
            },
            details: FlowDetails {
                total_minutes: 60,
                focus_minutes: 60,
                break_minutes: 0,
                subject_count: 1,
                avg_block_length: 60,
                start_hour: 14,
            },
        }
    }

    #[test]
    fn tiers_follow_score_boundaries() {
        assert_eq!(ScoreTier::from_score(300), ScoreTier::GettingStarted);
        assert_eq!(ScoreTier::from_score(499), ScoreTier::GettingStarted);
        assert_eq!(ScoreTier::from_score(500), ScoreTier::BuildingMomentum);
        assert_eq!(ScoreTier::from_score(699), ScoreTier::BuildingMomentum);
        assert_eq!(ScoreTier::from_score(700), ScoreTier::InTheZone);
        assert_eq!(ScoreTier::from_score(849), ScoreTier::InTheZone);
        assert_eq!(ScoreTier::from_score(850), ScoreTier::Peak);
        assert_eq!(ScoreTier::from_score(1000), ScoreTier::Peak);
    }

    #[test]
    fn weakest_link_uses_weighted_contribution() {
        // focus has the lowest raw value, deep work the lowest contribution
        let r = result(640, 0.2, 1.0, 1.0, 0.4);
        assert_eq!(weakest_component(&r.components), WeightedComponent::DeepWork);
    }

    #[test]
    fn ties_resolve_to_the_earlier_component() {
        // breaks and deep work share a weight
        let r = result(640, 1.0, 1.0, 0.5, 0.5);
        assert_eq!(weakest_component(&r.components), WeightedComponent::Breaks);
    }

    #[test]
    fn low_score_gets_tip_for_weakest_component() {
        let r = result(484, 0.2358, 0.3, 1.0, 0.6992);
        assert_eq!(
            flow_coaching_message(&r),
            "Good start! Aim for 45-60 minute focused blocks for optimal flow."
        );
    }

    #[test]
    fn mid_score_names_break_tip() {
        let r = result(746, 0.765, 0.9, 0.0, 1.0);
        assert_eq!(
            flow_coaching_message(&r),
            "Great session! You're in the zone. Take a 5-10 minute break every hour to maintain focus."
        );
    }

    #[test]
    fn peak_score_ignores_weakest_component() {
        let r = result(916, 0.765, 0.967, 0.0, 1.0);
        assert_eq!(
            flow_coaching_message(&r),
            "Outstanding! Peak performance! 🔥 Keep it up!"
        );
    }

    #[test]
    fn building_momentum_mentions_deep_work() {
        let r = result(600, 1.0, 1.0, 1.0, 0.5);
        assert_eq!(
            flow_coaching_message(&r),
            "Nice work! You're building momentum. Stick with one subject for at least 30 minutes before switching."
        );
    }
}
