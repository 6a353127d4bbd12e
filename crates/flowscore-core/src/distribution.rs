//! Summary statistics over a batch of flow scores.
//!
//! Used to sanity-check the spread of scores produced for a set of
//! independently scored sessions (calibration runs, the CLI `batch` command).

use serde::{Deserialize, Serialize};

/// Nearest-rank percentiles of a score batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p10: u32,
    pub p25: u32,
    pub p50: u32,
    pub p75: u32,
    pub p90: u32,
}

/// Distribution of a batch of scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub count: usize,
    pub mean: f64,
    /// Upper median for even counts
    pub median: u32,
    /// Population standard deviation
    pub std: f64,
    pub percentiles: Percentiles,
}

/// Summarize a batch of scores. Returns `None` for an empty batch.
///
/// Percentile `q` is the element at index `floor(n · q)` of the sorted batch.
pub fn analyze_score_distribution(scores: &[u32]) -> Option<ScoreDistribution> {
    if scores.is_empty() {
        return None;
    }

    let mut sorted = scores.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();

    let mean = sorted.iter().map(|&s| s as f64).sum::<f64>() / n as f64;
    let variance = sorted
        .iter()
        .map(|&s| (s as f64 - mean).powi(2))
        .sum::<f64>()
        / n as f64;

    let at = |q: f64| sorted[((n as f64 * q).floor() as usize).min(n - 1)];
    let median = sorted[n / 2];

    Some(ScoreDistribution {
        count: n,
        mean,
        median,
        std: variance.sqrt(),
        percentiles: Percentiles {
            p10: at(0.1),
            p25: at(0.25),
            p50: median,
            p75: at(0.75),
            p90: at(0.9),
        },
    })
}
