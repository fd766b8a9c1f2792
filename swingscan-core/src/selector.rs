//! Cross-instrument selection: final gates, ranking and truncation.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::config::{SelectionConfig, TargetConfig};
use crate::numeric::{mean, round_to};
use crate::scoring::Strength;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortlistSummary {
    pub count: usize,
    pub mean_score: Option<f64>,
    pub very_strong: usize,
    pub mean_rr_ratio_2: Option<f64>,
}

impl ShortlistSummary {
    fn of(entries: &[Candidate]) -> Self {
        let scores: Vec<f64> = entries.iter().map(|c| c.score).collect();
        let rr: Vec<f64> = entries.iter().map(|c| c.levels.rr_ratio_2).collect();
        Self {
            count: entries.len(),
            mean_score: mean(&scores).map(|m| round_to(m, 2)),
            very_strong: entries
                .iter()
                .filter(|c| c.strength == Strength::VeryStrong)
                .count(),
            mean_rr_ratio_2: mean(&rr).map(|m| round_to(m, 2)),
        }
    }
}

/// The bounded, ranked result of a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortlist {
    pub entries: Vec<Candidate>,
    pub summary: ShortlistSummary,
    /// How many candidates selection started from.
    pub considered: usize,
}

impl Shortlist {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn passes(candidate: &Candidate, selection: &SelectionConfig, targets: &TargetConfig) -> bool {
    let score = candidate.score;
    let rr = candidate.levels.rr_ratio_2;
    if !(score.is_finite() && candidate.snapshot.rsi.is_finite() && rr.is_finite()) {
        return false;
    }
    score >= selection.min_score
        && rr >= targets.min_risk_reward_ratio
        && candidate.snapshot.atr_pct <= selection.max_atr_pct
}

/// Keep candidates meeting the final gates, rank them by score (descending,
/// ties keep input order) and truncate to `top_n`.
pub fn select_top(
    candidates: &[Candidate],
    selection: &SelectionConfig,
    targets: &TargetConfig,
    top_n: usize,
) -> Shortlist {
    let mut entries: Vec<Candidate> = candidates
        .iter()
        .filter(|c| passes(c, selection, targets))
        .cloned()
        .collect();

    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    entries.truncate(top_n);

    Shortlist {
        summary: ShortlistSummary::of(&entries),
        entries,
        considered: candidates.len(),
    }
}
