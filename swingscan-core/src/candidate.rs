//! Candidate records and the per-instrument evaluation chain.

use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::error::Rejection;
use crate::levels::{levels, TradeLevels};
use crate::scoring::{check_eligibility, score, ScoreBreakdown, SignalTag, Strength};
use crate::snapshot::Snapshot;

/// One instrument that survived every gate, with its score and levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub symbol: String,
    pub snapshot: Snapshot,
    pub breakdown: ScoreBreakdown,
    pub score: f64,
    pub strength: Strength,
    pub signal: SignalTag,
    pub levels: TradeLevels,
}

/// Gates → score → score floor → levels → minimum risk/reward → candidate.
pub fn evaluate(snapshot: &Snapshot, config: &ScanConfig) -> Result<Candidate, Rejection> {
    check_eligibility(snapshot, &config.signal_thresholds)?;

    let result = score(snapshot, &config.scoring);
    if result.score < config.scoring.min_score {
        return Err(Rejection::ScoreBelowFloor {
            score: result.score,
            floor: config.scoring.min_score,
        });
    }

    let levels = levels(snapshot, &config.targets);
    let min_rr = config.targets.min_risk_reward_ratio;
    if !(levels.rr_ratio_2 >= min_rr) {
        return Err(Rejection::RiskRewardBelowMinimum {
            rr: levels.rr_ratio_2,
            min: min_rr,
        });
    }

    Ok(Candidate {
        symbol: snapshot.symbol.clone(),
        snapshot: snapshot.clone(),
        breakdown: result.breakdown,
        score: result.score,
        strength: result.strength,
        signal: result.signal,
        levels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RejectionKind;
    use crate::scoring::tests::strong_snapshot;

    #[test]
    fn strong_snapshot_becomes_candidate() {
        let candidate = evaluate(&strong_snapshot(), &ScanConfig::default()).unwrap();
        assert_eq!(candidate.symbol, "ACME");
        assert_eq!(candidate.strength, Strength::VeryStrong);
        assert_eq!(candidate.signal, SignalTag::PremiumBounce);
        assert!((candidate.levels.rr_ratio_2 - 7.0).abs() < 1e-9);
    }

    #[test]
    fn weak_score_hits_floor() {
        let mut s = strong_snapshot();
        // stochastic 3, ema 3, macd 2 → 2.0 + 0.45 + 0.45 + 0.3 + 1.35 + 0.9 + 0.9
        s.stoch_k = 50.0;
        s.ema_short = 90.0;
        s.macd = -1.0;
        s.macd_histogram = -0.2;
        let err = evaluate(&s, &ScanConfig::default()).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::ScoreBelowFloor);
    }

    #[test]
    fn tight_target_fails_risk_reward() {
        let mut s = strong_snapshot();
        s.keltner_upper = 104.0; // target_2 = 101.92 → rr 1.92
        let err = evaluate(&s, &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, Rejection::RiskRewardBelowMinimum { .. }));
    }

    #[test]
    fn gate_failure_short_circuits() {
        let mut s = strong_snapshot();
        s.volume_ratio = 1.0;
        assert_eq!(
            evaluate(&s, &ScanConfig::default()).unwrap_err().kind(),
            RejectionKind::VolumeRatioBelowMinimum
        );
    }
}
