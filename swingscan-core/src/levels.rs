//! Entry, stop and target prices with their risk/reward ratios.
//!
//! All outputs are rounded to 2 decimals from unrounded intermediates. Targets
//! are capped by the Keltner bands, so `target_1 <= target_2 <= target_3` is not
//! guaranteed; see [`TradeLevels::targets_ordered`].

use serde::{Deserialize, Serialize};

use crate::config::TargetConfig;
use crate::numeric::round_to;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLevels {
    pub entry_optimal: f64,
    pub entry_max: f64,
    pub stop_loss: f64,
    pub target_1: f64,
    pub target_2: f64,
    pub target_3: f64,
    pub rr_ratio_1: f64,
    pub rr_ratio_2: f64,
    pub rr_ratio_3: f64,
    pub risk_pct: f64,
    pub reward_1_pct: f64,
    pub reward_2_pct: f64,
    pub reward_3_pct: f64,
}

impl TradeLevels {
    /// Whether the targets ascend. A Keltner cap can pull target 1 or 2 below
    /// an earlier target.
    pub fn targets_ordered(&self) -> bool {
        self.target_1 <= self.target_2 && self.target_2 <= self.target_3
    }
}

/// Derive trade levels from the latest snapshot.
pub fn levels(snapshot: &Snapshot, targets: &TargetConfig) -> TradeLevels {
    let close = snapshot.close;

    // f64::min/max ignore a NaN operand, so undefined bands leave the
    // percentage-based level in place.
    let entry_optimal = close.min(snapshot.keltner_lower * 1.002);

    let stop_price = close * (1.0 - targets.stop_loss_pct / 100.0);
    let supertrend_stop = if snapshot.supertrend < close {
        snapshot.supertrend
    } else {
        stop_price
    };
    let stop_loss = stop_price.max(supertrend_stop);

    let target_1 = (close * (1.0 + targets.profit_target_conservative / 100.0))
        .min(snapshot.keltner_mid);
    let target_2 =
        (close * (1.0 + targets.profit_target_pct / 100.0)).min(snapshot.keltner_upper * 0.98);
    let target_3 = close * (1.0 + targets.profit_target_aggressive / 100.0);

    let risk = close - stop_loss;
    let rr = |target: f64| if risk > 0.0 { (target - close) / risk } else { 0.0 };
    let pct = |distance: f64| distance / close * 100.0;

    let r2 = |v: f64| round_to(v, 2);
    TradeLevels {
        entry_optimal: r2(entry_optimal),
        entry_max: r2(close),
        stop_loss: r2(stop_loss),
        target_1: r2(target_1),
        target_2: r2(target_2),
        target_3: r2(target_3),
        rr_ratio_1: r2(rr(target_1)),
        rr_ratio_2: r2(rr(target_2)),
        rr_ratio_3: r2(rr(target_3)),
        risk_pct: r2(pct(risk)),
        reward_1_pct: r2(pct(target_1 - close)),
        reward_2_pct: r2(pct(target_2 - close)),
        reward_3_pct: r2(pct(target_3 - close)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::tests::strong_snapshot;

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "actual={actual}, expected={expected}"
        );
    }

    #[test]
    fn keltner_capped_levels() {
        let lv = levels(&strong_snapshot(), &TargetConfig::default());
        approx(lv.entry_optimal, 99.7);
        approx(lv.entry_max, 100.0);
        approx(lv.stop_loss, 99.0);
        approx(lv.target_1, 104.0); // keltner_mid caps 105
        approx(lv.target_2, 107.0); // 109.76 cap not binding
        approx(lv.target_3, 110.0);
        approx(lv.rr_ratio_1, 4.0);
        approx(lv.rr_ratio_2, 7.0);
        approx(lv.rr_ratio_3, 10.0);
        approx(lv.risk_pct, 1.0);
        approx(lv.reward_2_pct, 7.0);
        assert!(lv.targets_ordered());
    }

    #[test]
    fn supertrend_tightens_stop() {
        let mut s = strong_snapshot();
        s.supertrend = 99.4;
        let lv = levels(&s, &TargetConfig::default());
        approx(lv.stop_loss, 99.4);
        approx(lv.rr_ratio_2, 11.67);
    }

    #[test]
    fn supertrend_above_close_is_ignored() {
        let mut s = strong_snapshot();
        s.supertrend = 103.0;
        let lv = levels(&s, &TargetConfig::default());
        approx(lv.stop_loss, 99.0);
    }

    #[test]
    fn entry_never_above_close() {
        let mut s = strong_snapshot();
        s.keltner_lower = 120.0;
        let lv = levels(&s, &TargetConfig::default());
        approx(lv.entry_optimal, 100.0);
        assert!(lv.entry_optimal <= lv.entry_max);
    }

    #[test]
    fn zero_risk_gives_zero_ratios() {
        let targets = TargetConfig {
            stop_loss_pct: 0.0,
            ..TargetConfig::default()
        };
        let mut s = strong_snapshot();
        s.supertrend = f64::NAN;
        let lv = levels(&s, &targets);
        assert_eq!(lv.rr_ratio_1, 0.0);
        assert_eq!(lv.rr_ratio_2, 0.0);
        assert_eq!(lv.rr_ratio_3, 0.0);
    }

    #[test]
    fn low_keltner_upper_breaks_target_order() {
        let mut s = strong_snapshot();
        s.keltner_mid = 106.0;
        s.keltner_upper = 104.0; // target_2 capped at 101.92
        let lv = levels(&s, &TargetConfig::default());
        approx(lv.target_1, 105.0);
        approx(lv.target_2, 101.92);
        assert!(!lv.targets_ordered());
    }

    #[test]
    fn undefined_bands_fall_back_to_percentages() {
        let mut s = strong_snapshot();
        s.keltner_lower = f64::NAN;
        s.keltner_mid = f64::NAN;
        s.keltner_upper = f64::NAN;
        s.supertrend = f64::NAN;
        let lv = levels(&s, &TargetConfig::default());
        approx(lv.entry_optimal, 100.0);
        approx(lv.stop_loss, 99.0);
        approx(lv.target_1, 105.0);
        approx(lv.target_2, 107.0);
    }
}
