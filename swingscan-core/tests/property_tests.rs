//! Property tests for scoring and selection invariants.
//!
//! 1. Score monotonicity: moving any single factor in its favorable direction
//!    never lowers the composite score
//! 2. Level sanity: entry never above close, stop strictly below close
//! 3. Selection: bounded, sorted, every entry meets the final gates

use chrono::NaiveDate;
use proptest::prelude::*;
use swingscan_core::indicators::{Direction, Trend};
use swingscan_core::{
    evaluate, levels, score, select_top, Candidate, ScanConfig, Snapshot,
};

fn base_snapshot() -> Snapshot {
    Snapshot {
        symbol: "PROP".into(),
        date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        close: 100.0,
        ema_short: 100.0,
        ema_long: 100.0,
        ema_trend: 100.0,
        rsi: 30.0,
        stoch_k: 25.0,
        stoch_d: 25.0,
        macd: 0.0,
        macd_signal: 0.0,
        macd_histogram: 0.0,
        prev_macd_hist: 0.0,
        atr: 1.2,
        atr_pct: 1.2,
        adx: 28.0,
        keltner_upper: 112.0,
        keltner_mid: 106.0,
        keltner_lower: 99.0,
        supertrend: 98.0,
        st_direction: Some(Direction::Up),
        vwap: 100.0,
        momentum: 0.0,
        volatility: 0.01,
        volume_ratio: 1.6,
        support: 97.0,
        resistance: 108.0,
        trend: Some(Trend::Sideways),
    }
}

fn composite(snap: &Snapshot) -> f64 {
    score(snap, &ScanConfig::default().scoring).score
}

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_pair(lo: f64, hi: f64) -> impl Strategy<Value = (f64, f64)> {
    (lo..hi, lo..hi).prop_map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
}

fn arb_score() -> impl Strategy<Value = f64> {
    (0.0..10.0_f64).prop_map(|s| (s * 100.0).round() / 100.0)
}

// ── 1. Score monotonicity ────────────────────────────────────────────

proptest! {
    /// Lower RSI never scores worse.
    #[test]
    fn rsi_lower_is_better((low, high) in arb_pair(0.0, 100.0)) {
        let mut a = base_snapshot();
        let mut b = base_snapshot();
        a.rsi = low;
        b.rsi = high;
        prop_assert!(composite(&a) >= composite(&b));
    }

    /// Lower %K never scores worse while the %K/%D cross state is unchanged.
    #[test]
    fn stochastic_lower_is_better((low, high) in arb_pair(1.0, 100.0), crossed in any::<bool>()) {
        let d = if crossed { 0.5 } else { 100.5 };
        let mut a = base_snapshot();
        let mut b = base_snapshot();
        a.stoch_k = low;
        b.stoch_k = high;
        a.stoch_d = d;
        b.stoch_d = d;
        prop_assert!(composite(&a) >= composite(&b));
    }

    /// Higher volume ratio never scores worse.
    #[test]
    fn volume_higher_is_better((low, high) in arb_pair(0.0, 5.0)) {
        let mut a = base_snapshot();
        let mut b = base_snapshot();
        a.volume_ratio = high;
        b.volume_ratio = low;
        prop_assert!(composite(&a) >= composite(&b));
    }

    /// Lower ATR% never scores worse.
    #[test]
    fn volatility_lower_is_better((low, high) in arb_pair(0.0, 4.0)) {
        let mut a = base_snapshot();
        let mut b = base_snapshot();
        a.atr_pct = low;
        b.atr_pct = high;
        prop_assert!(composite(&a) >= composite(&b));
    }

    /// Higher ADX never scores worse.
    #[test]
    fn adx_higher_is_better((low, high) in arb_pair(0.0, 80.0)) {
        let mut a = base_snapshot();
        let mut b = base_snapshot();
        a.adx = high;
        b.adx = low;
        prop_assert!(composite(&a) >= composite(&b));
    }

    /// A rising short EMA (long and trend fixed) never scores worse.
    #[test]
    fn ema_short_higher_is_better((low, high) in arb_pair(90.0, 110.0)) {
        let mut a = base_snapshot();
        let mut b = base_snapshot();
        a.ema_short = high;
        b.ema_short = low;
        prop_assert!(composite(&a) >= composite(&b));
    }

    /// A rising histogram (line, signal and previous bar fixed) never scores worse.
    #[test]
    fn macd_histogram_higher_is_better(
        (low, high) in arb_pair(-1.0, 1.0),
        line in -1.0..1.0_f64,
        signal in -1.0..1.0_f64,
        prev in -1.0..1.0_f64,
    ) {
        let mut a = base_snapshot();
        let mut b = base_snapshot();
        for s in [&mut a, &mut b] {
            s.macd = line;
            s.macd_signal = signal;
            s.prev_macd_hist = prev;
        }
        a.macd_histogram = high;
        b.macd_histogram = low;
        prop_assert!(composite(&a) >= composite(&b));
    }

    /// Scores stay in [0, 10] under the default weights.
    #[test]
    fn score_bounded(
        rsi in 0.0..100.0_f64,
        k in 0.0..100.0_f64,
        d in 0.0..100.0_f64,
        vol in 0.0..5.0_f64,
        atr in 0.0..5.0_f64,
        adx in 0.0..100.0_f64,
    ) {
        let mut s = base_snapshot();
        s.rsi = rsi;
        s.stoch_k = k;
        s.stoch_d = d;
        s.volume_ratio = vol;
        s.atr_pct = atr;
        s.adx = adx;
        let total = composite(&s);
        prop_assert!((0.0..=10.0).contains(&total), "score {total}");
    }
}

// ── 2. Level sanity ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn entry_and_stop_bracket_close(
        close in 5.0..500.0_f64,
        lower_off in -0.1..0.1_f64,
        st_off in prop_oneof![-0.1..-0.005_f64, 0.0..0.1_f64],
    ) {
        let mut s = base_snapshot();
        s.close = (close * 100.0).round() / 100.0;
        s.keltner_lower = s.close * (1.0 + lower_off);
        s.supertrend = s.close * (1.0 + st_off);
        let lv = levels(&s, &ScanConfig::default().targets);
        prop_assert!(lv.entry_optimal <= lv.entry_max);
        prop_assert!(lv.stop_loss < s.close);
        prop_assert!(lv.rr_ratio_1.is_finite() && lv.rr_ratio_2.is_finite());
    }
}

// ── 3. Selection ─────────────────────────────────────────────────────

fn template() -> Candidate {
    let mut snap = base_snapshot();
    snap.rsi = 18.0;
    snap.stoch_k = 10.0;
    snap.stoch_d = 5.0;
    snap.ema_short = 102.0;
    snap.ema_long = 101.0;
    snap.macd = 0.3;
    snap.macd_signal = 0.1;
    snap.macd_histogram = 0.2;
    snap.prev_macd_hist = 0.1;
    snap.adx = 35.0;
    snap.volume_ratio = 2.6;
    snap.atr_pct = 0.9;
    snap.keltner_lower = 99.5;
    evaluate(&snap, &ScanConfig::default()).expect("template passes every gate")
}

proptest! {
    #[test]
    fn select_top_is_bounded_sorted_and_gated(
        specs in prop::collection::vec((arb_score(), 0.0..12.0_f64, 0.0..3.0_f64), 0..20),
        top_n in 1usize..6,
    ) {
        let base = template();
        let candidates: Vec<Candidate> = specs
            .iter()
            .enumerate()
            .map(|(i, &(score, rr, atr_pct))| {
                let mut c = base.clone();
                c.symbol = format!("S{i}");
                c.score = score;
                c.levels.rr_ratio_2 = rr;
                c.snapshot.atr_pct = atr_pct;
                c
            })
            .collect();

        let config = ScanConfig::default();
        let list = select_top(&candidates, &config.selection, &config.targets, top_n);

        prop_assert!(list.entries.len() <= top_n);
        prop_assert_eq!(list.considered, candidates.len());
        for pair in list.entries.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        for c in &list.entries {
            prop_assert!(c.score >= config.selection.min_score);
            prop_assert!(c.levels.rr_ratio_2 >= config.targets.min_risk_reward_ratio);
            prop_assert!(c.snapshot.atr_pct <= config.selection.max_atr_pct);
        }
    }
}
