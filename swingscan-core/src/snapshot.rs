//! Indicator snapshot: the latest value of every indicator for one instrument.
//!
//! `compute_snapshot` runs every indicator over the full series and keeps the
//! last element. Published values are rounded the way reports show them: prices,
//! ratios and oscillators to 2 decimals; MACD lines, momentum and volatility to
//! 4. `atr_pct` is derived from the unrounded ATR and close. Undefined values
//! stay NaN; it is the scoring gates' job to refuse them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::IndicatorParams;
use crate::domain::{validate_bars, Bar};
use crate::error::AnalysisError;
use crate::indicators::{
    classify_trend, closes, Adx, Atr, Direction, Ema, Indicator, Keltner, Macd, Momentum,
    PriceRange, Rsi, Stochastic, Supertrend, Trend, Volatility, VolumeRatio, Vwap,
};
use crate::numeric::round_to;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    pub ema_trend: f64,
    pub rsi: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
    pub prev_macd_hist: f64,
    pub atr: f64,
    pub atr_pct: f64,
    pub adx: f64,
    pub keltner_upper: f64,
    pub keltner_mid: f64,
    pub keltner_lower: f64,
    pub supertrend: f64,
    /// `None` until price first crosses a SuperTrend band; `supertrend` is NaN then too.
    pub st_direction: Option<Direction>,
    pub vwap: f64,
    pub momentum: f64,
    pub volatility: f64,
    pub volume_ratio: f64,
    pub support: f64,
    pub resistance: f64,
    pub trend: Option<Trend>,
}

impl Snapshot {
    /// Fields the scoring engine reads, by name, in gate order.
    pub fn required_fields(&self) -> [(&'static str, f64); 14] {
        [
            ("close", self.close),
            ("ema_short", self.ema_short),
            ("ema_long", self.ema_long),
            ("ema_trend", self.ema_trend),
            ("rsi", self.rsi),
            ("stoch_k", self.stoch_k),
            ("stoch_d", self.stoch_d),
            ("macd", self.macd),
            ("macd_signal", self.macd_signal),
            ("macd_histogram", self.macd_histogram),
            ("prev_macd_hist", self.prev_macd_hist),
            ("atr_pct", self.atr_pct),
            ("adx", self.adx),
            ("volume_ratio", self.volume_ratio),
        ]
    }
}

fn last(series: &[f64]) -> f64 {
    series.last().copied().unwrap_or(f64::NAN)
}

fn latest(indicator: &dyn Indicator, bars: &[Bar]) -> f64 {
    last(&indicator.compute(bars))
}

/// Compute the latest indicator snapshot of a chronological single-symbol series.
pub fn compute_snapshot(bars: &[Bar], params: &IndicatorParams) -> Result<Snapshot, AnalysisError> {
    if let Some((name, value, min)) = params.undersized_period() {
        return Err(AnalysisError::InvalidParameter { name, value, min });
    }
    validate_bars(bars)?;

    let required = params.min_bars.max(2);
    let (Some(latest_bar), true) = (bars.last(), bars.len() >= required) else {
        return Err(AnalysisError::InsufficientHistory {
            available: bars.len(),
            required,
        });
    };

    let (k, d, smooth) = (params.stoch_k(), params.stoch_d(), params.stoch_smooth());
    let (fast, slow, signal) = (params.macd_fast, params.macd_slow, params.macd_signal);

    let histogram = Macd::histogram(fast, slow, signal).compute(bars);
    let prev_macd_hist = histogram
        .len()
        .checked_sub(2)
        .map_or(f64::NAN, |i| histogram[i]);

    let close = latest_bar.close;
    let atr = latest(&Atr::new(params.atr_period), bars);
    let atr_pct = atr / close * 100.0;

    let supertrend = Supertrend::new(params.supertrend_period, params.supertrend_multiplier);
    let st_state = supertrend.states(bars).last().copied().flatten();

    let keltner = |band: fn(usize, f64) -> Keltner| {
        latest(&band(params.keltner_period, params.keltner_multiplier), bars)
    };

    let r2 = |v: f64| round_to(v, 2);
    let r4 = |v: f64| round_to(v, 4);

    Ok(Snapshot {
        symbol: latest_bar.symbol.clone(),
        date: latest_bar.date,
        close: r2(close),
        ema_short: r2(latest(&Ema::new(params.ema_short), bars)),
        ema_long: r2(latest(&Ema::new(params.ema_long), bars)),
        ema_trend: r2(latest(&Ema::new(params.ema_trend), bars)),
        rsi: r2(latest(&Rsi::new(params.rsi_period), bars)),
        stoch_k: r2(latest(&Stochastic::k(k, d, smooth), bars)),
        stoch_d: r2(latest(&Stochastic::d(k, d, smooth), bars)),
        macd: r4(latest(&Macd::line(fast, slow, signal), bars)),
        macd_signal: r4(latest(&Macd::signal(fast, slow, signal), bars)),
        macd_histogram: r4(last(&histogram)),
        prev_macd_hist: r4(prev_macd_hist),
        atr: r2(atr),
        atr_pct: r2(atr_pct),
        adx: r2(latest(&Adx::new(params.adx_period), bars)),
        keltner_upper: r2(keltner(Keltner::upper)),
        keltner_mid: r2(keltner(Keltner::middle)),
        keltner_lower: r2(keltner(Keltner::lower)),
        supertrend: r2(st_state.map_or(f64::NAN, |s| s.line)),
        st_direction: st_state.map(|s| s.direction),
        vwap: r2(latest(&Vwap::new(params.vwap_window), bars)),
        momentum: r4(latest(&Momentum::new(params.momentum_period), bars)),
        volatility: r4(latest(&Volatility::new(params.volatility_window), bars)),
        volume_ratio: r2(latest(&VolumeRatio::new(params.volume_window), bars)),
        support: r2(latest(&PriceRange::support(params.support_resistance_window), bars)),
        resistance: r2(latest(
            &PriceRange::resistance(params.support_resistance_window),
            bars,
        )),
        trend: classify_trend(
            &closes(bars),
            params.trend_window,
            params.trend_slope_threshold,
        ),
    })
}
