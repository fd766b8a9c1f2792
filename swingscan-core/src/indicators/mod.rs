//! Indicator implementations.
//!
//! Every indicator is a pure function of the bar history: it takes the full series
//! and returns an output series of the same length, with `f64::NAN` wherever the
//! value is undefined (warmup, zero denominators, NaN inputs). The snapshot engine
//! only reads the last element of each series.
//!
//! Multi-series indicators (Stochastic, MACD, Keltner, support/resistance) are
//! exposed as separate named instances per line, keeping the single-series
//! `Indicator` trait unchanged. SuperTrend additionally exposes its state sequence.

pub mod adx;
pub mod atr;
pub mod ema;
pub mod keltner;
pub mod macd;
pub mod momentum;
pub mod range;
pub mod rolling;
pub mod rsi;
pub mod stochastic;
pub mod supertrend;
pub mod trend;
pub mod volatility;
pub mod volume;
pub mod vwap;

pub use adx::Adx;
pub use atr::{true_range, Atr};
pub use ema::{ema_of_series, Ema};
pub use keltner::{Keltner, KeltnerBand};
pub use macd::{Macd, MacdLine};
pub use momentum::Momentum;
pub use range::{PriceRange, RangeBound};
pub use rsi::Rsi;
pub use stochastic::{Stochastic, StochasticLine};
pub use supertrend::{Direction, Supertrend, SupertrendState};
pub use trend::{classify_trend, Trend};
pub use volatility::Volatility;
pub use volume::VolumeRatio;
pub use vwap::Vwap;

use crate::domain::Bar;

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_20", "atr_7").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a `Vec<f64>` of the same length as `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Extract the close prices of a series.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLCV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let data: Vec<(f64, f64, f64, f64, u64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            (open, open.max(close) + 1.0, open.min(close) - 1.0, close, 1000)
        })
        .collect();
    make_ohlcv_bars(&data)
}

/// Create bars from explicit (open, high, low, close, volume) tuples for testing.
#[cfg(test)]
pub fn make_ohlcv_bars(data: &[(f64, f64, f64, f64, u64)]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close, volume))| Bar {
            symbol: "TEST".to_string(),
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
