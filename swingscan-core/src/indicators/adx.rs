//! ADX: Average Directional Index, simple-average variant.
//!
//! Steps:
//! 1. +DM = max(high[t] - high[t-1], 0), -DM = max(low[t-1] - low[t], 0)
//!    (each taken on its own; undefined on the first bar)
//! 2. Smooth +DM, -DM and single-bar TR with a trailing mean over `period`
//! 3. +DI = 100 * mean(+DM) / mean(TR), -DI = 100 * mean(-DM) / mean(TR)
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 5. ADX = mean(DX, period)
//!
//! Zero denominators (flat prices) propagate as NaN rather than zero.
//! Lookback: 2 * period - 1.

use crate::domain::Bar;
use crate::indicators::atr::true_range;
use crate::indicators::rolling::{rolling_mean, safe_div};
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    name: String,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self {
            period,
            name: format!("adx_{period}"),
        }
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        2 * self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut plus_dm = vec![f64::NAN; n];
        let mut minus_dm = vec![f64::NAN; n];

        for i in 1..n {
            plus_dm[i] = (bars[i].high - bars[i - 1].high).max(0.0);
            minus_dm[i] = (bars[i - 1].low - bars[i].low).max(0.0);
        }

        let tr = true_range(bars);
        let smooth_tr = rolling_mean(&tr, self.period);
        let smooth_plus = rolling_mean(&plus_dm, self.period);
        let smooth_minus = rolling_mean(&minus_dm, self.period);

        let dx: Vec<f64> = (0..n)
            .map(|i| {
                let plus_di = 100.0 * safe_div(smooth_plus[i], smooth_tr[i]);
                let minus_di = 100.0 * safe_div(smooth_minus[i], smooth_tr[i]);
                100.0 * safe_div((plus_di - minus_di).abs(), plus_di + minus_di)
            })
            .collect();

        rolling_mean(&dx, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlcv_bars, DEFAULT_EPSILON};

    fn trending(step: f64, count: usize) -> Vec<Bar> {
        let data: Vec<(f64, f64, f64, f64, u64)> = (0..count)
            .map(|i| {
                let base = 100.0 + i as f64 * step;
                (base - 1.0, base + 3.0, base - 3.0, base + 2.0, 1000)
            })
            .collect();
        make_ohlcv_bars(&data)
    }

    #[test]
    fn pure_uptrend_is_100() {
        // Every bar makes a higher high and a higher low → -DM = 0, so DX = 100.
        let result = Adx::new(5).compute(&trending(5.0, 20));
        assert!(result[8].is_nan());
        assert_approx(result[9], 100.0, DEFAULT_EPSILON);
        assert_approx(result[19], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn adx_bounds() {
        let data: Vec<(f64, f64, f64, f64, u64)> = (0..60)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.5).sin() * 6.0;
                (c, c + 1.5, c - 1.5, c + 0.5, 1000)
            })
            .collect();
        let result = Adx::new(14).compute(&make_ohlcv_bars(&data));
        let valid: Vec<&f64> = result.iter().filter(|v| !v.is_nan()).collect();
        assert!(!valid.is_empty());
        for v in valid {
            assert!((0.0..=100.0).contains(v), "ADX out of bounds: {v}");
        }
    }

    #[test]
    fn flat_prices_are_undefined() {
        let bars = make_ohlcv_bars(&[(50.0, 50.0, 50.0, 50.0, 1000); 40]);
        let result = Adx::new(14).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn adx_lookback() {
        assert_eq!(Adx::new(14).lookback(), 27);
    }
}
