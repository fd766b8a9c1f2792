//! Stochastic oscillator (slow form).
//!
//! %K_raw = 100 * (close - lowest_low(k)) / (highest_high(k) - lowest_low(k))
//! %K     = mean(%K_raw, smooth)
//! %D     = mean(%K, d)
//!
//! A zero high-low range makes %K_raw undefined (NaN).
//! Lookback: (k - 1) + (smooth - 1) for %K, plus (d - 1) for %D.

use crate::domain::Bar;
use crate::indicators::rolling::{rolling_max, rolling_mean, rolling_min, safe_div};
use crate::indicators::Indicator;

/// Which line of the oscillator to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochasticLine {
    K,
    D,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    smooth: usize,
    line: StochasticLine,
    name: String,
}

impl Stochastic {
    pub fn k(k_period: usize, d_period: usize, smooth: usize) -> Self {
        Self::with_line(k_period, d_period, smooth, StochasticLine::K)
    }

    pub fn d(k_period: usize, d_period: usize, smooth: usize) -> Self {
        Self::with_line(k_period, d_period, smooth, StochasticLine::D)
    }

    fn with_line(k_period: usize, d_period: usize, smooth: usize, line: StochasticLine) -> Self {
        assert!(
            k_period >= 1 && d_period >= 1 && smooth >= 1,
            "Stochastic periods must be >= 1"
        );
        let tag = match line {
            StochasticLine::K => "k",
            StochasticLine::D => "d",
        };
        Self {
            k_period,
            d_period,
            smooth,
            line,
            name: format!("stoch_{tag}_{k_period}_{d_period}_{smooth}"),
        }
    }

    fn smoothed_k(&self, bars: &[Bar]) -> Vec<f64> {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let highest = rolling_max(&highs, self.k_period);
        let lowest = rolling_min(&lows, self.k_period);

        let raw: Vec<f64> = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| 100.0 * safe_div(bar.close - lowest[i], highest[i] - lowest[i]))
            .collect();

        rolling_mean(&raw, self.smooth)
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        let k = self.k_period - 1 + self.smooth - 1;
        match self.line {
            StochasticLine::K => k,
            StochasticLine::D => k + self.d_period - 1,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let k = self.smoothed_k(bars);
        match self.line {
            StochasticLine::K => k,
            StochasticLine::D => rolling_mean(&k, self.d_period),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlcv_bars, DEFAULT_EPSILON};

    fn ramp() -> Vec<Bar> {
        // Close always at the top of a widening range → %K_raw = 100 once the window fills.
        let data: Vec<(f64, f64, f64, f64, u64)> = (0..10)
            .map(|i| {
                let c = 100.0 + i as f64;
                (c - 0.5, c, c - 1.0, c, 1000)
            })
            .collect();
        make_ohlcv_bars(&data)
    }

    #[test]
    fn close_at_high_gives_100() {
        let bars = ramp();
        let k = Stochastic::k(3, 3, 1).compute(&bars);
        assert!(k[1].is_nan());
        assert_approx(k[2], 100.0, DEFAULT_EPSILON);
        assert_approx(k[9], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn d_is_mean_of_k() {
        let bars = make_ohlcv_bars(&[
            (10.0, 11.0, 9.0, 10.0, 1000),
            (10.0, 12.0, 9.0, 11.0, 1000),
            (11.0, 12.0, 10.0, 10.0, 1000),
            (10.0, 13.0, 10.0, 12.0, 1000),
            (12.0, 12.5, 9.5, 10.0, 1000),
        ]);
        let k = Stochastic::k(2, 2, 1).compute(&bars);
        let d = Stochastic::d(2, 2, 1).compute(&bars);
        // k[1]: window lows [9,9], highs [11,12] → 100*(11-9)/3
        assert_approx(k[1], 200.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(d[2], (k[1] + k[2]) / 2.0, DEFAULT_EPSILON);
        assert_approx(d[4], (k[3] + k[4]) / 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_range_is_undefined() {
        let bars = make_ohlcv_bars(&[(10.0, 10.0, 10.0, 10.0, 1000); 6]);
        let k = Stochastic::k(3, 3, 1).compute(&bars);
        assert!(k.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn lookback_accounts_for_smoothing() {
        assert_eq!(Stochastic::k(9, 3, 3).lookback(), 10);
        assert_eq!(Stochastic::d(9, 3, 3).lookback(), 12);
    }
}
