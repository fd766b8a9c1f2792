//! Relative Strength Index (RSI), simple-average variant.
//!
//! Gains and losses are averaged with a plain trailing mean over `period` price
//! changes (not Wilder smoothing).
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period.
//! Edge case: avg_loss == 0 → NaN (undefined, including the flat-price case).

use crate::domain::Bar;
use crate::indicators::rolling::rolling_mean;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut gains = vec![f64::NAN; n];
        let mut losses = vec![f64::NAN; n];

        for i in 1..n {
            let change = bars[i].close - bars[i - 1].close;
            if change.is_nan() {
                continue;
            }
            gains[i] = change.max(0.0);
            losses[i] = (-change).max(0.0);
        }

        let avg_gain = rolling_mean(&gains, self.period);
        let avg_loss = rolling_mean(&losses, self.period);

        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&gain, &loss)| {
                if gain.is_nan() || loss.is_nan() || loss == 0.0 {
                    f64::NAN
                } else {
                    100.0 - 100.0 / (1.0 + gain / loss)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn rsi_known_value() {
        // Changes: +2, -1, +3, -2 → period 4
        // avg_gain = 5/4, avg_loss = 3/4, rs = 5/3, rsi = 100 - 100/(8/3) = 62.5
        let bars = make_bars(&[10.0, 12.0, 11.0, 14.0, 12.0]);
        let result = Rsi::new(4).compute(&bars);
        assert!(result[3].is_nan());
        assert_approx(result[4], 62.5, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_flat_prices_are_undefined() {
        let bars = make_bars(&[50.0; 20]);
        let result = Rsi::new(9).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_no_losses_is_undefined() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let result = Rsi::new(3).compute(&bars);
        assert!(result[4].is_nan());
    }

    #[test]
    fn rsi_only_losses_is_zero() {
        let bars = make_bars(&[5.0, 4.0, 3.0, 2.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[3], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_bounds() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.7).sin() * 4.0).collect();
        let result = Rsi::new(9).compute(&make_bars(&closes));
        for v in result.iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(v), "RSI out of bounds: {v}");
        }
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(9).lookback(), 9);
    }
}
