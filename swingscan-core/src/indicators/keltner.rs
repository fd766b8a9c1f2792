//! Keltner Channel: EMA +/- ATR multiplier.
//!
//! Three bands (separate Indicator instances), sharing one period:
//! - Middle: EMA(close, period)
//! - Upper: middle + mult * ATR(period)
//! - Lower: middle - mult * ATR(period)
//!
//! Lookback: period - 1 (ATR warmup; the EMA is defined from the first bar).

use crate::domain::Bar;
use crate::indicators::atr::atr_series;
use crate::indicators::ema::ema_of_series;
use crate::indicators::{closes, Indicator};

/// Which band of the Keltner Channel to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeltnerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Keltner {
    period: usize,
    multiplier: f64,
    band: KeltnerBand,
    name: String,
}

impl Keltner {
    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, KeltnerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, KeltnerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, KeltnerBand::Lower)
    }

    fn with_band(period: usize, multiplier: f64, band: KeltnerBand) -> Self {
        assert!(period >= 1, "Keltner period must be >= 1");
        let tag = match band {
            KeltnerBand::Upper => "upper",
            KeltnerBand::Middle => "middle",
            KeltnerBand::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("keltner_{tag}_{period}_{multiplier}"),
        }
    }
}

impl Indicator for Keltner {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.band {
            KeltnerBand::Middle => 0,
            KeltnerBand::Upper | KeltnerBand::Lower => self.period - 1,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let mid = ema_of_series(&closes(bars), self.period);
        let sign = match self.band {
            KeltnerBand::Middle => return mid,
            KeltnerBand::Upper => 1.0,
            KeltnerBand::Lower => -1.0,
        };

        let atr = atr_series(bars, self.period);
        mid.iter()
            .zip(&atr)
            .map(|(m, a)| m + sign * self.multiplier * a)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlcv_bars, DEFAULT_EPSILON};

    fn sample() -> Vec<Bar> {
        make_ohlcv_bars(&[
            (10.0, 12.0, 9.0, 11.0, 1000),
            (11.0, 13.0, 10.0, 12.0, 1000),
            (12.0, 14.0, 11.0, 13.0, 1000),
            (13.0, 15.0, 12.0, 14.0, 1000),
            (14.0, 16.0, 13.0, 15.0, 1000),
        ])
    }

    #[test]
    fn middle_is_ema() {
        let result = Keltner::middle(3, 2.0).compute(&sample());
        // seed 11, alpha 0.5 → 11.5, 12.25
        assert_approx(result[0], 11.0, DEFAULT_EPSILON);
        assert_approx(result[1], 11.5, DEFAULT_EPSILON);
        assert_approx(result[2], 12.25, DEFAULT_EPSILON);
    }

    #[test]
    fn bands_are_symmetric_and_ordered() {
        let bars = sample();
        let u = Keltner::upper(3, 2.0).compute(&bars);
        let m = Keltner::middle(3, 2.0).compute(&bars);
        let l = Keltner::lower(3, 2.0).compute(&bars);

        assert!(u[1].is_nan() && l[1].is_nan());
        for i in 2..5 {
            assert!(u[i] > m[i] && m[i] > l[i], "bands not ordered at {i}");
            assert_approx(u[i] - m[i], m[i] - l[i], DEFAULT_EPSILON);
        }
        // TR = [3, 3, 3] → ATR[2] = 3, upper = 12.25 + 6
        assert_approx(u[2], 18.25, DEFAULT_EPSILON);
    }

    #[test]
    fn keltner_lookback() {
        assert_eq!(Keltner::upper(10, 2.0).lookback(), 9);
        assert_eq!(Keltner::middle(10, 2.0).lookback(), 0);
    }
}
