//! Support and resistance as the trailing price range.
//!
//! Support:    lowest low over the last `window` bars (including the current bar)
//! Resistance: highest high over the last `window` bars
//!
//! Lookback: window - 1.

use crate::domain::Bar;
use crate::indicators::rolling::{rolling_max, rolling_min};
use crate::indicators::Indicator;

/// Which side of the range to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Support,
    Resistance,
}

#[derive(Debug, Clone)]
pub struct PriceRange {
    window: usize,
    bound: RangeBound,
    name: String,
}

impl PriceRange {
    pub fn support(window: usize) -> Self {
        Self::with_bound(window, RangeBound::Support)
    }

    pub fn resistance(window: usize) -> Self {
        Self::with_bound(window, RangeBound::Resistance)
    }

    fn with_bound(window: usize, bound: RangeBound) -> Self {
        assert!(window >= 1, "PriceRange window must be >= 1");
        let tag = match bound {
            RangeBound::Support => "support",
            RangeBound::Resistance => "resistance",
        };
        Self {
            window,
            bound,
            name: format!("{tag}_{window}"),
        }
    }
}

impl Indicator for PriceRange {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        match self.bound {
            RangeBound::Support => {
                let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
                rolling_min(&lows, self.window)
            }
            RangeBound::Resistance => {
                let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
                rolling_max(&highs, self.window)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlcv_bars, DEFAULT_EPSILON};

    #[test]
    fn window_extremes() {
        let bars = make_ohlcv_bars(&[
            (10.0, 12.0, 8.0, 11.0, 1000),
            (11.0, 15.0, 10.0, 14.0, 1000),
            (14.0, 14.0, 9.0, 10.0, 1000),
            (10.0, 11.0, 9.5, 10.5, 1000),
        ]);
        let support = PriceRange::support(3).compute(&bars);
        let resistance = PriceRange::resistance(3).compute(&bars);
        assert!(support[1].is_nan());
        assert_approx(support[2], 8.0, DEFAULT_EPSILON);
        assert_approx(resistance[2], 15.0, DEFAULT_EPSILON);
        // first bar rolls out
        assert_approx(support[3], 9.0, DEFAULT_EPSILON);
        assert_approx(resistance[3], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn names() {
        assert_eq!(PriceRange::support(20).name(), "support_20");
        assert_eq!(PriceRange::resistance(20).name(), "resistance_20");
    }
}
