//! Rate-of-change momentum: close[t] / close[t - period] - 1.

use crate::domain::Bar;
use crate::indicators::rolling::pct_change;
use crate::indicators::{closes, Indicator};

#[derive(Debug, Clone)]
pub struct Momentum {
    period: usize,
    name: String,
}

impl Momentum {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Momentum period must be >= 1");
        Self {
            period,
            name: format!("momentum_{period}"),
        }
    }
}

impl Indicator for Momentum {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        pct_change(&closes(bars), self.period)
    }
}
