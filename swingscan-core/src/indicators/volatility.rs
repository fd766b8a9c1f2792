//! Realized volatility: sample standard deviation of one-bar close returns.

use crate::domain::Bar;
use crate::indicators::rolling::{pct_change, rolling_std};
use crate::indicators::{closes, Indicator};

#[derive(Debug, Clone)]
pub struct Volatility {
    window: usize,
    name: String,
}

impl Volatility {
    pub fn new(window: usize) -> Self {
        assert!(window >= 2, "Volatility window must be >= 2");
        Self {
            window,
            name: format!("volatility_{window}"),
        }
    }
}

impl Indicator for Volatility {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rolling_std(&pct_change(&closes(bars), 1), self.window)
    }
}
