//! Rolling VWAP over a trailing window of bars.
//!
//! VWAP[t] = sum(typical_price * volume) / sum(volume) over the last `window` bars,
//! with typical price = (high + low + close) / 3. Zero traded volume is undefined.

use crate::domain::Bar;
use crate::indicators::rolling::{rolling_sum, safe_div};
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Vwap {
    window: usize,
    name: String,
}

impl Vwap {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "VWAP window must be >= 1");
        Self {
            window,
            name: format!("vwap_{window}"),
        }
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let weighted: Vec<f64> = bars
            .iter()
            .map(|b| b.typical_price() * b.volume as f64)
            .collect();
        let volume: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();

        let num = rolling_sum(&weighted, self.window);
        let den = rolling_sum(&volume, self.window);
        num.iter().zip(&den).map(|(n, d)| safe_div(*n, *d)).collect()
    }
}
