//! Trend label from the average per-bar close change over a trailing window.
//!
//! slope = (newest close - oldest close of the trailing window) / window
//! slope >  threshold → Bullish
//! slope < -threshold → Bearish
//! otherwise          → Sideways
//!
//! The threshold is in price units, not percent.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Sideways,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Trend::Bullish => "bullish",
            Trend::Bearish => "bearish",
            Trend::Sideways => "sideways",
        };
        f.write_str(label)
    }
}

/// Classify the trend at the end of `closes`.
///
/// Returns `None` when there are not enough closes or the slope is undefined.
pub fn classify_trend(closes: &[f64], window: usize, threshold: f64) -> Option<Trend> {
    if window == 0 || closes.len() < window {
        return None;
    }
    let last = closes[closes.len() - 1];
    let base = closes[closes.len() - window];
    let slope = (last - base) / window as f64;
    if !slope.is_finite() {
        return None;
    }

    Some(if slope > threshold {
        Trend::Bullish
    } else if slope < -threshold {
        Trend::Bearish
    } else {
        Trend::Sideways
    })
}
