//! Bar: one daily OHLCV observation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar for a single symbol on a single day.
///
/// Prices are expected to be split/dividend adjusted by whoever produced the bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if any price field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// Basic OHLC sanity: high is the top of the range, low the bottom, prices positive.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.low > 0.0
    }

    /// Typical price: (high + low + close) / 3.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Midpoint of the bar's range: (high + low) / 2.
    pub fn hl2(&self) -> f64 {
        (self.high + self.low) / 2.0
    }
}

/// Why a bar series cannot be analyzed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar {index} ({date}) has non-finite or inconsistent prices")]
    InsaneBar { index: usize, date: NaiveDate },

    #[error("bar {index} ({date}) is not after the previous bar ({previous})")]
    OutOfOrder {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("bar {index} belongs to '{found}', expected '{expected}'")]
    MixedSymbols {
        index: usize,
        expected: String,
        found: String,
    },
}

impl BarError {
    /// Index of the offending bar.
    pub fn index(&self) -> usize {
        match self {
            BarError::InsaneBar { index, .. }
            | BarError::OutOfOrder { index, .. }
            | BarError::MixedSymbols { index, .. } => *index,
        }
    }
}

/// Check that a series is sane, single-symbol and strictly chronological.
pub fn validate_bars(bars: &[Bar]) -> Result<(), BarError> {
    let Some(first) = bars.first() else {
        return Ok(());
    };

    for (index, bar) in bars.iter().enumerate() {
        if !bar.is_sane() {
            return Err(BarError::InsaneBar {
                index,
                date: bar.date,
            });
        }
        if bar.symbol != first.symbol {
            return Err(BarError::MixedSymbols {
                index,
                expected: first.symbol.clone(),
                found: bar.symbol.clone(),
            });
        }
        if index > 0 {
            let previous = bars[index - 1].date;
            if bar.date <= previous {
                return Err(BarError::OutOfOrder {
                    index,
                    date: bar.date,
                    previous,
                });
            }
        }
    }

    Ok(())
}
