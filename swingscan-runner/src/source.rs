//! Bar sources: where per-symbol daily series come from.
//!
//! The `BarSource` trait is the boundary to market data. Two implementations
//! ship with the runner:
//! - `CsvDirSource`: one `<SYMBOL>.csv` per instrument in a directory
//! - `SyntheticSource`: deterministic seeded random walk (developer mode)
//!
//! Live download is out of scope; anything that can produce `Vec<Bar>` can
//! implement the trait.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use swingscan_core::domain::Bar;
use thiserror::Error;

/// Errors from loading one symbol's bars.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data for '{symbol}' (expected {path})")]
    NotFound { symbol: String, path: PathBuf },

    /// `row` is the zero-based data row, which is also the bar index.
    #[error("malformed data for '{symbol}' at row {row}: {reason}")]
    Malformed {
        symbol: String,
        row: usize,
        reason: String,
    },

    #[error("failed to read data for '{symbol}': {source}")]
    Io {
        symbol: String,
        #[source]
        source: std::io::Error,
    },
}

/// Trait for bar sources. Implementations must be shareable across the
/// scan's worker threads.
pub trait BarSource: Send + Sync {
    /// Short label recorded in the run report.
    fn name(&self) -> &str;

    /// All available daily bars for `symbol`, oldest first.
    fn fetch(&self, symbol: &str) -> Result<Vec<Bar>, LoadError>;
}

// ─── CSV directory ──────────────────────────────────────────────────

/// Reads `<dir>/<SYMBOL>.csv` with header `date,open,high,low,close,volume`.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl BarSource for CsvDirSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, symbol: &str) -> Result<Vec<Bar>, LoadError> {
        let path = self.path_for(symbol);
        let file = match std::fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadError::NotFound {
                    symbol: symbol.to_string(),
                    path,
                });
            }
            Err(source) => {
                return Err(LoadError::Io {
                    symbol: symbol.to_string(),
                    source,
                });
            }
        };

        let malformed = |row: usize, reason: String| LoadError::Malformed {
            symbol: symbol.to_string(),
            row,
            reason,
        };

        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
        let mut bars = Vec::new();
        for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| malformed(index, e.to_string()))?;
            if !(row.volume.is_finite() && row.volume >= 0.0) {
                return Err(malformed(index, format!("invalid volume {}", row.volume)));
            }
            bars.push(Bar {
                symbol: symbol.to_string(),
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume.round() as u64,
            });
        }

        Ok(bars)
    }
}

// ─── Synthetic ──────────────────────────────────────────────────────

/// Deterministic synthetic bars for development runs.
///
/// Each symbol gets a reproducible random walk seeded from the BLAKE3 hash of
/// its name, on weekdays only, ending at `end`. Results built on synthetic data
/// are tagged by the source name in the report.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    end: NaiveDate,
    calendar_days: u32,
}

impl SyntheticSource {
    pub fn new(end: NaiveDate, calendar_days: u32) -> Self {
        Self { end, calendar_days }
    }
}

impl BarSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str) -> Result<Vec<Bar>, LoadError> {
        let start = self.end - chrono::Duration::days(i64::from(self.calendar_days));
        Ok(generate_synthetic_bars(symbol, start, self.end))
    }
}

/// Random walk from a symbol-dependent starting price, skipping weekends.
pub fn generate_synthetic_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut price: f64 = rng.gen_range(20.0..300.0);
    let drift: f64 = rng.gen_range(-0.002..0.002);
    let base_volume: u64 = rng.gen_range(500_000..5_000_000);

    let mut bars = Vec::new();
    let mut current = start;
    while current <= end {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = drift + rng.gen_range(-0.025..0.025);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = (base_volume as f64 * rng.gen_range(0.4..2.8)) as u64;

        bars.push(Bar {
            symbol: symbol.to_string(),
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}
