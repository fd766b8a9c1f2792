//! Scan pipeline: load → trim → snapshot → evaluate per symbol, then rank.
//!
//! Symbols are analyzed in parallel with rayon; results are collected in
//! universe order so the report is identical across runs. A failing symbol is
//! logged and counted, never fatal.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rayon::prelude::*;
use swingscan_core::domain::{Bar, DatasetHash, RunId};
use swingscan_core::{
    compute_snapshot, evaluate, select_top, Candidate, ConfigError, Rejection, ScanConfig,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::report::{RejectedSymbol, RunStatus, ScanReport, SCHEMA_VERSION};
use crate::source::{BarSource, LoadError};
use crate::universe::Universe;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result of analyzing one symbol.
#[derive(Debug, Clone)]
pub struct SymbolOutcome {
    pub symbol: String,
    /// Bars left after lookback trimming.
    pub bars: usize,
    /// Hash of the trimmed series; `None` when nothing was loaded.
    pub dataset: Option<DatasetHash>,
    /// Date of the snapshot, when one was computed.
    pub as_of: Option<NaiveDate>,
    pub result: Result<Candidate, Rejection>,
}

impl SymbolOutcome {
    fn unavailable(symbol: &str, rejection: Rejection) -> Self {
        Self {
            symbol: symbol.to_string(),
            bars: 0,
            dataset: None,
            as_of: None,
            result: Err(rejection),
        }
    }

    pub fn analyzed(&self) -> bool {
        self.as_of.is_some()
    }
}

impl From<LoadError> for Rejection {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Malformed { row, reason, .. } => Rejection::MalformedInput {
                index: row,
                reason,
            },
            other => Rejection::DataUnavailable {
                reason: other.to_string(),
            },
        }
    }
}

/// Keep bars dated within `lookback_days` calendar days of the series' latest bar.
pub fn trim_to_lookback(bars: Vec<Bar>, lookback_days: u32) -> Vec<Bar> {
    let Some(latest) = bars.iter().map(|b| b.date).max() else {
        return bars;
    };
    let cutoff = latest - chrono::Duration::days(i64::from(lookback_days));
    bars.into_iter().filter(|b| b.date >= cutoff).collect()
}

/// BLAKE3 over the symbol and every date and OHLCV value of its series.
pub fn series_hash(symbol: &str, bars: &[Bar]) -> DatasetHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(symbol.as_bytes());
    for bar in bars {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    DatasetHash(hasher.finalize().to_hex().to_string())
}

/// Load, trim and evaluate a single symbol.
pub fn analyze_symbol(source: &dyn BarSource, symbol: &str, config: &ScanConfig) -> SymbolOutcome {
    let bars = match source.fetch(symbol) {
        Ok(bars) => trim_to_lookback(bars, config.lookback_days),
        Err(e) => return SymbolOutcome::unavailable(symbol, e.into()),
    };

    let dataset = Some(series_hash(symbol, &bars));
    let (as_of, result) = match compute_snapshot(&bars, &config.indicators) {
        Ok(snapshot) => (Some(snapshot.date), evaluate(&snapshot, config)),
        Err(e) => (None, Err(e.into())),
    };

    SymbolOutcome {
        symbol: symbol.to_string(),
        bars: bars.len(),
        dataset,
        as_of,
        result,
    }
}

/// Scan every symbol of a universe, tagging candidates with their sector.
pub fn scan_universe(
    source: &dyn BarSource,
    universe: &Universe,
    config: &ScanConfig,
) -> Result<ScanReport, ScanError> {
    let tickers = universe.tickers();
    info!(
        sectors = ?universe.sector_names(),
        tickers = tickers.len(),
        "scanning universe"
    );

    let mut report = run_scan(source, &tickers, config)?;
    report.sectors = report
        .candidates
        .iter()
        .filter_map(|c| {
            universe
                .sector_of(&c.symbol)
                .map(|sector| (c.symbol.clone(), sector.to_string()))
        })
        .collect();
    Ok(report)
}

/// Run a full scan over `symbols` and assemble the report.
pub fn run_scan(
    source: &dyn BarSource,
    symbols: &[String],
    config: &ScanConfig,
) -> Result<ScanReport, ScanError> {
    config.validate()?;
    let config_fingerprint = config.fingerprint()?;
    let started_at = Utc::now();

    info!(
        symbols = symbols.len(),
        source = source.name(),
        config = config_fingerprint.short(),
        "starting scan"
    );

    let outcomes: Vec<SymbolOutcome> = symbols
        .par_iter()
        .map(|symbol| analyze_symbol(source, symbol, config))
        .collect();

    let mut rejection_counts = BTreeMap::new();
    let mut rejections = Vec::new();
    let mut candidates = Vec::new();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(candidate) => {
                debug!(
                    symbol = %outcome.symbol,
                    score = candidate.score,
                    signal = candidate.signal.label(),
                    "candidate"
                );
                candidates.push(candidate.clone());
            }
            Err(rejection) => {
                if rejection.is_data_problem() {
                    warn!(symbol = %outcome.symbol, reason = %rejection, "skipping symbol");
                } else {
                    debug!(symbol = %outcome.symbol, reason = %rejection, "eliminated");
                }
                *rejection_counts.entry(rejection.kind()).or_insert(0) += 1;
                rejections.push(RejectedSymbol {
                    symbol: outcome.symbol.clone(),
                    kind: rejection.kind(),
                    reason: rejection.to_string(),
                });
            }
        }
    }

    let dataset_hash = DatasetHash::combine(outcomes.iter().filter_map(|o| o.dataset.as_ref()));
    let as_of = outcomes.iter().filter_map(|o| o.as_of).max();
    let as_of_label = as_of.map_or_else(|| "none".to_string(), |d| d.to_string());
    let run_id = RunId::derive(&config_fingerprint, &dataset_hash, &as_of_label);

    let shortlist = select_top(&candidates, &config.selection, &config.targets, config.top_n);
    let status = if shortlist.is_empty() {
        RunStatus::NoSignals
    } else {
        RunStatus::Signals
    };
    let analyzed = outcomes.iter().filter(|o| o.analyzed()).count();

    info!(
        analyzed,
        candidates = candidates.len(),
        shortlisted = shortlist.entries.len(),
        rejected = rejections.len(),
        status = ?status,
        "scan complete"
    );

    Ok(ScanReport {
        schema_version: SCHEMA_VERSION,
        run_id,
        config_fingerprint,
        dataset_hash,
        source: source.name().to_string(),
        started_at,
        finished_at: Utc::now(),
        as_of,
        universe_size: symbols.len(),
        analyzed,
        rejection_counts,
        rejections,
        candidates,
        sectors: BTreeMap::new(),
        shortlist,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::generate_synthetic_bars;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn trim_keeps_lookback_window() {
        let bars = generate_synthetic_bars("ACME", d(2024, 1, 1), d(2024, 6, 28));
        let trimmed = trim_to_lookback(bars, 90);
        let first = trimmed.first().unwrap().date;
        let last = trimmed.last().unwrap().date;
        assert_eq!(last, d(2024, 6, 28));
        assert!(first >= d(2024, 3, 30));
        assert!((last - first).num_days() <= 90);
    }

    #[test]
    fn trim_of_empty_series() {
        assert!(trim_to_lookback(Vec::new(), 90).is_empty());
    }

    #[test]
    fn series_hash_depends_on_values() {
        let bars = generate_synthetic_bars("ACME", d(2024, 1, 1), d(2024, 2, 1));
        let mut changed = bars.clone();
        changed[3].close += 0.01;
        assert_eq!(series_hash("ACME", &bars), series_hash("ACME", &bars));
        assert_ne!(series_hash("ACME", &bars), series_hash("ACME", &changed));
    }

    #[test]
    fn load_errors_map_to_rejections() {
        let malformed = LoadError::Malformed {
            symbol: "X".into(),
            row: 4,
            reason: "bad float".into(),
        };
        assert!(matches!(
            Rejection::from(malformed),
            Rejection::MalformedInput { index: 4, .. }
        ));

        let missing = LoadError::NotFound {
            symbol: "X".into(),
            path: "data/X.csv".into(),
        };
        assert!(matches!(
            Rejection::from(missing),
            Rejection::DataUnavailable { .. }
        ));
    }
}
