//! Universe file: sector-organized ticker lists.
//!
//! ```toml
//! [sectors]
//! Technology = ["AAPL", "MSFT"]
//! Energy = ["XOM", "CVX"]
//! ```
//!
//! Tickers are normalized (trimmed, upper-cased) and deduplicated; the scan
//! order is sector name order, then file order within a sector, keeping the
//! first occurrence of a repeated ticker.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("failed to read universe '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse universe TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Universe {
    #[serde(default)]
    pub sectors: BTreeMap<String, Vec<String>>,
}

impl Universe {
    pub fn from_file(path: &Path) -> Result<Self, UniverseError> {
        let content = std::fs::read_to_string(path).map_err(|source| UniverseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, UniverseError> {
        Ok(toml::from_str(content)?)
    }

    /// A single unnamed sector holding `symbols`.
    pub fn from_symbols<S: AsRef<str>>(symbols: &[S]) -> Self {
        let mut sectors = BTreeMap::new();
        sectors.insert(
            "Ad hoc".to_string(),
            symbols.iter().map(|s| s.as_ref().to_string()).collect(),
        );
        Self { sectors }
    }

    /// Deduplicated, normalized tickers in scan order.
    pub fn tickers(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.sectors
            .values()
            .flatten()
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect()
    }

    /// Sector of the first occurrence of `symbol`.
    pub fn sector_of(&self, symbol: &str) -> Option<&str> {
        self.sectors
            .iter()
            .find(|(_, tickers)| {
                tickers
                    .iter()
                    .any(|t| t.trim().eq_ignore_ascii_case(symbol))
            })
            .map(|(name, _)| name.as_str())
    }

    pub fn sector_names(&self) -> Vec<&str> {
        self.sectors.keys().map(|s| s.as_str()).collect()
    }

    /// Number of distinct tickers.
    pub fn ticker_count(&self) -> usize {
        self.tickers().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [sectors]
        Technology = ["AAPL", "msft ", "NVDA"]
        Energy = ["XOM", "CVX"]
        ETFs = ["SPY", "AAPL", ""]
    "#;

    #[test]
    fn parses_and_dedups_in_scan_order() {
        let u = Universe::from_toml(SAMPLE).unwrap();
        // BTreeMap order: ETFs, Energy, Technology
        assert_eq!(
            u.tickers(),
            ["SPY", "AAPL", "XOM", "CVX", "MSFT", "NVDA"]
        );
        assert_eq!(u.ticker_count(), 6);
    }

    #[test]
    fn sector_lookup() {
        let u = Universe::from_toml(SAMPLE).unwrap();
        assert_eq!(u.sector_of("MSFT"), Some("Technology"));
        assert_eq!(u.sector_of("AAPL"), Some("ETFs"));
        assert_eq!(u.sector_of("TSLA"), None);
    }

    #[test]
    fn empty_universe() {
        let u = Universe::from_toml("").unwrap();
        assert!(u.tickers().is_empty());
        assert!(u.sector_names().is_empty());
    }

    #[test]
    fn from_symbols_keeps_order() {
        let u = Universe::from_symbols(&["qqq", "SPY"]);
        assert_eq!(u.tickers(), ["QQQ", "SPY"]);
    }

    #[test]
    fn sector_names_in_scan_order() {
        let u = Universe::from_toml(SAMPLE).unwrap();
        assert_eq!(u.sector_names(), ["ETFs", "Energy", "Technology"]);
    }

    #[test]
    fn bad_toml_is_parse_error() {
        assert!(matches!(
            Universe::from_toml("sectors = 3"),
            Err(UniverseError::Parse(_))
        ));
    }
}
