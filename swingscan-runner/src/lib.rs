//! swingscan runner: scans a universe and records the run.
//!
//! This crate builds on `swingscan-core` to provide:
//! - Bar sources (CSV directory, deterministic synthetic)
//! - Universe definitions from TOML
//! - The parallel scan pipeline with per-symbol fault isolation
//! - Run reports and their JSON/CSV artifacts

pub mod pipeline;
pub mod report;
pub mod source;
pub mod universe;

pub use pipeline::{
    analyze_symbol, run_scan, scan_universe, series_hash, trim_to_lookback, ScanError,
    SymbolOutcome,
};
pub use report::{ArtifactPaths, RejectedSymbol, ReportError, RunStatus, ScanReport, SCHEMA_VERSION};
pub use source::{generate_synthetic_bars, BarSource, CsvDirSource, LoadError, SyntheticSource};
pub use universe::{Universe, UniverseError};
