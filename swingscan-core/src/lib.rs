//! swingscan core: indicator engine, scoring, trade levels and selection.
//!
//! Everything here is a pure function of its inputs:
//! - Domain types (bars, content hashes)
//! - Indicators over a full bar series, NaN where undefined
//! - Latest-bar snapshot of every indicator
//! - Elimination gates, sub-score ladders and the composite score
//! - Entry/stop/target levels with risk/reward ratios
//! - Cross-instrument ranking into a bounded shortlist
//! - Typed scan configuration

pub mod candidate;
pub mod config;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod levels;
pub mod numeric;
pub mod scoring;
pub mod selector;
pub mod snapshot;

pub use candidate::{evaluate, Candidate};
pub use config::{
    ConfigError, IndicatorParams, ScanConfig, ScoringConfig, SelectionConfig, SignalThresholds,
    TargetConfig,
};
pub use domain::{Bar, BarError};
pub use error::{AnalysisError, Rejection, RejectionKind};
pub use levels::{levels, TradeLevels};
pub use scoring::{
    check_eligibility, classify_signal, eligible, score, ScoreBreakdown, ScoreResult, SignalTag,
    Strength,
};
pub use selector::{select_top, Shortlist, ShortlistSummary};
pub use snapshot::{compute_snapshot, Snapshot};
