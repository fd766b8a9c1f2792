//! Run report and its on-disk artifacts.
//!
//! - `report_<YYYYMMDD>.json`: the full `ScanReport`, schema-versioned
//! - `shortlist.csv`: one row per shortlisted candidate
//!
//! Unknown (newer) schema versions are rejected on load.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use swingscan_core::domain::{ConfigFingerprint, DatasetHash, RunId};
use swingscan_core::{Candidate, RejectionKind, Shortlist};
use thiserror::Error;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("unsupported schema version {found} (max supported: {max})")]
    UnsupportedSchema { found: u32, max: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// At least one candidate made the shortlist.
    Signals,
    /// Nothing survived; not an error.
    NoSignals,
}

/// One instrument that did not become a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedSymbol {
    pub symbol: String,
    pub kind: RejectionKind,
    pub reason: String,
}

/// Everything one scan produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub schema_version: u32,
    pub run_id: RunId,
    pub config_fingerprint: ConfigFingerprint,
    pub dataset_hash: DatasetHash,
    /// Name of the bar source (`csv`, `synthetic`, ...).
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Latest bar date among analyzed instruments.
    pub as_of: Option<NaiveDate>,
    pub universe_size: usize,
    /// Instruments that produced a snapshot.
    pub analyzed: usize,
    pub rejection_counts: BTreeMap<RejectionKind, usize>,
    pub rejections: Vec<RejectedSymbol>,
    pub candidates: Vec<Candidate>,
    /// Sector of each candidate, when the scan ran over a universe file.
    #[serde(default)]
    pub sectors: BTreeMap<String, String>,
    pub shortlist: Shortlist,
    pub status: RunStatus,
}

/// Paths of the artifacts written for one run.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub report: PathBuf,
    pub shortlist: PathBuf,
}

impl ScanReport {
    pub fn rejected(&self) -> usize {
        self.rejection_counts.values().sum()
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        let report: Self = serde_json::from_str(json)?;
        if report.schema_version > SCHEMA_VERSION {
            return Err(ReportError::UnsupportedSchema {
                found: report.schema_version,
                max: SCHEMA_VERSION,
            });
        }
        Ok(report)
    }

    /// File name of the JSON report, dated by the run start (UTC).
    pub fn report_file_name(&self) -> String {
        format!("report_{}.json", self.started_at.format("%Y%m%d"))
    }

    /// Shortlist as CSV, ranked.
    pub fn shortlist_csv(&self) -> Result<String, ReportError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record([
            "rank",
            "symbol",
            "date",
            "close",
            "score",
            "strength",
            "signal",
            "rsi",
            "adx",
            "atr_pct",
            "volume_ratio",
            "entry_optimal",
            "entry_max",
            "stop_loss",
            "target_1",
            "target_2",
            "target_3",
            "rr_ratio_2",
            "risk_pct",
        ])?;

        for (i, c) in self.shortlist.entries.iter().enumerate() {
            let s = &c.snapshot;
            let lv = &c.levels;
            wtr.write_record([
                &(i + 1).to_string(),
                &c.symbol,
                &s.date.to_string(),
                &format!("{:.2}", s.close),
                &format!("{:.2}", c.score),
                c.strength.label(),
                c.signal.label(),
                &format!("{:.2}", s.rsi),
                &format!("{:.2}", s.adx),
                &format!("{:.2}", s.atr_pct),
                &format!("{:.2}", s.volume_ratio),
                &format!("{:.2}", lv.entry_optimal),
                &format!("{:.2}", lv.entry_max),
                &format!("{:.2}", lv.stop_loss),
                &format!("{:.2}", lv.target_1),
                &format!("{:.2}", lv.target_2),
                &format!("{:.2}", lv.target_3),
                &format!("{:.2}", lv.rr_ratio_2),
                &format!("{:.2}", lv.risk_pct),
            ])?;
        }

        let data = wtr
            .into_inner()
            .map_err(|e| ReportError::Csv(e.into_error().into()))?;
        Ok(String::from_utf8(data)?)
    }

    /// Write the JSON report and the shortlist CSV under `output_dir`.
    pub fn write_artifacts(&self, output_dir: &Path) -> Result<ArtifactPaths, ReportError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| ReportError::Io { path, source }
        };

        std::fs::create_dir_all(output_dir).map_err(io_err(output_dir))?;

        let report = output_dir.join(self.report_file_name());
        std::fs::write(&report, self.to_json()?).map_err(io_err(&report))?;

        let shortlist = output_dir.join("shortlist.csv");
        std::fs::write(&shortlist, self.shortlist_csv()?).map_err(io_err(&shortlist))?;

        Ok(ArtifactPaths { report, shortlist })
    }

    /// Plain-text console summary.
    pub fn summary_text(&self) -> String {
        let mut out = String::new();
        let as_of = self
            .as_of
            .map_or_else(|| "n/a".to_string(), |d| d.to_string());
        let _ = writeln!(
            out,
            "Scan {} (as of {as_of}, source: {})",
            &self.run_id.0[..self.run_id.0.len().min(12)],
            self.source
        );
        let _ = writeln!(
            out,
            "Universe: {}  analyzed: {}  candidates: {}  rejected: {}",
            self.universe_size,
            self.analyzed,
            self.candidates.len(),
            self.rejected()
        );
        for (kind, count) in &self.rejection_counts {
            let _ = writeln!(out, "  {kind:?}: {count}");
        }

        if self.status == RunStatus::NoSignals {
            let _ = writeln!(out, "No signals today.");
            return out;
        }

        let summary = &self.shortlist.summary;
        let _ = writeln!(
            out,
            "Top {} of {} (avg score {:.2}, very strong {}, avg R/R {:.2})",
            summary.count,
            self.shortlist.considered,
            summary.mean_score.unwrap_or(f64::NAN),
            summary.very_strong,
            summary.mean_rr_ratio_2.unwrap_or(f64::NAN),
        );
        for (i, c) in self.shortlist.entries.iter().enumerate() {
            let lv = &c.levels;
            let sector = self
                .sectors
                .get(&c.symbol)
                .map_or_else(String::new, |s| format!(" ({s})"));
            let _ = writeln!(
                out,
                "{}. {} {}{} {:.2} {}  {}  entry {:.2}-{:.2}  stop {:.2}  targets {:.2}/{:.2}/{:.2}  R/R {:.2}",
                i + 1,
                c.strength.glyph(),
                c.symbol,
                sector,
                c.score,
                c.strength.label(),
                c.signal.label(),
                lv.entry_optimal,
                lv.entry_max,
                lv.stop_loss,
                lv.target_1,
                lv.target_2,
                lv.target_3,
                lv.rr_ratio_2,
            );
        }
        out
    }
}
