//! Why a series could not be analyzed, and why an instrument was eliminated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::BarError;

/// Failure to turn a bar series into a snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("insufficient history: {available} bars, need at least {required}")]
    InsufficientHistory { available: usize, required: usize },

    #[error("malformed input at bar {index}: {reason}")]
    MalformedInput { index: usize, reason: String },

    #[error("indicator parameter '{name}' is {value}, must be at least {min}")]
    InvalidParameter {
        name: &'static str,
        value: usize,
        min: usize,
    },
}

impl From<BarError> for AnalysisError {
    fn from(err: BarError) -> Self {
        AnalysisError::MalformedInput {
            index: err.index(),
            reason: err.to_string(),
        }
    }
}

/// Why an instrument did not become a candidate.
///
/// Rejections are expected outcomes of a scan, not faults: the runner counts
/// them by [`RejectionKind`] and moves on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("insufficient history: {available} bars, need at least {required}")]
    InsufficientHistory { available: usize, required: usize },

    #[error("malformed input at bar {index}: {reason}")]
    MalformedInput { index: usize, reason: String },

    #[error("indicator '{field}' is undefined on the latest bar")]
    UndefinedIndicator { field: &'static str },

    #[error("RSI {rsi:.2} above ceiling {max}")]
    RsiAboveCeiling { rsi: f64, max: f64 },

    #[error("ADX {adx:.2} below minimum {min}")]
    AdxBelowMinimum { adx: f64, min: f64 },

    #[error("ATR% {atr_pct:.2} above maximum {max}")]
    VolatilityAboveMaximum { atr_pct: f64, max: f64 },

    #[error("volume ratio {volume_ratio:.2} below minimum {min}")]
    VolumeRatioBelowMinimum { volume_ratio: f64, min: f64 },

    #[error("score {score:.2} below floor {floor}")]
    ScoreBelowFloor { score: f64, floor: f64 },

    #[error("risk/reward {rr:.2} below minimum {min}")]
    RiskRewardBelowMinimum { rr: f64, min: f64 },

    #[error("no data: {reason}")]
    DataUnavailable { reason: String },

    #[error("indicator parameter '{name}' is {value}, must be at least {min}")]
    InvalidParameter {
        name: &'static str,
        value: usize,
        min: usize,
    },
}

/// Payload-free rejection category, used as an aggregate counting key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    InsufficientHistory,
    MalformedInput,
    UndefinedIndicator,
    RsiAboveCeiling,
    AdxBelowMinimum,
    VolatilityAboveMaximum,
    VolumeRatioBelowMinimum,
    ScoreBelowFloor,
    RiskRewardBelowMinimum,
    DataUnavailable,
    InvalidParameter,
}

impl Rejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::InsufficientHistory { .. } => RejectionKind::InsufficientHistory,
            Rejection::MalformedInput { .. } => RejectionKind::MalformedInput,
            Rejection::UndefinedIndicator { .. } => RejectionKind::UndefinedIndicator,
            Rejection::RsiAboveCeiling { .. } => RejectionKind::RsiAboveCeiling,
            Rejection::AdxBelowMinimum { .. } => RejectionKind::AdxBelowMinimum,
            Rejection::VolatilityAboveMaximum { .. } => RejectionKind::VolatilityAboveMaximum,
            Rejection::VolumeRatioBelowMinimum { .. } => RejectionKind::VolumeRatioBelowMinimum,
            Rejection::ScoreBelowFloor { .. } => RejectionKind::ScoreBelowFloor,
            Rejection::RiskRewardBelowMinimum { .. } => RejectionKind::RiskRewardBelowMinimum,
            Rejection::DataUnavailable { .. } => RejectionKind::DataUnavailable,
            Rejection::InvalidParameter { .. } => RejectionKind::InvalidParameter,
        }
    }

    /// True for rejections caused by bad or missing input rather than by a
    /// threshold; the runner logs these louder.
    pub fn is_data_problem(&self) -> bool {
        matches!(
            self.kind(),
            RejectionKind::MalformedInput | RejectionKind::DataUnavailable
        )
    }
}

impl From<AnalysisError> for Rejection {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InsufficientHistory {
                available,
                required,
            } => Rejection::InsufficientHistory {
                available,
                required,
            },
            AnalysisError::MalformedInput { index, reason } => {
                Rejection::MalformedInput { index, reason }
            }
            AnalysisError::InvalidParameter { name, value, min } => {
                Rejection::InvalidParameter { name, value, min }
            }
        }
    }
}
