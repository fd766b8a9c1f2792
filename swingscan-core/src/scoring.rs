//! Scoring engine: elimination gates, sub-score ladders, composite score,
//! strength label and signal classification.
//!
//! Every ladder is evaluated most-extreme band first and the first match wins.
//! NaN inputs fall through to the lowest band, but the gates refuse snapshots
//! with undefined required fields before scoring is reached.

use serde::{Deserialize, Serialize};

use crate::config::{ScoringConfig, SignalThresholds};
use crate::error::Rejection;
use crate::numeric::round_to;
use crate::snapshot::Snapshot;

/// Check the pre-score gates, naming the first one that fails.
pub fn check_eligibility(snapshot: &Snapshot, thresholds: &SignalThresholds) -> Result<(), Rejection> {
    if let Some((field, _)) = snapshot
        .required_fields()
        .into_iter()
        .find(|(_, value)| !value.is_finite())
    {
        return Err(Rejection::UndefinedIndicator { field });
    }

    if snapshot.rsi > thresholds.rsi_max {
        return Err(Rejection::RsiAboveCeiling {
            rsi: snapshot.rsi,
            max: thresholds.rsi_max,
        });
    }
    if snapshot.adx < thresholds.adx_min {
        return Err(Rejection::AdxBelowMinimum {
            adx: snapshot.adx,
            min: thresholds.adx_min,
        });
    }
    if snapshot.atr_pct > thresholds.max_volatility_atr_pct {
        return Err(Rejection::VolatilityAboveMaximum {
            atr_pct: snapshot.atr_pct,
            max: thresholds.max_volatility_atr_pct,
        });
    }
    if snapshot.volume_ratio < thresholds.volume_ratio_min {
        return Err(Rejection::VolumeRatioBelowMinimum {
            volume_ratio: snapshot.volume_ratio,
            min: thresholds.volume_ratio_min,
        });
    }

    Ok(())
}

/// `true` iff the snapshot passes every gate.
pub fn eligible(snapshot: &Snapshot, thresholds: &SignalThresholds) -> bool {
    check_eligibility(snapshot, thresholds).is_ok()
}

pub fn rsi_score(rsi: f64) -> u8 {
    if rsi < 20.0 {
        10
    } else if rsi < 25.0 {
        9
    } else if rsi < 30.0 {
        8
    } else if rsi < 35.0 {
        6
    } else if rsi < 45.0 {
        4
    } else {
        2
    }
}

/// Oversold %K, with a bonus when %K is above %D.
pub fn stochastic_score(k: f64, d: f64) -> u8 {
    let cross = k > d;
    if k < 15.0 && cross {
        10
    } else if k < 20.0 && cross {
        9
    } else if k < 20.0 {
        7
    } else if k < 30.0 {
        5
    } else {
        3
    }
}

pub fn ema_score(short: f64, long: f64, trend: f64) -> u8 {
    if short > long && long > trend {
        10
    } else if short > long {
        8
    } else if short > trend {
        6
    } else {
        3
    }
}

pub fn macd_score(line: f64, signal: f64, histogram: f64, prev_histogram: f64) -> u8 {
    let above = line > signal;
    if above && histogram > 0.0 && histogram > prev_histogram {
        10
    } else if above && histogram > 0.0 {
        8
    } else if above {
        6
    } else if histogram > 0.0 {
        4
    } else {
        2
    }
}

pub fn volume_score(volume_ratio: f64) -> u8 {
    if volume_ratio > 2.5 {
        10
    } else if volume_ratio > 2.0 {
        9
    } else if volume_ratio > 1.8 {
        8
    } else if volume_ratio > 1.5 {
        6
    } else if volume_ratio > 1.2 {
        4
    } else {
        2
    }
}

/// Lower ATR% scores higher.
pub fn volatility_score(atr_pct: f64) -> u8 {
    if atr_pct < 0.8 {
        10
    } else if atr_pct < 1.2 {
        9
    } else if atr_pct < 1.5 {
        7
    } else if atr_pct < 2.0 {
        5
    } else {
        2
    }
}

pub fn adx_score(adx: f64) -> u8 {
    if adx > 40.0 {
        10
    } else if adx > 30.0 {
        9
    } else if adx > 25.0 {
        7
    } else if adx > 20.0 {
        5
    } else {
        2
    }
}

/// The seven sub-scores of one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub rsi: u8,
    pub stochastic: u8,
    pub ema: u8,
    pub macd: u8,
    pub volume: u8,
    pub volatility: u8,
    pub adx: u8,
}

impl ScoreBreakdown {
    pub fn from_snapshot(s: &Snapshot) -> Self {
        Self {
            rsi: rsi_score(s.rsi),
            stochastic: stochastic_score(s.stoch_k, s.stoch_d),
            ema: ema_score(s.ema_short, s.ema_long, s.ema_trend),
            macd: macd_score(s.macd, s.macd_signal, s.macd_histogram, s.prev_macd_hist),
            volume: volume_score(s.volume_ratio),
            volatility: volatility_score(s.atr_pct),
            adx: adx_score(s.adx),
        }
    }

    /// Weighted sum, rounded to 2 decimals.
    pub fn weighted_total(&self, weights: &ScoringConfig) -> f64 {
        let total = f64::from(self.rsi) * weights.rsi_weight
            + f64::from(self.stochastic) * weights.stochastic_weight
            + f64::from(self.ema) * weights.ema_weight
            + f64::from(self.macd) * weights.macd_weight
            + f64::from(self.volume) * weights.volume_weight
            + f64::from(self.volatility) * weights.volatility_weight
            + f64::from(self.adx) * weights.adx_weight;
        round_to(total, 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    VeryStrong,
    Strong,
    Weak,
}

impl Strength {
    pub fn classify(score: f64, scoring: &ScoringConfig) -> Self {
        if score >= scoring.green_threshold {
            Strength::VeryStrong
        } else if score >= scoring.yellow_threshold {
            Strength::Strong
        } else {
            Strength::Weak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strength::VeryStrong => "very strong",
            Strength::Strong => "strong",
            Strength::Weak => "weak",
        }
    }

    /// Status glyph for reports.
    pub fn glyph(self) -> &'static str {
        match self {
            Strength::VeryStrong => "🟢",
            Strength::Strong => "🟡",
            Strength::Weak => "🔴",
        }
    }
}

/// Human-readable setup classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalTag {
    PremiumBounce,
    ConfirmedBounce,
    ControlledPullback,
    GenericEntry,
}

impl SignalTag {
    pub fn label(self) -> &'static str {
        match self {
            SignalTag::PremiumBounce => "premium bounce",
            SignalTag::ConfirmedBounce => "confirmed bounce",
            SignalTag::ControlledPullback => "controlled pullback",
            SignalTag::GenericEntry => "generic entry opportunity",
        }
    }
}

impl std::fmt::Display for SignalTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Priority-ordered classification of the setup.
pub fn classify_signal(s: &Snapshot) -> SignalTag {
    if s.rsi < 25.0 && s.close <= s.keltner_lower * 1.01 {
        SignalTag::PremiumBounce
    } else if s.rsi < 30.0 && s.ema_short > s.ema_long {
        SignalTag::ConfirmedBounce
    } else if (30.0..=35.0).contains(&s.rsi) {
        SignalTag::ControlledPullback
    } else {
        SignalTag::GenericEntry
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub breakdown: ScoreBreakdown,
    pub score: f64,
    pub strength: Strength,
    pub signal: SignalTag,
}

/// Score one snapshot. Does not apply the gates or the post-score floor.
pub fn score(snapshot: &Snapshot, scoring: &ScoringConfig) -> ScoreResult {
    let breakdown = ScoreBreakdown::from_snapshot(snapshot);
    let total = breakdown.weighted_total(scoring);
    ScoreResult {
        breakdown,
        score: total,
        strength: Strength::classify(total, scoring),
        signal: classify_signal(snapshot),
    }
}
