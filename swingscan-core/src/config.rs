//! Typed scan configuration.
//!
//! One `ScanConfig` is built once (TOML file plus serde defaults for every
//! missing key), validated, and then passed by reference to every stage.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ConfigFingerprint;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to fingerprint config: {0}")]
    Fingerprint(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full configuration of one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Calendar days of history kept before the latest bar of each series.
    pub lookback_days: u32,
    /// Maximum shortlist length.
    pub top_n: usize,
    pub signal_thresholds: SignalThresholds,
    pub scoring: ScoringConfig,
    pub indicators: IndicatorParams,
    pub targets: TargetConfig,
    pub selection: SelectionConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            lookback_days: 90,
            top_n: 3,
            signal_thresholds: SignalThresholds::default(),
            scoring: ScoringConfig::default(),
            indicators: IndicatorParams::default(),
            targets: TargetConfig::default(),
            selection: SelectionConfig::default(),
        }
    }
}

/// Pre-score elimination gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    pub rsi_max: f64,
    pub adx_min: f64,
    pub max_volatility_atr_pct: f64,
    pub volume_ratio_min: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            rsi_max: 40.0,
            adx_min: 25.0,
            max_volatility_atr_pct: 1.5,
            volume_ratio_min: 1.3,
        }
    }
}

/// Sub-score weights, strength thresholds and the post-score floor.
///
/// Weights are applied as given; they are not renormalized to sum to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub rsi_weight: f64,
    pub stochastic_weight: f64,
    pub ema_weight: f64,
    pub macd_weight: f64,
    pub volume_weight: f64,
    pub volatility_weight: f64,
    pub adx_weight: f64,
    pub green_threshold: f64,
    pub yellow_threshold: f64,
    pub min_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rsi_weight: 0.20,
            stochastic_weight: 0.15,
            ema_weight: 0.15,
            macd_weight: 0.15,
            volume_weight: 0.15,
            volatility_weight: 0.10,
            adx_weight: 0.10,
            green_threshold: 8.5,
            yellow_threshold: 8.0,
            min_score: 8.0,
        }
    }
}

impl ScoringConfig {
    fn weights(&self) -> [(&'static str, f64); 7] {
        [
            ("rsi_weight", self.rsi_weight),
            ("stochastic_weight", self.stochastic_weight),
            ("ema_weight", self.ema_weight),
            ("macd_weight", self.macd_weight),
            ("volume_weight", self.volume_weight),
            ("volatility_weight", self.volatility_weight),
            ("adx_weight", self.adx_weight),
        ]
    }
}

/// Indicator periods and windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub ema_short: usize,
    pub ema_long: usize,
    pub ema_trend: usize,
    pub rsi_period: usize,
    /// `[k, d, smooth]`
    pub stochastic: [usize; 3],
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub atr_period: usize,
    pub adx_period: usize,
    pub keltner_period: usize,
    pub keltner_multiplier: f64,
    pub supertrend_period: usize,
    pub supertrend_multiplier: f64,
    /// Minimum series length before any snapshot is produced.
    pub min_bars: usize,
    pub vwap_window: usize,
    pub volume_window: usize,
    pub momentum_period: usize,
    pub volatility_window: usize,
    pub support_resistance_window: usize,
    pub trend_window: usize,
    /// Absolute per-bar close change separating a trend from sideways drift.
    pub trend_slope_threshold: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ema_short: 5,
            ema_long: 20,
            ema_trend: 50,
            rsi_period: 9,
            stochastic: [9, 3, 3],
            macd_fast: 5,
            macd_slow: 13,
            macd_signal: 5,
            atr_period: 7,
            adx_period: 14,
            keltner_period: 10,
            keltner_multiplier: 2.0,
            supertrend_period: 7,
            supertrend_multiplier: 1.5,
            min_bars: 60,
            vwap_window: 20,
            volume_window: 20,
            momentum_period: 5,
            volatility_window: 10,
            support_resistance_window: 20,
            trend_window: 20,
            trend_slope_threshold: 0.5,
        }
    }
}

impl IndicatorParams {
    pub fn stoch_k(&self) -> usize {
        self.stochastic[0]
    }

    pub fn stoch_d(&self) -> usize {
        self.stochastic[1]
    }

    pub fn stoch_smooth(&self) -> usize {
        self.stochastic[2]
    }

    /// The first period or window below its minimum, as `(name, value, min)`.
    pub fn undersized_period(&self) -> Option<(&'static str, usize, usize)> {
        self.periods()
            .into_iter()
            .map(|(name, period)| (name, period, 1))
            .chain(std::iter::once(("volatility_window", self.volatility_window, 2)))
            .find(|&(_, value, min)| value < min)
    }

    fn periods(&self) -> [(&'static str, usize); 19] {
        [
            ("ema_short", self.ema_short),
            ("ema_long", self.ema_long),
            ("ema_trend", self.ema_trend),
            ("rsi_period", self.rsi_period),
            ("stochastic.k", self.stoch_k()),
            ("stochastic.d", self.stoch_d()),
            ("stochastic.smooth", self.stoch_smooth()),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("atr_period", self.atr_period),
            ("adx_period", self.adx_period),
            ("keltner_period", self.keltner_period),
            ("supertrend_period", self.supertrend_period),
            ("vwap_window", self.vwap_window),
            ("volume_window", self.volume_window),
            ("momentum_period", self.momentum_period),
            ("support_resistance_window", self.support_resistance_window),
            ("trend_window", self.trend_window),
        ]
    }
}

/// Stop and target distances, in percent of the close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub stop_loss_pct: f64,
    pub profit_target_conservative: f64,
    pub profit_target_pct: f64,
    pub profit_target_aggressive: f64,
    pub min_risk_reward_ratio: f64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            stop_loss_pct: 1.0,
            profit_target_conservative: 5.0,
            profit_target_pct: 7.0,
            profit_target_aggressive: 10.0,
            min_risk_reward_ratio: 5.0,
        }
    }
}

/// Final cross-instrument gates applied by the selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub min_score: f64,
    pub max_atr_pct: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_score: 8.0,
            max_atr_pct: 2.0,
        }
    }
}

impl ScanConfig {
    /// Load from a TOML file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject configurations no scan could run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.top_n == 0 {
            return invalid("top_n must be at least 1".into());
        }
        if self.lookback_days == 0 {
            return invalid("lookback_days must be at least 1".into());
        }

        let ind = &self.indicators;
        if let Some((name, value, min)) = ind.undersized_period() {
            return invalid(format!("indicators.{name} must be at least {min}, got {value}"));
        }
        if ind.macd_fast >= ind.macd_slow {
            return invalid(format!(
                "indicators.macd_fast ({}) must be below macd_slow ({})",
                ind.macd_fast, ind.macd_slow
            ));
        }
        for (name, value) in [
            ("keltner_multiplier", ind.keltner_multiplier),
            ("supertrend_multiplier", ind.supertrend_multiplier),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return invalid(format!("indicators.{name} must be positive, got {value}"));
            }
        }
        if !(ind.trend_slope_threshold >= 0.0) {
            return invalid("indicators.trend_slope_threshold must be non-negative".into());
        }

        for (name, weight) in self.scoring.weights() {
            if !(weight >= 0.0 && weight.is_finite()) {
                return invalid(format!("scoring.{name} must be non-negative, got {weight}"));
            }
        }
        if self.scoring.yellow_threshold > self.scoring.green_threshold {
            return invalid(format!(
                "scoring.yellow_threshold ({}) must not exceed green_threshold ({})",
                self.scoring.yellow_threshold, self.scoring.green_threshold
            ));
        }

        let t = &self.targets;
        for (name, pct) in [
            ("stop_loss_pct", t.stop_loss_pct),
            ("profit_target_conservative", t.profit_target_conservative),
            ("profit_target_pct", t.profit_target_pct),
            ("profit_target_aggressive", t.profit_target_aggressive),
            ("min_risk_reward_ratio", t.min_risk_reward_ratio),
        ] {
            if !(pct >= 0.0 && pct.is_finite()) {
                return invalid(format!("targets.{name} must be non-negative, got {pct}"));
            }
        }
        if t.stop_loss_pct >= 100.0 {
            return invalid("targets.stop_loss_pct must be below 100".into());
        }

        Ok(())
    }

    /// BLAKE3 hash of the canonical JSON form of this configuration.
    pub fn fingerprint(&self) -> Result<ConfigFingerprint, ConfigError> {
        let json = serde_json::to_vec(self)?;
        Ok(ConfigFingerprint::from_bytes(&json))
    }
}
