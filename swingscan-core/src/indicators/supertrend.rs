//! SuperTrend: ATR-based directional overlay.
//!
//! Inherently sequential/stateful: the line and direction at bar t depend on the
//! state at t-1, so the series is produced by a strict left-to-right fold.
//!
//! Basic bands: hl2 ± multiplier * ATR(period).
//! Starting on the bar after the first valid ATR (index period):
//! - close[t] > upper[t-1] → line = lower[t], direction = Up
//! - close[t] < lower[t-1] → line = upper[t], direction = Down
//! - otherwise the previous line and direction persist unchanged.
//!
//! There is no seed: the line is NaN and the direction undefined until the
//! first band cross.
//!
//! Output (Indicator): the line value. `states()` also exposes the direction.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::indicators::atr::atr_series;
use crate::indicators::Indicator;

/// Direction of the SuperTrend; serialized as `1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_i8(self) -> i8 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        direction.as_i8()
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::Up),
            -1 => Ok(Direction::Down),
            other => Err(format!("supertrend direction must be 1 or -1, got {other}")),
        }
    }
}

/// SuperTrend state at one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupertrendState {
    pub line: f64,
    pub direction: Direction,
}

impl SupertrendState {
    /// The state set by a band cross on this bar, if any. `prev_upper`/`prev_lower`
    /// are the bands of the previous bar; `upper`/`lower` those of the current bar.
    pub fn cross(close: f64, prev_upper: f64, prev_lower: f64, upper: f64, lower: f64) -> Option<Self> {
        if close > prev_upper {
            Some(Self {
                line: lower,
                direction: Direction::Up,
            })
        } else if close < prev_lower {
            Some(Self {
                line: upper,
                direction: Direction::Down,
            })
        } else {
            None
        }
    }

    /// Advance one bar: a cross replaces the state, otherwise it persists.
    pub fn step(self, close: f64, prev_upper: f64, prev_lower: f64, upper: f64, lower: f64) -> Self {
        Self::cross(close, prev_upper, prev_lower, upper, lower).unwrap_or(self)
    }
}

#[derive(Debug, Clone)]
pub struct Supertrend {
    period: usize,
    multiplier: f64,
    name: String,
}

impl Supertrend {
    pub fn new(period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Supertrend period must be >= 1");
        Self {
            period,
            multiplier,
            name: format!("supertrend_{period}_{multiplier}"),
        }
    }

    /// Basic (upper, lower) bands per bar.
    pub fn bands(&self, bars: &[Bar]) -> (Vec<f64>, Vec<f64>) {
        let atr = atr_series(bars, self.period);
        bars.iter()
            .zip(&atr)
            .map(|(bar, a)| {
                let hl2 = bar.hl2();
                (hl2 + self.multiplier * a, hl2 - self.multiplier * a)
            })
            .unzip()
    }

    /// The state sequence. `None` until the first band cross, and from any bar
    /// whose bands are undefined onward.
    pub fn states(&self, bars: &[Bar]) -> Vec<Option<SupertrendState>> {
        let n = bars.len();
        let mut result = vec![None; n];
        let (upper, lower) = self.bands(bars);

        let Some(start) = lower
            .iter()
            .zip(&upper)
            .position(|(l, u)| !l.is_nan() && !u.is_nan())
        else {
            return result;
        };

        let mut state: Option<SupertrendState> = None;
        for i in (start + 1)..n {
            if upper[i].is_nan() || lower[i].is_nan() || bars[i].close.is_nan() {
                break;
            }
            let crossed =
                SupertrendState::cross(bars[i].close, upper[i - 1], lower[i - 1], upper[i], lower[i]);
            state = crossed.or(state);
            result[i] = state;
        }

        result
    }
}

impl Indicator for Supertrend {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        self.states(bars)
            .into_iter()
            .map(|s| s.map_or(f64::NAN, |s| s.line))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlcv_bars, DEFAULT_EPSILON};

    /// Ten quiet bars (range 99-101, close 100), then scripted moves.
    ///
    /// With period 7 and multiplier 1.5 the quiet bands are 103 / 97.
    /// - bar 10 closes at 96 < lower[9] = 97 → flips Down
    /// - bar 11 closes at 98, inside the bands → stays Down, line unchanged
    /// - bar 12 closes at 103 > upper[11] ≈ 101.857 → flips Up
    fn scripted() -> Vec<Bar> {
        let mut data = vec![(100.0, 101.0, 99.0, 100.0, 1000); 10];
        data.push((100.0, 100.0, 95.0, 96.0, 1000));
        data.push((96.0, 99.0, 97.0, 98.0, 1000));
        data.push((98.0, 103.5, 102.0, 103.0, 1000));
        make_ohlcv_bars(&data)
    }

    #[test]
    fn undefined_until_first_cross() {
        let st = Supertrend::new(7, 1.5);
        let bars = scripted();
        let states = st.states(&bars);
        assert!(states[..10].iter().all(Option::is_none));
        assert!(st.compute(&bars)[..10].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn flips_on_the_exact_crossing_bar() {
        let states = Supertrend::new(7, 1.5).states(&scripted());

        // bar 10: ATR = (6*2 + 5)/7, hl2 = 97.5 → upper = 97.5 + 1.5*17/7
        let down = states[10].unwrap();
        assert_eq!(down.direction, Direction::Down);
        assert_approx(down.line, 97.5 + 1.5 * 17.0 / 7.0, DEFAULT_EPSILON);

        let inside = states[11].unwrap();
        assert_eq!(inside.direction, Direction::Down);
        assert_approx(inside.line, down.line, DEFAULT_EPSILON);

        let up = states[12].unwrap();
        assert_eq!(up.direction, Direction::Up);
        // bar 12: TR window [2, 2, 2, 2, 5, 3, 5.5]
        let atr12 = (2.0 * 4.0 + 5.0 + 3.0 + 5.5) / 7.0;
        assert_approx(up.line, 102.75 - 1.5 * atr12, DEFAULT_EPSILON);
    }

    #[test]
    fn direction_stays_defined_after_first_cross() {
        // Four flat regimes of ten bars: 100, 110, 95, 105.
        let data: Vec<(f64, f64, f64, f64, u64)> = [100.0, 110.0, 95.0, 105.0]
            .iter()
            .flat_map(|&c| std::iter::repeat((c, c + 1.0, c - 1.0, c, 1000)).take(10))
            .collect();
        let states = Supertrend::new(7, 1.5).states(&make_ohlcv_bars(&data));

        assert!(states[..10].iter().all(Option::is_none));
        assert!(states[10..].iter().all(Option::is_some));
        assert_eq!(states[10].unwrap().direction, Direction::Up);
        assert_eq!(states[19].unwrap().direction, Direction::Up);
        assert_eq!(states[20].unwrap().direction, Direction::Down);
        assert_eq!(states[30].unwrap().direction, Direction::Up);
    }

    #[test]
    fn flat_series_never_crosses() {
        let bars = make_ohlcv_bars(&vec![(100.0, 101.0, 99.0, 100.0, 1000); 40]);
        let values = Supertrend::new(7, 1.5).compute(&bars);
        assert!(values.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn step_persists_inside_bands() {
        let state = SupertrendState {
            line: 95.0,
            direction: Direction::Down,
        };
        let next = state.step(100.0, 105.0, 95.0, 104.0, 96.0);
        assert_eq!(next, state);
        assert!(SupertrendState::cross(100.0, 105.0, 95.0, 104.0, 96.0).is_none());
    }

    #[test]
    fn direction_serializes_as_signed_integer() {
        assert_eq!(serde_json::to_string(&Direction::Down).unwrap(), "-1");
        let parsed: Direction = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, Direction::Up);
        assert!(serde_json::from_str::<Direction>("0").is_err());
    }

    #[test]
    fn too_few_bars() {
        let bars = make_ohlcv_bars(&[(100.0, 105.0, 95.0, 102.0, 1000)]);
        let result = Supertrend::new(3, 2.0).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
