//! Volume ratio: today's volume over its trailing mean.
//!
//! ratio[t] = volume[t] / mean(volume[t-window+1..=t]). The mean includes the
//! current bar. A zero mean is undefined.

use crate::domain::Bar;
use crate::indicators::rolling::{rolling_mean, safe_div};
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct VolumeRatio {
    window: usize,
    name: String,
}

impl VolumeRatio {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "VolumeRatio window must be >= 1");
        Self {
            window,
            name: format!("volume_ratio_{window}"),
        }
    }

    /// The trailing volume mean the ratio is taken against.
    pub fn average(&self, bars: &[Bar]) -> Vec<f64> {
        let volume: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
        rolling_mean(&volume, self.window)
    }
}

impl Indicator for VolumeRatio {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        bars.iter()
            .zip(self.average(bars))
            .map(|(b, avg)| safe_div(b.volume as f64, avg))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlcv_bars, DEFAULT_EPSILON};

    #[test]
    fn spike_against_flat_baseline() {
        let mut data = vec![(10.0, 11.0, 9.0, 10.0, 1000); 4];
        data.push((10.0, 11.0, 9.0, 10.0, 6000));
        let result = VolumeRatio::new(5).compute(&make_ohlcv_bars(&data));
        assert!(result[3].is_nan());
        // 6000 / mean(1000, 1000, 1000, 1000, 6000)
        assert_approx(result[4], 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn no_volume_is_undefined() {
        let bars = make_ohlcv_bars(&[(10.0, 11.0, 9.0, 10.0, 0); 5]);
        assert!(VolumeRatio::new(5).compute(&bars)[4].is_nan());
    }
}
