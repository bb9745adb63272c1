//! Bollinger Bands rebound detector.

use crate::error::Result;
use crate::services::signals::rolling::{defined, rolling_mean, rolling_std, upward_crosses};
use crate::services::signals::{dates_at, Detector};
use crate::types::{Column, DetectorOutput, Indicator, PriceSeries};

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(window)
/// - Upper band: SMA + num_std * sample StdDev
/// - Lower band: SMA - num_std * sample StdDev
///
/// Fires when the close crosses back above the lower band. The three bands
/// are returned as `upper_band`, `middle_band` and `lower_band`.
pub struct BollingerBands {
    window: usize,
    num_std: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            window: 20,
            num_std: 2.0,
        }
    }
}

impl BollingerBands {
    pub fn new(window: usize, num_std: f64) -> Self {
        Self { window, num_std }
    }

    fn band(middle: &[Option<f64>], std: &[Option<f64>], offset: f64) -> Column {
        middle
            .iter()
            .zip(std)
            .map(|(m, s)| Some((*m)? + offset * (*s)?))
            .collect()
    }

    /// Run the detector directly. Reads only the bars, so it cannot fail.
    pub fn scan(&self, series: &PriceSeries) -> DetectorOutput {
        let closes = series.closes();
        let middle = rolling_mean(&closes, self.window, self.window);
        let std = rolling_std(&closes, self.window);
        let upper = Self::band(&middle, &std, self.num_std);
        let lower = Self::band(&middle, &std, -self.num_std);

        let signals = dates_at(series, upward_crosses(&defined(&closes), &lower));

        DetectorOutput::new(self.indicator(), signals)
            .with_series("upper_band", upper)
            .with_series("middle_band", middle)
            .with_series("lower_band", lower)
    }
}

impl Detector for BollingerBands {
    fn indicator(&self) -> Indicator {
        Indicator::BollingerBands
    }

    fn min_periods(&self) -> usize {
        self.window + 1
    }

    fn detect(&self, series: &PriceSeries, _symbol: &str) -> Result<DetectorOutput> {
        Ok(self.scan(series))
    }
}

/// Lower-band rebound dates plus the band series.
pub fn bollinger_bands(series: &PriceSeries, window: usize, num_std: f64) -> DetectorOutput {
    BollingerBands::new(window, num_std).scan(series)
}
