//! Exponential Moving Average (EMA) cross detector.

use crate::error::Result;
use crate::services::signals::rolling::{defined, ewm_mean, upward_crosses};
use crate::services::signals::{dates_at, Detector};
use crate::types::{DetectorOutput, Indicator, PriceSeries, SignalSet};

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices. The average is defined
/// from the first row. Fires when the close crosses above the EMA.
pub struct ExponentialMovingAverage {
    span: usize,
}

impl Default for ExponentialMovingAverage {
    fn default() -> Self {
        Self { span: 20 }
    }
}

impl ExponentialMovingAverage {
    pub fn new(span: usize) -> Self {
        Self { span }
    }

    pub fn scan(&self, series: &PriceSeries) -> DetectorOutput {
        let closes = series.closes();
        let ema = ewm_mean(&closes, self.span);

        let signals = dates_at(series, upward_crosses(&defined(&closes), &ema));
        DetectorOutput::new(self.indicator(), signals).with_series("ema", ema)
    }
}

impl Detector for ExponentialMovingAverage {
    fn indicator(&self) -> Indicator {
        Indicator::ExponentialMovingAverage
    }

    fn min_periods(&self) -> usize {
        2
    }

    fn detect(&self, series: &PriceSeries, _symbol: &str) -> Result<DetectorOutput> {
        Ok(self.scan(series))
    }
}

/// Dates where the close crosses above its EMA.
pub fn exponential_moving_average(series: &PriceSeries, span: usize) -> SignalSet {
    ExponentialMovingAverage::new(span).scan(series).signal_dates
}
