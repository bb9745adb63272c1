//! RSI oversold detector.

use crate::error::Result;
use crate::services::signals::{dates_at, Detector};
use crate::types::{rsi_column, DetectorOutput, Indicator, PriceSeries, SignalSet};

/// Fires on every day the precomputed RSI sits below the threshold.
///
/// This is a level condition, not a cross: consecutive oversold days all fire.
/// Lower thresholds (20-25) cut false signals; higher ones (35-40) catch more.
pub struct RsiOversold {
    threshold: f64,
}

impl Default for RsiOversold {
    fn default() -> Self {
        Self { threshold: 30.0 }
    }
}

impl RsiOversold {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Detector for RsiOversold {
    fn indicator(&self) -> Indicator {
        Indicator::RsiOversold
    }

    fn min_periods(&self) -> usize {
        15
    }

    fn detect(&self, series: &PriceSeries, symbol: &str) -> Result<DetectorOutput> {
        let rsi = series.require_column(symbol, &rsi_column(symbol))?;

        let hits = rsi
            .iter()
            .enumerate()
            .filter(|(_, v)| matches!(v, Some(r) if *r < self.threshold))
            .map(|(i, _)| i);

        Ok(DetectorOutput::new(self.indicator(), dates_at(series, hits)))
    }
}

/// Dates where RSI is below `threshold`.
pub fn rsi_oversold(series: &PriceSeries, symbol: &str, threshold: f64) -> Result<SignalSet> {
    Ok(RsiOversold::new(threshold).detect(series, symbol)?.signal_dates)
}
