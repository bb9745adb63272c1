//! Bullish signal detectors and the composite score aggregator.
//!
//! Every detector reads a [`PriceSeries`] and returns a [`DetectorOutput`]
//! whose `signal_dates` are the only thing the aggregator consumes.

pub mod indicators;
pub mod patterns;
pub mod rolling;
pub mod scoring;

pub use scoring::{calculate_score, ScoreAggregator, ScoreParams};

use crate::error::Result;
use crate::types::{DetectorOutput, Indicator, PriceSeries, SignalSet};

/// Trait for implementing a bullish detector.
pub trait Detector: Send + Sync {
    /// Which of the nine indicators this detector produces.
    fn indicator(&self) -> Indicator;

    /// Unique identifier for this detector.
    fn id(&self) -> &'static str {
        self.indicator().id()
    }

    /// Rows of history needed before the detector can fire at all.
    fn min_periods(&self) -> usize;

    /// Run the detector. Short series yield empty signal sets, not errors;
    /// errors are reserved for missing prerequisite columns.
    fn detect(&self, series: &PriceSeries, symbol: &str) -> Result<DetectorOutput>;
}

/// Tunable detector parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorParams {
    /// Multiplier over the rolling mean volume for a spike.
    pub volume_threshold: f64,
    /// RSI level below which a day counts as oversold.
    pub rsi_threshold: f64,
    /// Minimum spacing between extrema for the pattern detectors.
    pub pattern_window: usize,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            volume_threshold: 2.0,
            rsi_threshold: 30.0,
            pattern_window: 50,
        }
    }
}

/// Collect the dates at the given row indices.
pub fn dates_at(series: &PriceSeries, indices: impl IntoIterator<Item = usize>) -> SignalSet {
    SignalSet::from_dates(indices.into_iter().map(|i| series.date(i)).collect())
}

/// Get all nine detectors configured with `params`.
pub fn all_detectors(params: &DetectorParams) -> Vec<Box<dyn Detector>> {
    use indicators::*;
    use patterns::*;

    vec![
        Box::new(MovingAverageCrossover),
        Box::new(RsiOversold::new(params.rsi_threshold)),
        Box::new(VolumeSpikes::new(params.volume_threshold)),
        Box::new(Breakouts::default()),
        Box::new(BollingerBands::default()),
        Box::new(ExponentialMovingAverage::default()),
        Box::new(CupAndHandle::new(params.pattern_window)),
        Box::new(AscendingTriangle::new(params.pattern_window)),
        Box::new(InverseHeadAndShoulders::new(params.pattern_window)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_detectors_cover_every_indicator() {
        let detectors = all_detectors(&DetectorParams::default());
        let ids: Vec<Indicator> = detectors.iter().map(|d| d.indicator()).collect();
        assert_eq!(ids, Indicator::ALL.to_vec());
    }
}
