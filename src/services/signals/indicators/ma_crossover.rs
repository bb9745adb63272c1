//! Golden cross of the 50-day over the 200-day moving average.

use crate::error::Result;
use crate::services::signals::rolling::upward_crosses;
use crate::services::signals::{dates_at, Detector};
use crate::types::{
    long_ma_column, short_ma_column, DetectorOutput, Indicator, PriceSeries, SignalSet,
};

/// Fires on each row where the short average moves strictly above the long
/// average after not being above it the row before.
///
/// Reads the precomputed `{symbol}_50_day_ma` and `{symbol}_200_day_ma` columns.
pub struct MovingAverageCrossover;

impl Detector for MovingAverageCrossover {
    fn indicator(&self) -> Indicator {
        Indicator::MovingAverageCrossover
    }

    fn min_periods(&self) -> usize {
        201
    }

    fn detect(&self, series: &PriceSeries, symbol: &str) -> Result<DetectorOutput> {
        let short = series.require_column(symbol, &short_ma_column(symbol))?;
        let long = series.require_column(symbol, &long_ma_column(symbol))?;

        let signals = dates_at(series, upward_crosses(short, long));
        Ok(DetectorOutput::new(self.indicator(), signals))
    }
}

/// Dates of upward short-over-long moving-average crosses.
pub fn moving_average_crossover(series: &PriceSeries, symbol: &str) -> Result<SignalSet> {
    Ok(MovingAverageCrossover.detect(series, symbol)?.signal_dates)
}
