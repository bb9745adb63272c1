//! Price breakout above the trailing high.

use crate::error::Result;
use crate::services::signals::rolling::{rolling_max, shift};
use crate::services::signals::{dates_at, Detector};
use crate::types::{DetectorOutput, Indicator, PriceSeries, SignalSet};

/// Fires when the close exceeds yesterday's trailing maximum high.
///
/// The trailing max is shifted one row so today's own high never counts.
/// It is returned as the `high_max` series; the input series is left untouched.
pub struct Breakouts {
    window: usize,
}

impl Default for Breakouts {
    fn default() -> Self {
        Self { window: 50 }
    }
}

impl Breakouts {
    /// Run the detector directly. Reads only the bars, so it cannot fail.
    pub fn scan(&self, series: &PriceSeries) -> DetectorOutput {
        let closes = series.closes();
        let high_max = rolling_max(&series.highs(), self.window, 1);
        let prior_max = shift(&high_max);

        let hits = (0..series.len())
            .filter(|&i| prior_max[i].is_some_and(|max| closes[i] > max));

        DetectorOutput::new(self.indicator(), dates_at(series, hits))
            .with_series("high_max", high_max)
    }
}

impl Detector for Breakouts {
    fn indicator(&self) -> Indicator {
        Indicator::Breakouts
    }

    fn min_periods(&self) -> usize {
        2
    }

    fn detect(&self, series: &PriceSeries, _symbol: &str) -> Result<DetectorOutput> {
        Ok(self.scan(series))
    }
}

/// Dates where the close breaks above the prior 50-day high.
pub fn breakouts(series: &PriceSeries) -> SignalSet {
    Breakouts::default().scan(series).signal_dates
}
