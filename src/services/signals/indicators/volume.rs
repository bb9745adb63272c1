//! Volume spike detector.

use crate::error::Result;
use crate::services::signals::rolling::rolling_mean;
use crate::services::signals::{dates_at, Detector};
use crate::types::{DetectorOutput, Indicator, PriceSeries, SignalSet};

/// Fires when volume exceeds `multiplier` times its trailing mean while the
/// close also rose from the previous day.
///
/// The mean covers up to `window` days and starts from the first row.
pub struct VolumeSpikes {
    multiplier: f64,
    window: usize,
}

impl Default for VolumeSpikes {
    fn default() -> Self {
        Self {
            multiplier: 2.0,
            window: 50,
        }
    }
}

impl VolumeSpikes {
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier,
            ..Self::default()
        }
    }

    /// Infallible form of `detect`: only the bars are read.
    pub fn scan(&self, series: &PriceSeries) -> DetectorOutput {
        let volumes = series.volumes();
        let closes = series.closes();
        let avg_volume = rolling_mean(&volumes, self.window, 1);

        let hits = (1..series.len()).filter(|&i| {
            let spiked = avg_volume[i].is_some_and(|avg| volumes[i] > self.multiplier * avg);
            spiked && closes[i] > closes[i - 1]
        });

        DetectorOutput::new(self.indicator(), dates_at(series, hits))
            .with_series("avg_volume", avg_volume)
    }
}

impl Detector for VolumeSpikes {
    fn indicator(&self) -> Indicator {
        Indicator::VolumeSpikes
    }

    fn min_periods(&self) -> usize {
        2
    }

    fn detect(&self, series: &PriceSeries, _symbol: &str) -> Result<DetectorOutput> {
        Ok(self.scan(series))
    }
}

/// Dates of volume spikes on up days.
pub fn volume_spikes(series: &PriceSeries, multiplier: f64) -> SignalSet {
    VolumeSpikes::new(multiplier).scan(series).signal_dates
}
