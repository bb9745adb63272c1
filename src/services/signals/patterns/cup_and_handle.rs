//! Cup-and-handle continuation pattern.

use super::{find_peaks, span};
use crate::error::Result;
use crate::services::signals::{dates_at, Detector};
use crate::types::{DetectorOutput, Indicator, PriceSeries};

/// Three consecutive peaks where the middle one is the highest, the pullback
/// after it (the handle) holds above the prior trough (the cup), and the last
/// peak recovers to within 5% of the middle one.
pub struct CupAndHandle {
    window: usize,
}

impl Default for CupAndHandle {
    fn default() -> Self {
        Self { window: 50 }
    }
}

impl CupAndHandle {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Run the detector directly. Reads only the bars, so it cannot fail.
    pub fn scan(&self, series: &PriceSeries) -> DetectorOutput {
        let closes = series.closes();
        let peaks = find_peaks(&closes, self.window);

        let mut completions = Vec::new();
        let mut spans = Vec::new();
        for triple in peaks.windows(3) {
            let (left, center, right) = (triple[0], triple[1], triple[2]);
            if closes[left] >= closes[center] || closes[right] >= closes[center] {
                continue;
            }

            let cup_bottom = min_close(&closes[left..center]);
            let handle_bottom = min_close(&closes[center..right]);
            if handle_bottom > cup_bottom && closes[right] > closes[center] * 0.95 {
                completions.push(right);
                spans.push(span(series, left, right));
            }
        }

        DetectorOutput::new(self.indicator(), dates_at(series, completions)).with_spans(spans)
    }
}

fn min_close(closes: &[f64]) -> f64 {
    closes.iter().copied().fold(f64::INFINITY, f64::min)
}

impl Detector for CupAndHandle {
    fn indicator(&self) -> Indicator {
        Indicator::CupAndHandle
    }

    fn min_periods(&self) -> usize {
        2 * self.window + 3
    }

    fn detect(&self, series: &PriceSeries, _symbol: &str) -> Result<DetectorOutput> {
        Ok(self.scan(series))
    }
}

/// Completion dates and spans of cup-and-handle patterns.
pub fn find_cup_and_handle(series: &PriceSeries, window: usize) -> DetectorOutput {
    CupAndHandle::new(window).scan(series)
}
