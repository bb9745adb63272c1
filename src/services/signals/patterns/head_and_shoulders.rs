//! Inverse head-and-shoulders reversal pattern.

use super::{find_troughs, span};
use crate::error::Result;
use crate::services::signals::{dates_at, Detector};
use crate::types::{DetectorOutput, Indicator, PriceSeries};

/// Three consecutive valleys where the middle one (the head) is strictly the deepest.
pub struct InverseHeadAndShoulders {
    window: usize,
}

impl Default for InverseHeadAndShoulders {
    fn default() -> Self {
        Self { window: 50 }
    }
}

impl InverseHeadAndShoulders {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn scan(&self, series: &PriceSeries) -> DetectorOutput {
        let closes = series.closes();
        let valleys = find_troughs(&closes, self.window);

        let mut completions = Vec::new();
        let mut spans = Vec::new();
        for triple in valleys.windows(3) {
            let (left, head, right) = (triple[0], triple[1], triple[2]);
            if closes[left] > closes[head] && closes[right] > closes[head] {
                completions.push(right);
                spans.push(span(series, left, right));
            }
        }

        DetectorOutput::new(self.indicator(), dates_at(series, completions)).with_spans(spans)
    }
}

impl Detector for InverseHeadAndShoulders {
    fn indicator(&self) -> Indicator {
        Indicator::InverseHeadAndShoulders
    }

    fn min_periods(&self) -> usize {
        2 * self.window + 3
    }

    fn detect(&self, series: &PriceSeries, _symbol: &str) -> Result<DetectorOutput> {
        Ok(self.scan(series))
    }
}

/// Completion dates and spans of inverse head-and-shoulders patterns.
pub fn find_inverse_head_and_shoulders(series: &PriceSeries, window: usize) -> DetectorOutput {
    InverseHeadAndShoulders::new(window).scan(series)
}
