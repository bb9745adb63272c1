//! Ascending triangle pattern.

use super::{find_peaks, find_troughs, span};
use crate::error::Result;
use crate::services::signals::{dates_at, Detector};
use crate::types::{DetectorOutput, Indicator, PriceSeries};

/// Two consecutive peaks whose deepest intervening trough stays within 5% of
/// the first peak, i.e. support holds while price retests resistance.
pub struct AscendingTriangle {
    window: usize,
}

impl Default for AscendingTriangle {
    fn default() -> Self {
        Self { window: 50 }
    }
}

impl AscendingTriangle {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn scan(&self, series: &PriceSeries) -> DetectorOutput {
        let closes = series.closes();
        let peaks = find_peaks(&closes, self.window);
        let troughs = find_troughs(&closes, self.window);

        let mut completions = Vec::new();
        let mut spans = Vec::new();
        for pair in peaks.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            let support = troughs
                .iter()
                .copied()
                .filter(|&t| left < t && t < right)
                .min_by(|&a, &b| closes[a].total_cmp(&closes[b]));

            let Some(support) = support else {
                continue;
            };
            if closes[support] > closes[left] * 0.95 {
                completions.push(right);
                spans.push(span(series, left, right));
            }
        }

        DetectorOutput::new(self.indicator(), dates_at(series, completions)).with_spans(spans)
    }
}

impl Detector for AscendingTriangle {
    fn indicator(&self) -> Indicator {
        Indicator::AscendingTriangle
    }

    fn min_periods(&self) -> usize {
        self.window + 3
    }

    fn detect(&self, series: &PriceSeries, _symbol: &str) -> Result<DetectorOutput> {
        Ok(self.scan(series))
    }
}

/// Completion dates and spans of ascending triangles.
pub fn find_ascending_triangle(series: &PriceSeries, window: usize) -> DetectorOutput {
    AscendingTriangle::new(window).scan(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::patterns::test_support::*;
    use crate::types::PatternMatch;

    #[test]
    fn test_detects_triangle() {
        let closes = knots(&[
            (0, 90.0),
            (10, 100.0),
            (25, 97.0),
            (40, 101.0),
            (50, 90.0),
        ]);
        let output = find_ascending_triangle(&series(&closes), 5);
        assert_eq!(output.signal_dates.dates(), &[day(40)]);
        assert_eq!(
            output.pattern_spans,
            vec![PatternMatch {
                start: day(10),
                end: day(40),
            }]
        );
    }

    #[test]
    fn test_deep_trough_rejected() {
        let closes = knots(&[
            (0, 90.0),
            (10, 100.0),
            (25, 85.0),
            (40, 101.0),
            (50, 90.0),
        ]);
        assert!(find_ascending_triangle(&series(&closes), 5).signal_dates.is_empty());
    }

    #[test]
    fn test_deepest_trough_decides() {
        // The bump at 24 sits within the window of the peak at 10 and is dropped,
        // leaving a shallow trough at 20 and a deep one at 40 between the same peaks
        let closes = knots(&[
            (0, 90.0),
            (10, 100.0),
            (20, 98.0),
            (24, 98.5),
            (40, 80.0),
            (50, 101.0),
            (60, 90.0),
        ]);
        assert!(find_ascending_triangle(&series(&closes), 15).signal_dates.is_empty());
    }
}
