//! Composite bullish score over a trailing window.

use super::{all_detectors, Detector, DetectorParams};
use crate::types::{
    DetectorOutput, Indicator, IndicatorScore, PriceSeries, ScoreReport, SignalSet, WeightMap,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Inputs to a score calculation besides the series itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreParams {
    /// Length of the trailing window, in calendar days, ending at `now`.
    pub days: u32,
    pub detectors: DetectorParams,
    /// `None` weighs every indicator 1.
    pub weights: Option<WeightMap>,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            days: 10,
            detectors: DetectorParams::default(),
            weights: None,
        }
    }
}

/// Runs every detector and folds the results into one weighted score.
pub struct ScoreAggregator {
    detectors: Vec<Box<dyn Detector>>,
}

impl ScoreAggregator {
    pub fn new(params: &DetectorParams) -> Self {
        Self {
            detectors: all_detectors(params),
        }
    }

    /// Run all detectors.
    ///
    /// A detector without `min_periods` rows of history is skipped and records
    /// an empty signal set. A failing detector is logged and yields no output.
    pub fn detect_all(
        &self,
        series: &PriceSeries,
        symbol: &str,
    ) -> BTreeMap<Indicator, Option<DetectorOutput>> {
        self.detectors
            .iter()
            .map(|detector| {
                if series.len() < detector.min_periods() {
                    debug!(
                        "Skipping {}: needs {} rows, {} has {}",
                        detector.id(),
                        detector.min_periods(),
                        symbol,
                        series.len()
                    );
                    let empty = DetectorOutput::new(detector.indicator(), SignalSet::empty());
                    return (detector.indicator(), Some(empty));
                }
                let output = match detector.detect(series, symbol) {
                    Ok(output) => {
                        debug!(
                            "{} ({:?}) fired {} times for {}",
                            detector.id(),
                            detector.indicator().category(),
                            output.signal_dates.len(),
                            symbol
                        );
                        Some(output)
                    }
                    Err(e) => {
                        warn!("Detector {} failed for {}: {}", detector.id(), symbol, e);
                        None
                    }
                };
                (detector.indicator(), output)
            })
            .collect()
    }

    /// Score a series as of `now`.
    ///
    /// Each indicator contributes its weight if at least one of its signal
    /// dates lies within `days` of `now`, and nothing otherwise. The overall
    /// score divides the contributions by the sum of supplied weights.
    pub fn score(
        &self,
        series: &PriceSeries,
        symbol: &str,
        days: u32,
        weights: Option<&WeightMap>,
        now: NaiveDate,
    ) -> ScoreReport {
        let uniform;
        let weights = match weights {
            Some(w) => w,
            None => {
                uniform = WeightMap::uniform();
                &uniform
            }
        };

        let outputs = self.detect_all(series, symbol);

        let mut per_indicator = BTreeMap::new();
        let mut triggering_dates = BTreeSet::new();
        let mut total_contribution = 0.0;

        for (indicator, output) in &outputs {
            let recent: Vec<NaiveDate> = output
                .as_ref()
                .map(|o| o.signal_dates.within(now, days).collect())
                .unwrap_or_default();

            let weight = weights.get(*indicator);
            let fired = !recent.is_empty();
            let contribution = if fired { weight } else { 0.0 };

            if contribution > 0.0 {
                triggering_dates.extend(recent);
            }
            total_contribution += contribution;
            per_indicator.insert(
                *indicator,
                IndicatorScore {
                    fired,
                    weight,
                    contribution,
                },
            );
        }

        let total_weight = weights.total();
        let overall_score = if total_weight > 0.0 {
            (total_contribution / total_weight).clamp(0.0, 1.0)
        } else {
            0.0
        };

        debug!(
            "Scored {} at {:.3} ({} triggering dates)",
            symbol,
            overall_score,
            triggering_dates.len()
        );

        ScoreReport {
            per_indicator,
            overall_score,
            triggering_dates,
        }
    }
}

/// Score `series` for `symbol` with a fresh aggregator.
pub fn calculate_score(
    series: &PriceSeries,
    symbol: &str,
    params: &ScoreParams,
    now: NaiveDate,
) -> ScoreReport {
    ScoreAggregator::new(&params.detectors).score(
        series,
        symbol,
        params.days,
        params.weights.as_ref(),
        now,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{rsi_column, PriceBar};
    use chrono::Duration;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + Duration::days(offset)
    }

    /// Flat prices with an RSI column that dips below 30 on `oversold_rows`.
    fn series_with_oversold(count: usize, oversold_rows: &[usize]) -> PriceSeries {
        let bars = (0..count)
            .map(|i| PriceBar::flat(day(i as i64), 100.0, 1000.0))
            .collect();
        let rsi = (0..count)
            .map(|i| Some(if oversold_rows.contains(&i) { 20.0 } else { 50.0 }))
            .collect();
        PriceSeries::new(bars)
            .unwrap()
            .with_column(rsi_column("ACME"), rsi)
            .unwrap()
    }

    #[test]
    fn test_single_weighted_indicator_scores_one() {
        let series = series_with_oversold(30, &[28]);
        let weights = WeightMap::new().with(Indicator::RsiOversold, 1.0).unwrap();
        let params = ScoreParams {
            days: 5,
            weights: Some(weights),
            ..Default::default()
        };
        let report = calculate_score(&series, "ACME", &params, day(29));
        assert_eq!(report.overall_score, 1.0);
        assert!(report.fired(Indicator::RsiOversold));
        assert_eq!(
            report.triggering_dates.iter().copied().collect::<Vec<_>>(),
            vec![day(28)]
        );
    }

    #[test]
    fn test_uniform_weights_average_hits() {
        let series = series_with_oversold(30, &[29]);
        let report = calculate_score(&series, "ACME", &ScoreParams::default(), day(29));
        // Only RSI fires on a flat series; MA columns are missing so that detector contributes 0
        assert!((report.overall_score - 1.0 / 9.0).abs() < 1e-12);
        assert_eq!(report.contribution(Indicator::MovingAverageCrossover), 0.0);
    }

    #[test]
    fn test_old_signals_do_not_count() {
        let series = series_with_oversold(30, &[2]);
        let report = calculate_score(&series, "ACME", &ScoreParams::default(), day(29));
        assert_eq!(report.overall_score, 0.0);
        assert!(report.triggering_dates.is_empty());
    }

    #[test]
    fn test_zero_weights_score_zero() {
        let series = series_with_oversold(30, &[29]);
        let weights = WeightMap::new().with(Indicator::RsiOversold, 0.0).unwrap();
        let params = ScoreParams {
            weights: Some(weights),
            ..Default::default()
        };
        let report = calculate_score(&series, "ACME", &params, day(29));
        assert_eq!(report.overall_score, 0.0);
        assert!(report.fired(Indicator::RsiOversold));
        assert_eq!(report.contribution(Indicator::RsiOversold), 0.0);
    }

    #[test]
    fn test_window_anchored_to_now_not_series_end() {
        let series = series_with_oversold(30, &[29]);
        // A year later the same data is stale
        let report = calculate_score(&series, "ACME", &ScoreParams::default(), day(400));
        assert_eq!(report.overall_score, 0.0);
    }

    #[test]
    fn test_unbounded_window_counts_every_signal() {
        let series = series_with_oversold(30, &[2]);
        let weights = WeightMap::new().with(Indicator::RsiOversold, 1.0).unwrap();
        let params = ScoreParams {
            days: u32::MAX,
            weights: Some(weights),
            ..Default::default()
        };
        let report = calculate_score(&series, "ACME", &params, day(29));
        assert_eq!(report.overall_score, 1.0);
        assert!(report.triggering_dates.contains(&day(2)));
    }

    #[test]
    fn test_short_history_skips_detector() {
        // An RSI reading on row 9 cannot come from a 14-period RSI
        let series = series_with_oversold(10, &[9]);
        let aggregator = ScoreAggregator::new(&DetectorParams::default());

        let outputs = aggregator.detect_all(&series, "ACME");
        let rsi = outputs[&Indicator::RsiOversold].as_ref().unwrap();
        assert!(rsi.signal_dates.is_empty());

        let report = calculate_score(&series, "ACME", &ScoreParams::default(), day(9));
        assert!(!report.fired(Indicator::RsiOversold));
        assert_eq!(report.overall_score, 0.0);
    }

    #[test]
    fn test_every_indicator_reported() {
        let series = series_with_oversold(10, &[]);
        let report = calculate_score(&series, "ACME", &ScoreParams::default(), day(9));
        assert_eq!(report.per_indicator.len(), Indicator::ALL.len());
    }
}
