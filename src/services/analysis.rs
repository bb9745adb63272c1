//! Symbol-level analysis: composite score, recommendation and backtest.

use crate::error::{AnalysisError, Result};
use crate::services::backtester::{moving_average_crossover_backtest, run_backtest, BacktestConfig};
use crate::services::series_store::{normalize_symbol, SeriesSource};
use crate::services::signals::{ScoreAggregator, ScoreParams};
use crate::types::{
    AnalysisResult, BacktestReport, BatchReport, PriceSeries, Recommendation, SymbolError,
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything an analysis run needs besides the series and `now`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisParams {
    pub score: ScoreParams,
    pub backtest: BacktestConfig,
}

impl AnalysisParams {
    /// Current UTC calendar date, the production value for `now`.
    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Score one series and turn the score into a recommendation.
pub fn run_analysis(
    series: &PriceSeries,
    symbol: &str,
    params: &ScoreParams,
    now: NaiveDate,
) -> Result<AnalysisResult> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(AnalysisError::InvalidSymbol(symbol.to_string()));
    }
    if series.is_empty() {
        return Err(AnalysisError::InvalidSymbol(format!("{} has no rows", symbol)));
    }

    let report = ScoreAggregator::new(&params.detectors).score(
        series,
        symbol,
        params.days,
        params.weights.as_ref(),
        now,
    );
    let recommendation = Recommendation::from_score(report.overall_score);

    info!(
        "Analyzed {}: score {:.3} -> {}",
        symbol,
        report.overall_score,
        recommendation.label()
    );

    Ok(AnalysisResult {
        symbol: symbol.to_string(),
        per_indicator: report
            .per_indicator
            .iter()
            .map(|(indicator, score)| (*indicator, score.contribution))
            .collect(),
        overall_score: report.overall_score,
        recommendation,
        triggering_dates: report.triggering_dates,
        as_of: now,
    })
}

/// Crossover backtest of one series with default sizing.
pub fn backtest(
    series: &PriceSeries,
    symbol: &str,
    initial_capital: f64,
) -> Result<BacktestReport> {
    moving_average_crossover_backtest(series, symbol, initial_capital)
}

/// Runs analyses and backtests against a series source.
#[derive(Clone)]
pub struct Analyzer {
    source: Arc<dyn SeriesSource>,
    params: AnalysisParams,
}

impl Analyzer {
    pub fn new(source: Arc<dyn SeriesSource>, params: AnalysisParams) -> Self {
        Self { source, params }
    }

    /// Load `symbol` and score it as of `now`.
    pub fn analyze(&self, symbol: &str, now: NaiveDate) -> Result<AnalysisResult> {
        let key = normalize_symbol(symbol)?;
        let series = self.source.load(&key)?;
        debug!(
            "Loaded {} rows for {} ({:?} to {:?})",
            series.len(),
            key,
            series.first_date(),
            series.last_date()
        );
        run_analysis(&series, &key, &self.params.score, now)
    }

    /// Load `symbol` and backtest it with the configured capital and sizing.
    pub fn backtest(&self, symbol: &str) -> Result<BacktestReport> {
        let key = normalize_symbol(symbol)?;
        let series = self.source.load(&key)?;
        run_backtest(&series, &key, &self.params.backtest)
    }

    /// Analyze many symbols concurrently.
    ///
    /// Each symbol runs on the blocking pool. Results keep the input order and
    /// a failing symbol is reported in `errors` without affecting the others.
    pub async fn run_batch<S: AsRef<str>>(&self, symbols: &[S], now: NaiveDate) -> BatchReport {
        let handles: Vec<_> = symbols
            .iter()
            .map(|symbol| {
                let symbol = symbol.as_ref().to_string();
                let analyzer = self.clone();
                let handle = tokio::task::spawn_blocking({
                    let symbol = symbol.clone();
                    move || analyzer.analyze(&symbol, now)
                });
                (symbol, handle)
            })
            .collect();

        let mut report = BatchReport::default();
        for (symbol, handle) in handles {
            let outcome = match handle.await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) => Err(format!("analysis task failed: {}", e)),
            };
            match outcome {
                Ok(result) => report.results.push(result),
                Err(error) => {
                    warn!("Skipping {}: {}", symbol, error);
                    report.errors.push(SymbolError { symbol, error });
                }
            }
        }

        info!(
            "Batch finished: {} analyzed, {} failed",
            report.results.len(),
            report.errors.len()
        );
        report
    }
}
