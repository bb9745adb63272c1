//! Moving-average crossover backtest.
//!
//! Holds one asset while the 50-day average is above the 200-day average and
//! sits in cash otherwise. Produces a per-row portfolio ledger and
//! confusion-matrix style accuracy metrics over entries and exits.

use crate::error::{AnalysisError, Result};
use crate::services::signals::rolling::pct_change;
use crate::types::{
    long_ma_column, short_ma_column, BacktestReport, LedgerRow, PositionSizing, PriceSeries,
    TradeCounts,
};
use tracing::{debug, info};

/// Backtest settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub sizing: PositionSizing,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            sizing: PositionSizing::default(),
        }
    }
}

impl BacktestConfig {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(AnalysisError::InvalidConfig(
                "Initial capital must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Held-state signal per row: 1 while short MA > long MA, else 0.
///
/// Rows where either average is undefined count as flat.
fn held_signals(series: &PriceSeries, symbol: &str) -> Result<Vec<i8>> {
    let short = series.require_column(symbol, &short_ma_column(symbol))?;
    let long = series.require_column(symbol, &long_ma_column(symbol))?;

    Ok(short
        .iter()
        .zip(long)
        .map(|(s, l)| match (s, l) {
            (Some(s), Some(l)) if s > l => 1,
            _ => 0,
        })
        .collect())
}

/// Simulate the portfolio row by row.
///
/// The strategy starts flat, so a signal already held on the first row is an entry.
/// Entering debits the purchase from cash and exiting credits `units * close` back.
pub fn simulate_portfolio(
    series: &PriceSeries,
    symbol: &str,
    config: &BacktestConfig,
) -> Result<Vec<LedgerRow>> {
    config.validate()?;
    if series.is_empty() {
        return Err(AnalysisError::InvalidSeries(format!("no rows for {}", symbol)));
    }
    let signals = held_signals(series, symbol)?;

    let mut ledger = Vec::with_capacity(series.len());
    let mut prev_signal = 0i8;
    let mut units = 0.0;
    let mut cash = config.initial_capital;
    let mut prev_total: Option<f64> = None;

    for (bar, &signal) in series.bars().iter().zip(&signals) {
        let position_change = signal - prev_signal;
        let close = bar.close;

        match position_change {
            1 => match config.sizing {
                PositionSizing::SingleUnit => {
                    cash -= close;
                    units += 1.0;
                }
                PositionSizing::FullyInvested if close > 0.0 => {
                    units += cash / close;
                    cash = 0.0;
                }
                PositionSizing::FullyInvested => {}
            },
            -1 => {
                cash += units * close;
                units = 0.0;
            }
            _ => {}
        }

        let holdings = units * close;
        let total = cash + holdings;
        let returns = prev_total.and_then(|p| (p != 0.0).then(|| total / p - 1.0));

        ledger.push(LedgerRow {
            date: bar.date,
            signal,
            position_change,
            units,
            holdings,
            cash,
            total,
            returns,
        });

        prev_signal = signal;
        prev_total = Some(total);
    }

    Ok(ledger)
}

/// Classify every entry/exit by the price move over the following period.
///
/// Trades on the last row, or followed by an unchanged price, are not counted.
fn classify_trades(series: &PriceSeries, ledger: &[LedgerRow]) -> TradeCounts {
    let returns = pct_change(&series.closes());
    let mut counts = TradeCounts::default();

    for (i, row) in ledger.iter().enumerate() {
        if row.position_change == 0 {
            continue;
        }
        let Some(next_return) = returns.get(i + 1).copied().flatten() else {
            continue;
        };

        match (row.position_change, next_return) {
            (1, r) if r > 0.0 => counts.true_positive += 1,
            (1, r) if r < 0.0 => counts.false_positive += 1,
            (-1, r) if r > 0.0 => counts.false_negative += 1,
            (-1, r) if r < 0.0 => counts.true_negative += 1,
            _ => {}
        }
    }
    counts
}

/// Run the crossover backtest with explicit settings.
pub fn run_backtest(
    series: &PriceSeries,
    symbol: &str,
    config: &BacktestConfig,
) -> Result<BacktestReport> {
    let ledger = simulate_portfolio(series, symbol, config)?;
    let trades = classify_trades(series, &ledger);

    let final_portfolio_value = ledger
        .last()
        .map(|row| row.total)
        .unwrap_or(config.initial_capital);
    let roi = (final_portfolio_value - config.initial_capital) / config.initial_capital;

    debug!(
        "Backtest ledger for {}: {} rows, {} position changes",
        symbol,
        ledger.len(),
        ledger.iter().filter(|r| r.position_change != 0).count()
    );
    info!(
        "Backtest {} completed: {} classified trades, {:.2}% return",
        symbol,
        trades.total(),
        roi * 100.0
    );

    Ok(BacktestReport {
        final_portfolio_value,
        roi,
        accuracy: trades.accuracy(),
        precision: trades.precision(),
        recall: trades.recall(),
        trades,
    })
}

/// Crossover backtest with default sizing.
pub fn moving_average_crossover_backtest(
    series: &PriceSeries,
    symbol: &str,
    initial_capital: f64,
) -> Result<BacktestReport> {
    run_backtest(series, symbol, &BacktestConfig::new(initial_capital))
}
