//! Integration tests for the moving-average crossover backtest

use bullscan::services::backtester::{
    moving_average_crossover_backtest, run_backtest, simulate_portfolio, BacktestConfig,
};
use bullscan::services::signals::indicators::moving_average_crossover;
use bullscan::services::with_standard_columns;
use bullscan::types::*;
use bullscan::AnalysisError;
use chrono::{Duration, NaiveDate};

fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 3, 1).unwrap() + Duration::days(offset as i64)
}

fn create_series(closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar::flat(day(i), c, 1_000.0))
        .collect();
    PriceSeries::new(bars).unwrap()
}

/// Attach averages so the short one sits above the long one from `cross_row` on.
fn with_crossover_at(series: PriceSeries, symbol: &str, cross_row: usize) -> PriceSeries {
    let n = series.len();
    let short = (0..n)
        .map(|i| Some(if i < cross_row { 9.0 } else { 11.0 }))
        .collect();
    series
        .with_column(short_ma_column(symbol), short)
        .unwrap()
        .with_column(long_ma_column(symbol), vec![Some(10.0); n])
        .unwrap()
}

#[test]
fn test_crossover_at_row_55_is_one_winning_entry() {
    let closes: Vec<f64> = (0..60)
        .map(|i| if i < 55 { 50.0 } else { 50.0 + (i - 54) as f64 })
        .collect();
    let series = with_crossover_at(create_series(&closes), "SPY", 55);

    let crosses = moving_average_crossover(&series, "SPY").unwrap();
    assert_eq!(crosses.dates(), &[day(55)]);

    let report = moving_average_crossover_backtest(&series, "SPY", 100_000.0).unwrap();
    assert_eq!(report.trades.total(), 1);
    assert_eq!(report.trades.true_positive, 1);
    assert!(report.roi > 0.0);
}

#[test]
fn test_ten_percent_gain_without_exit() {
    let series = with_crossover_at(create_series(&[100.0, 100.0, 110.0]), "SPY", 1);
    let report = moving_average_crossover_backtest(&series, "SPY", 100_000.0).unwrap();

    assert!((report.roi - 0.10).abs() < 1e-9);
    assert_eq!(report.accuracy, 1.0);
    assert_eq!(report.precision, 1.0);
    assert_eq!(report.recall, 1.0);
}

#[test]
fn test_metrics_zero_without_trades() {
    let series = with_crossover_at(create_series(&[10.0, 10.5, 11.0, 10.0]), "SPY", 10);
    let report = moving_average_crossover_backtest(&series, "SPY", 1_000.0).unwrap();

    assert_eq!(report.trades, TradeCounts::default());
    assert_eq!(report.accuracy, 0.0);
    assert_eq!(report.precision, 0.0);
    assert_eq!(report.recall, 0.0);
    assert!(!report.accuracy.is_nan());
}

#[test]
fn test_single_unit_ledger() {
    let series = with_crossover_at(create_series(&[20.0, 21.0, 22.0, 23.0]), "SPY", 2);
    let config = BacktestConfig {
        initial_capital: 500.0,
        sizing: PositionSizing::SingleUnit,
    };
    let ledger = simulate_portfolio(&series, "SPY", &config).unwrap();

    let signals: Vec<i8> = ledger.iter().map(|r| r.signal).collect();
    assert_eq!(signals, vec![0, 0, 1, 1]);
    assert_eq!(ledger[2].cash, 478.0);
    assert_eq!(ledger[3].holdings, 23.0);
    assert_eq!(ledger[3].total, 501.0);

    let report = run_backtest(&series, "SPY", &config).unwrap();
    assert!((report.roi - 1.0 / 500.0).abs() < 1e-12);
}

#[test]
fn test_ledger_accounting_with_real_averages() {
    // Long decline, then a sustained rally that lifts the 50-day over the 200-day
    let closes: Vec<f64> = (0..400)
        .map(|i| {
            if i < 200 {
                200.0 - i as f64 * 0.5
            } else {
                100.0 + (i - 200) as f64 * 1.0
            }
        })
        .collect();
    let series = with_standard_columns(create_series(&closes), "RALLY").unwrap();
    let ledger = simulate_portfolio(&series, "RALLY", &BacktestConfig::new(10_000.0)).unwrap();

    assert_eq!(ledger.len(), series.len());
    for row in &ledger {
        assert!((row.total - (row.cash + row.holdings)).abs() < 1e-6);
    }
    let entries = ledger.iter().filter(|r| r.position_change == 1).count();
    assert_eq!(entries, 1);

    let report = run_backtest(&series, "RALLY", &BacktestConfig::new(10_000.0)).unwrap();
    assert!(report.roi > 0.0);
    assert_eq!(report.trades.true_positive, 1);
}

#[test]
fn test_backtest_without_averages_fails() {
    let series = create_series(&[1.0, 2.0, 3.0]);
    assert!(matches!(
        moving_average_crossover_backtest(&series, "SPY", 1_000.0),
        Err(AnalysisError::MissingColumn { .. })
    ));
}
