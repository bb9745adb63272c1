pub mod analysis;
pub mod backtester;
pub mod preprocess;
pub mod series_store;
pub mod signals;

pub use analysis::{backtest, run_analysis, AnalysisParams, Analyzer};
pub use backtester::{
    moving_average_crossover_backtest, run_backtest, simulate_portfolio, BacktestConfig,
};
pub use preprocess::with_standard_columns;
pub use series_store::{MemorySeriesStore, SeriesSource};
pub use signals::{calculate_score, Detector, DetectorParams, ScoreAggregator, ScoreParams};
