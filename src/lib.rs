//! Bullscan - bullish signal scoring and crossover backtesting engine

pub mod config;
pub mod error;
pub mod services;
pub mod types;

pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use services::{
    backtest, calculate_score, run_analysis, AnalysisParams, Analyzer, MemorySeriesStore,
    ScoreParams, SeriesSource,
};
