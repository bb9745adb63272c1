use thiserror::Error;

/// Errors raised by the signal and backtest engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    #[error("Missing column {column} for {symbol}")]
    MissingColumn { symbol: String, column: String },

    #[error("Invalid weight {weight} for indicator {indicator}")]
    InvalidWeight { indicator: String, weight: f64 },

    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalysisError {
    /// Shorthand for a missing precomputed column.
    pub fn missing_column(symbol: &str, column: impl Into<String>) -> Self {
        AnalysisError::MissingColumn {
            symbol: symbol.to_string(),
            column: column.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
