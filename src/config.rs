use crate::error::{AnalysisError, Result};
use crate::services::analysis::AnalysisParams;
use crate::services::backtester::BacktestConfig;
use crate::services::signals::{DetectorParams, ScoreParams};
use crate::types::{PositionSizing, WeightMap};
use std::env;

/// Analysis configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Symbols analysed by the runner.
    pub symbols: Vec<String>,
    /// Trailing window for the score, in days.
    pub days: u32,
    /// Volume spike multiplier.
    pub volume_threshold: f64,
    /// RSI oversold level.
    pub rsi_threshold: f64,
    /// Starting cash for backtests.
    pub initial_capital: f64,
    /// Minimum spacing between extrema for pattern detection.
    pub pattern_window: usize,
    /// Raw `(indicator, weight)` pairs; `None` weighs every indicator 1.
    pub weights: Option<Vec<(String, f64)>>,
    /// Treat weights as 0-100 percentages.
    pub weights_as_percent: bool,
    pub position_sizing: PositionSizing,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["AAPL".to_string(), "MSFT".to_string()],
            days: 10,
            volume_threshold: 2.0,
            rsi_threshold: 30.0,
            initial_capital: 100_000.0,
            pattern_window: 50,
            weights: None,
            weights_as_percent: false,
            position_sizing: PositionSizing::default(),
        }
    }
}

/// Parse `name=weight,name=weight`. Malformed entries are skipped.
fn parse_weights(raw: &str) -> Vec<(String, f64)> {
    raw.split(',')
        .filter_map(|pair| {
            let (name, weight) = pair.split_once('=')?;
            let weight = weight.trim().parse().ok()?;
            Some((name.trim().to_lowercase(), weight))
        })
        .collect()
}

impl AnalysisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let symbols = env::var("BULLSCAN_SYMBOLS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|sym| sym.trim().to_uppercase())
                    .filter(|sym| !sym.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|symbols| !symbols.is_empty())
            .unwrap_or(defaults.symbols);

        Self {
            symbols,
            days: env::var("BULLSCAN_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.days),
            volume_threshold: env::var("BULLSCAN_VOLUME_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.volume_threshold),
            rsi_threshold: env::var("BULLSCAN_RSI_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rsi_threshold),
            initial_capital: env::var("BULLSCAN_INITIAL_CAPITAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.initial_capital),
            pattern_window: env::var("BULLSCAN_PATTERN_WINDOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.pattern_window),
            weights: env::var("BULLSCAN_WEIGHTS")
                .ok()
                .map(|v| parse_weights(&v))
                .filter(|w| !w.is_empty()),
            weights_as_percent: env::var("BULLSCAN_WEIGHTS_PERCENT")
                .ok()
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            position_sizing: env::var("BULLSCAN_POSITION_SIZING")
                .ok()
                .and_then(|v| PositionSizing::from_str(&v))
                .unwrap_or_default(),
        }
    }

    /// Build the weight map, or `None` for uniform weights.
    pub fn weight_map(&self) -> Result<Option<WeightMap>> {
        let Some(pairs) = &self.weights else {
            return Ok(None);
        };
        let pairs = pairs.iter().map(|(name, w)| (name.as_str(), *w));
        let map = if self.weights_as_percent {
            WeightMap::from_percentages(pairs)?
        } else {
            WeightMap::from_pairs(pairs)?
        };
        Ok(Some(map))
    }

    /// Validate and convert into the parameters the analysis core consumes.
    pub fn params(&self) -> Result<AnalysisParams> {
        if self.pattern_window == 0 {
            return Err(AnalysisError::InvalidConfig(
                "pattern window must be at least 1".to_string(),
            ));
        }
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "initial capital must be positive, got {}",
                self.initial_capital
            )));
        }

        Ok(AnalysisParams {
            score: ScoreParams {
                days: self.days,
                detectors: DetectorParams {
                    volume_threshold: self.volume_threshold,
                    rsi_threshold: self.rsi_threshold,
                    pattern_window: self.pattern_window,
                },
                weights: self.weight_map()?,
            },
            backtest: BacktestConfig {
                initial_capital: self.initial_capital,
                sizing: self.position_sizing,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Indicator;

    #[test]
    fn test_config_default_values() {
        let config = AnalysisConfig::default();
        assert_eq!(config.symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(config.days, 10);
        assert_eq!(config.volume_threshold, 2.0);
        assert_eq!(config.rsi_threshold, 30.0);
        assert_eq!(config.initial_capital, 100_000.0);
        assert_eq!(config.pattern_window, 50);
        assert!(config.weights.is_none());
        assert_eq!(config.position_sizing, PositionSizing::FullyInvested);
    }

    #[test]
    fn test_parse_weights_skips_malformed() {
        let weights = parse_weights("rsi_oversold=0.5, breakouts = 1 ,junk,ema=abc");
        assert_eq!(
            weights,
            vec![
                ("rsi_oversold".to_string(), 0.5),
                ("breakouts".to_string(), 1.0)
            ]
        );
    }

    #[test]
    fn test_params_from_defaults() {
        let params = AnalysisConfig::default().params().unwrap();
        assert_eq!(params.score.days, 10);
        assert!(params.score.weights.is_none());
        assert_eq!(params.backtest.initial_capital, 100_000.0);
    }

    #[test]
    fn test_percentage_weights() {
        let config = AnalysisConfig {
            weights: Some(vec![("volume_spikes".to_string(), 40.0)]),
            weights_as_percent: true,
            ..Default::default()
        };
        let weights = config.weight_map().unwrap().unwrap();
        assert!((weights.get(Indicator::VolumeSpikes) - 0.4).abs() < 1e-12);
        assert_eq!(weights.get(Indicator::Breakouts), 0.0);
    }

    #[test]
    fn test_unknown_indicator_weight() {
        let config = AnalysisConfig {
            weights: Some(vec![("macd".to_string(), 0.5)]),
            ..Default::default()
        };
        assert_eq!(
            config.params(),
            Err(AnalysisError::UnknownIndicator("macd".to_string()))
        );
    }

    #[test]
    fn test_out_of_range_weight() {
        let config = AnalysisConfig {
            weights: Some(vec![("breakouts".to_string(), 40.0)]),
            ..Default::default()
        };
        assert!(matches!(
            config.params(),
            Err(AnalysisError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_invalid_capital() {
        let config = AnalysisConfig {
            initial_capital: -1.0,
            ..Default::default()
        };
        assert!(matches!(config.params(), Err(AnalysisError::InvalidConfig(_))));
    }
}
