//! In-memory price series store.

use crate::error::{AnalysisError, Result};
use crate::services::preprocess::with_standard_columns;
use crate::types::{PriceBar, PriceSeries};
use dashmap::DashMap;
use tracing::debug;

/// Anything that can hand out a private copy of a symbol's series,
/// with the standard derived columns already attached.
pub trait SeriesSource: Send + Sync {
    fn load(&self, symbol: &str) -> Result<PriceSeries>;
}

/// Normalise a user-supplied symbol to its storage key.
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let key = symbol.trim().to_uppercase();
    if key.is_empty() {
        return Err(AnalysisError::InvalidSymbol(symbol.to_string()));
    }
    Ok(key)
}

/// Series store keyed by uppercase symbol.
#[derive(Default)]
pub struct MemorySeriesStore {
    series: DashMap<String, PriceSeries>,
}

impl MemorySeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a series as-is. Empty series are rejected.
    pub fn insert(&self, symbol: &str, series: PriceSeries) -> Result<()> {
        let key = normalize_symbol(symbol)?;
        if series.is_empty() {
            return Err(AnalysisError::InvalidSymbol(format!("{} has no rows", key)));
        }
        debug!(
            "Stored {} rows for {} with columns {:?}",
            series.len(),
            key,
            series.column_names().collect::<Vec<_>>()
        );
        self.series.insert(key, series);
        Ok(())
    }

    /// Build a series from raw bars, attach the standard columns and store it.
    pub fn insert_bars(&self, symbol: &str, bars: Vec<PriceBar>) -> Result<()> {
        let key = normalize_symbol(symbol)?;
        let series = with_standard_columns(PriceSeries::new(bars)?, &key)?;
        self.insert(&key, series)
    }

    pub fn remove(&self, symbol: &str) -> Option<PriceSeries> {
        let key = normalize_symbol(symbol).ok()?;
        self.series.remove(&key).map(|(_, s)| s)
    }

    /// Stored symbols, sorted.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.series.iter().map(|e| e.key().clone()).collect();
        symbols.sort();
        symbols
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl SeriesSource for MemorySeriesStore {
    fn load(&self, symbol: &str) -> Result<PriceSeries> {
        let key = normalize_symbol(symbol)?;
        self.series
            .get(&key)
            .map(|entry| entry.value().clone())
            .ok_or(AnalysisError::InvalidSymbol(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn bars(count: usize) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..count)
            .map(|i| PriceBar::flat(start + Duration::days(i as i64), 50.0 + i as f64, 10.0))
            .collect()
    }

    #[test]
    fn test_insert_bars_attaches_columns() {
        let store = MemorySeriesStore::new();
        store.insert_bars("aapl", bars(30)).unwrap();

        let series = store.load(" AAPL ").unwrap();
        assert!(series.column("AAPL_50_day_ma").is_some());
        assert!(series.column("AAPL_200_day_ma").is_some());
        assert!(series.column("AAPL_rsi").is_some());
    }

    #[test]
    fn test_unknown_symbol() {
        let store = MemorySeriesStore::new();
        assert_eq!(
            store.load("NOPE"),
            Err(AnalysisError::InvalidSymbol("NOPE".to_string()))
        );
    }

    #[test]
    fn test_blank_symbol_rejected() {
        let store = MemorySeriesStore::new();
        assert!(matches!(
            store.insert_bars("  ", bars(3)),
            Err(AnalysisError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn test_empty_series_rejected() {
        let store = MemorySeriesStore::new();
        let empty = PriceSeries::new(Vec::new()).unwrap();
        assert!(store.insert("MSFT", empty).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_symbols_and_remove() {
        let store = MemorySeriesStore::new();
        store.insert_bars("msft", bars(5)).unwrap();
        store.insert_bars("aapl", bars(5)).unwrap();
        assert_eq!(store.symbols(), vec!["AAPL", "MSFT"]);

        assert!(store.remove("Msft").is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_returns_private_copy() {
        let store = MemorySeriesStore::new();
        store.insert_bars("AAPL", bars(5)).unwrap();

        let mut copy = store.load("AAPL").unwrap();
        copy.insert_column("scratch", vec![None; 5]).unwrap();
        assert!(store.load("AAPL").unwrap().column("scratch").is_none());
    }
}
