use crate::error::{AnalysisError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One daily OHLCV record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// Bar where every price field equals `price`.
    pub fn flat(date: NaiveDate, price: f64, volume: f64) -> Self {
        Self {
            date,
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
        }
    }
}

/// A rolling or precomputed column. `None` marks positions without enough history.
pub type Column = Vec<Option<f64>>;

/// Name of the short moving-average column for a symbol.
pub fn short_ma_column(symbol: &str) -> String {
    format!("{}_50_day_ma", symbol)
}

/// Name of the long moving-average column for a symbol.
pub fn long_ma_column(symbol: &str) -> String {
    format!("{}_200_day_ma", symbol)
}

/// Name of the RSI column for a symbol.
pub fn rsi_column(symbol: &str) -> String {
    format!("{}_rsi", symbol)
}

/// Daily price series ordered by strictly increasing date.
///
/// Derived columns are attached per symbol and always have one entry per bar.
/// Detectors only read from a series; anything they compute is returned as a
/// new column rather than written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
    columns: BTreeMap<String, Column>,
}

impl PriceSeries {
    /// Build a series, rejecting unordered/duplicate dates and negative volume.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self> {
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(AnalysisError::InvalidSeries(format!(
                    "dates must be strictly increasing ({} follows {})",
                    pair[1].date, pair[0].date
                )));
            }
        }
        if let Some(bar) = bars.iter().find(|b| b.volume < 0.0 || b.volume.is_nan()) {
            return Err(AnalysisError::InvalidSeries(format!(
                "volume on {} must be non-negative",
                bar.date
            )));
        }

        Ok(Self {
            bars,
            columns: BTreeMap::new(),
        })
    }

    /// Attach a derived column, replacing any column of the same name.
    pub fn with_column(mut self, name: impl Into<String>, values: Column) -> Result<Self> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    /// Attach a derived column in place.
    pub fn insert_column(&mut self, name: impl Into<String>, values: Column) -> Result<()> {
        let name = name.into();
        if values.len() != self.bars.len() {
            return Err(AnalysisError::InvalidSeries(format!(
                "column {} has {} values for {} bars",
                name,
                values.len(),
                self.bars.len()
            )));
        }
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn date(&self, index: usize) -> NaiveDate {
        self.bars[index].date
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Look up a derived column by name.
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(|c| c.as_slice())
    }

    /// Look up a derived column, failing when the caller has not precomputed it.
    pub fn require_column(&self, symbol: &str, name: &str) -> Result<&[Option<f64>]> {
        self.column(name)
            .ok_or_else(|| AnalysisError::missing_column(symbol, name))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }
}
