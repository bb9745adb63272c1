use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How many units a held signal represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSizing {
    /// One unit of the asset while the signal is held.
    SingleUnit,
    /// Every entry spends all available cash.
    #[default]
    FullyInvested,
}

impl PositionSizing {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "single_unit" | "single" | "unit" => Some(Self::SingleUnit),
            "fully_invested" | "full" | "all_in" => Some(Self::FullyInvested),
            _ => None,
        }
    }
}

/// Confusion-matrix counts over entry/exit trades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeCounts {
    /// Entries followed by a rising price.
    pub true_positive: u32,
    /// Entries followed by a falling price.
    pub false_positive: u32,
    /// Exits followed by a rising price.
    pub false_negative: u32,
    /// Exits followed by a falling price.
    pub true_negative: u32,
}

impl TradeCounts {
    pub fn total(&self) -> u32 {
        self.true_positive + self.false_positive + self.false_negative + self.true_negative
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }
}

/// Zero when the denominator is zero.
fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(numerator) / f64::from(denominator)
    }
}

/// One row of the simulated portfolio ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRow {
    pub date: NaiveDate,
    /// Held state: 1 while the short average is above the long one.
    pub signal: i8,
    /// +1 enter, -1 exit, 0 hold.
    pub position_change: i8,
    pub units: f64,
    pub holdings: f64,
    pub cash: f64,
    pub total: f64,
    /// Percent change of `total` from the previous row.
    pub returns: Option<f64>,
}

/// Performance of the crossover strategy over a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestReport {
    pub final_portfolio_value: f64,
    pub roi: f64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub trades: TradeCounts,
}
