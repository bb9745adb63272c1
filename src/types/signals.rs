use crate::error::{AnalysisError, Result};
use crate::types::Column;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The nine bullish detectors combined by the score aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    MovingAverageCrossover,
    RsiOversold,
    VolumeSpikes,
    Breakouts,
    BollingerBands,
    ExponentialMovingAverage,
    CupAndHandle,
    AscendingTriangle,
    InverseHeadAndShoulders,
}

impl Indicator {
    pub const ALL: [Indicator; 9] = [
        Indicator::MovingAverageCrossover,
        Indicator::RsiOversold,
        Indicator::VolumeSpikes,
        Indicator::Breakouts,
        Indicator::BollingerBands,
        Indicator::ExponentialMovingAverage,
        Indicator::CupAndHandle,
        Indicator::AscendingTriangle,
        Indicator::InverseHeadAndShoulders,
    ];

    /// Stable identifier, also used as the weight-map key.
    pub fn id(&self) -> &'static str {
        match self {
            Indicator::MovingAverageCrossover => "moving_average_crossover",
            Indicator::RsiOversold => "rsi_oversold",
            Indicator::VolumeSpikes => "volume_spikes",
            Indicator::Breakouts => "breakouts",
            Indicator::BollingerBands => "bollinger_bands",
            Indicator::ExponentialMovingAverage => "exponential_moving_average",
            Indicator::CupAndHandle => "cup_and_handle",
            Indicator::AscendingTriangle => "ascending_triangle",
            Indicator::InverseHeadAndShoulders => "inverse_head_and_shoulders",
        }
    }

    pub fn category(&self) -> SignalCategory {
        match self {
            Indicator::MovingAverageCrossover | Indicator::ExponentialMovingAverage => {
                SignalCategory::Trend
            }
            Indicator::RsiOversold => SignalCategory::Momentum,
            Indicator::VolumeSpikes | Indicator::Breakouts => SignalCategory::Volume,
            Indicator::BollingerBands => SignalCategory::Volatility,
            Indicator::CupAndHandle
            | Indicator::AscendingTriangle
            | Indicator::InverseHeadAndShoulders => SignalCategory::Pattern,
        }
    }

    /// Parse from the identifier.
    pub fn from_id(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|i| i.id() == s)
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Category of a detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Trend,
    Momentum,
    Volatility,
    Volume,
    Pattern,
}

/// Ordered dates at which one detector fired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalSet(Vec<NaiveDate>);

impl SignalSet {
    /// Build from dates, sorting and dropping duplicates.
    pub fn from_dates(mut dates: Vec<NaiveDate>) -> Self {
        dates.sort();
        dates.dedup();
        Self(dates)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Dates no older than `days` before `now`.
    ///
    /// A window reaching past the earliest representable date keeps everything.
    pub fn within(&self, now: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> + '_ {
        let cutoff = now.checked_sub_signed(Duration::days(i64::from(days)));
        self.0
            .iter()
            .copied()
            .filter(move |d| cutoff.map_or(true, |c| *d >= c))
    }
}

/// A completed chart pattern spanning `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A derived series returned for display alongside a detector's dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub name: String,
    pub values: Column,
}

/// Uniform detector result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectorOutput {
    pub indicator: Indicator,
    pub signal_dates: SignalSet,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub auxiliary: Vec<NamedSeries>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub pattern_spans: Vec<PatternMatch>,
}

impl DetectorOutput {
    pub fn new(indicator: Indicator, signal_dates: SignalSet) -> Self {
        Self {
            indicator,
            signal_dates,
            auxiliary: Vec::new(),
            pattern_spans: Vec::new(),
        }
    }

    pub fn with_series(mut self, name: impl Into<String>, values: Column) -> Self {
        self.auxiliary.push(NamedSeries {
            name: name.into(),
            values,
        });
        self
    }

    pub fn with_spans(mut self, spans: Vec<PatternMatch>) -> Self {
        self.pattern_spans = spans;
        self
    }

    /// Auxiliary series by name.
    pub fn series(&self, name: &str) -> Option<&[Option<f64>]> {
        self.auxiliary
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.values.as_slice())
    }
}

/// Per-indicator weights in [0, 1]. Indicators without an entry weigh nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightMap(BTreeMap<Indicator, f64>);

impl WeightMap {
    /// Empty map.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Weight 1 for every indicator.
    pub fn uniform() -> Self {
        Self(Indicator::ALL.into_iter().map(|i| (i, 1.0)).collect())
    }

    pub fn set(&mut self, indicator: Indicator, weight: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(AnalysisError::InvalidWeight {
                indicator: indicator.id().to_string(),
                weight,
            });
        }
        self.0.insert(indicator, weight);
        Ok(())
    }

    pub fn with(mut self, indicator: Indicator, weight: f64) -> Result<Self> {
        self.set(indicator, weight)?;
        Ok(self)
    }

    /// Build from `(identifier, weight)` pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut map = Self::new();
        for (name, weight) in pairs {
            let indicator = Indicator::from_id(name)
                .ok_or_else(|| AnalysisError::UnknownIndicator(name.to_string()))?;
            map.set(indicator, weight)?;
        }
        Ok(map)
    }

    /// Build from 0-100 percentages, as entered in a form.
    pub fn from_percentages<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        Self::from_pairs(pairs.into_iter().map(|(name, pct)| (name, pct / 100.0)))
    }

    pub fn get(&self, indicator: Indicator) -> f64 {
        self.0.get(&indicator).copied().unwrap_or(0.0)
    }

    /// Sum of every supplied weight.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for WeightMap {
    fn default() -> Self {
        Self::uniform()
    }
}

/// One indicator's share of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorScore {
    /// At least one signal date fell inside the window.
    pub fired: bool,
    pub weight: f64,
    /// `weight` when fired, else 0.
    pub contribution: f64,
}

/// Composite bullish score for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub per_indicator: BTreeMap<Indicator, IndicatorScore>,
    /// Sum of contributions over sum of weights, in [0, 1].
    pub overall_score: f64,
    pub triggering_dates: BTreeSet<NaiveDate>,
}

impl ScoreReport {
    pub fn contribution(&self, indicator: Indicator) -> f64 {
        self.per_indicator
            .get(&indicator)
            .map(|s| s.contribution)
            .unwrap_or(0.0)
    }

    pub fn fired(&self, indicator: Indicator) -> bool {
        self.per_indicator
            .get(&indicator)
            .map(|s| s.fired)
            .unwrap_or(false)
    }
}

/// Trade recommendation derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Trade")]
    Trade,
    #[serde(rename = "Don't Trade")]
    DontTrade,
}

impl Recommendation {
    /// Strictly above one half trades; a tie does not.
    pub fn from_score(score: f64) -> Self {
        if score > 0.5 {
            Recommendation::Trade
        } else {
            Recommendation::DontTrade
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Trade => "Trade",
            Recommendation::DontTrade => "Don't Trade",
        }
    }
}

/// Scored analysis of one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub symbol: String,
    pub per_indicator: BTreeMap<Indicator, f64>,
    pub overall_score: f64,
    pub recommendation: Recommendation,
    pub triggering_dates: BTreeSet<NaiveDate>,
    pub as_of: NaiveDate,
}

/// A symbol that could not be analysed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolError {
    pub symbol: String,
    pub error: String,
}

/// Results of a multi-symbol run: successes and failures side by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<AnalysisResult>,
    pub errors: Vec<SymbolError>,
}

impl BatchReport {
    /// Symbols recommended for trading.
    pub fn tradeable(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.results
            .iter()
            .filter(|r| r.recommendation == Recommendation::Trade)
    }
}
