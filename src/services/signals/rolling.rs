//! Rolling-window primitives shared by the detectors.
//!
//! Every function returns one entry per input value. `None` marks positions
//! without enough history and never counts as a signal.

use crate::types::Column;

/// Trailing window ending at `index`, at most `window` long.
fn trailing(values: &[f64], index: usize, window: usize) -> &[f64] {
    let start = (index + 1).saturating_sub(window);
    &values[start..=index]
}

/// Mean shifted by the first element so identical inputs average exactly.
fn shifted_mean(slice: &[f64]) -> f64 {
    let k = slice[0];
    k + slice.iter().map(|v| v - k).sum::<f64>() / slice.len() as f64
}

/// Rolling mean over a trailing window, defined once `min_periods` values are available.
pub fn rolling_mean(values: &[f64], window: usize, min_periods: usize) -> Column {
    let min_periods = min_periods.max(1);
    (0..values.len())
        .map(|i| {
            let slice = trailing(values, i, window);
            (window > 0 && slice.len() >= min_periods).then(|| shifted_mean(slice))
        })
        .collect()
}

/// Rolling sample standard deviation (n - 1 denominator) over full windows.
pub fn rolling_std(values: &[f64], window: usize) -> Column {
    (0..values.len())
        .map(|i| {
            if window < 2 || i + 1 < window {
                return None;
            }
            let slice = trailing(values, i, window);
            let k = slice[0];
            let n = slice.len() as f64;
            let sum: f64 = slice.iter().map(|v| v - k).sum();
            let sum_sq: f64 = slice.iter().map(|v| (v - k).powi(2)).sum();
            let variance = ((sum_sq - sum * sum / n) / (n - 1.0)).max(0.0);
            Some(variance.sqrt())
        })
        .collect()
}

/// Rolling maximum over a trailing window.
pub fn rolling_max(values: &[f64], window: usize, min_periods: usize) -> Column {
    let min_periods = min_periods.max(1);
    (0..values.len())
        .map(|i| {
            let slice = trailing(values, i, window);
            (window > 0 && slice.len() >= min_periods)
                .then(|| slice.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        })
        .collect()
}

/// Exponentially weighted mean with bias-adjusted weights, defined from the first value.
///
/// Weights are `(1 - alpha)^i` over all history with `alpha = 2 / (span + 1)`,
/// normalised by their sum at every step.
pub fn ewm_mean(values: &[f64], span: usize) -> Column {
    let alpha = 2.0 / (span.max(1) as f64 + 1.0);
    let decay = 1.0 - alpha;
    let mut weight_sum = 0.0;
    let mut mean = 0.0;

    values
        .iter()
        .map(|&v| {
            weight_sum = 1.0 + decay * weight_sum;
            mean += (v - mean) / weight_sum;
            Some(mean)
        })
        .collect()
}

/// Lift a plain series into a fully defined column.
pub fn defined(values: &[f64]) -> Column {
    values.iter().copied().map(Some).collect()
}

/// Shift a column forward one period; the first entry becomes undefined.
pub fn shift(column: &[Option<f64>]) -> Column {
    if column.is_empty() {
        return Vec::new();
    }
    std::iter::once(None)
        .chain(column[..column.len() - 1].iter().copied())
        .collect()
}

/// Period-over-period percent change.
pub fn pct_change(values: &[f64]) -> Column {
    (0..values.len())
        .map(|i| {
            if i == 0 || values[i - 1] == 0.0 {
                None
            } else {
                Some(values[i] / values[i - 1] - 1.0)
            }
        })
        .collect()
}

/// Indices where `fast` moves strictly above `slow` after not being above on the prior row.
///
/// All four values involved must be defined, so the first row never fires.
pub fn upward_crosses(fast: &[Option<f64>], slow: &[Option<f64>]) -> Vec<usize> {
    let n = fast.len().min(slow.len());
    (1..n)
        .filter(|&i| match (fast[i], slow[i], fast[i - 1], slow[i - 1]) {
            (Some(f), Some(s), Some(pf), Some(ps)) => f > s && !(pf > ps),
            _ => false,
        })
        .collect()
}
