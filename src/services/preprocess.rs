//! Standard derived columns attached before analysis.

use crate::error::Result;
use crate::services::signals::rolling::rolling_mean;
use crate::types::{long_ma_column, rsi_column, short_ma_column, Column, PriceSeries};

pub const SHORT_MA_WINDOW: usize = 50;
pub const LONG_MA_WINDOW: usize = 200;
pub const RSI_PERIOD: usize = 14;

/// Simple moving average, undefined until a full window is available.
pub fn sma(values: &[f64], window: usize) -> Column {
    rolling_mean(values, window, window)
}

/// Wilder-smoothed RSI.
///
/// The first value appears once `period` price changes are available; the
/// seed averages are plain means, later ones use `(prev * (period - 1) + x) / period`.
/// With no losses the RSI is 100, with neither gains nor losses it is 50.
pub fn rsi(values: &[f64], period: usize) -> Column {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period + 1 {
        return out;
    }

    let mut gains = Vec::with_capacity(values.len() - 1);
    let mut losses = Vec::with_capacity(values.len() - 1);
    for i in 1..values.len() {
        let change = values[i] - values[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    let mut avg_gain: f64 = gains.iter().take(period).sum::<f64>() / period as f64;
    let mut avg_loss: f64 = losses.iter().take(period).sum::<f64>() / period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        out[i + 1] = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Attach `{symbol}_50_day_ma`, `{symbol}_200_day_ma` and `{symbol}_rsi`.
pub fn with_standard_columns(series: PriceSeries, symbol: &str) -> Result<PriceSeries> {
    let closes = series.closes();
    series
        .with_column(short_ma_column(symbol), sma(&closes, SHORT_MA_WINDOW))?
        .with_column(long_ma_column(symbol), sma(&closes, LONG_MA_WINDOW))?
        .with_column(rsi_column(symbol), rsi(&closes, RSI_PERIOD))
}
