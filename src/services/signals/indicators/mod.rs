//! Indicator-based detectors.

pub mod bollinger;
pub mod breakout;
pub mod ema;
pub mod ma_crossover;
pub mod rsi;
pub mod volume;

pub use bollinger::{bollinger_bands, BollingerBands};
pub use breakout::{breakouts, Breakouts};
pub use ema::{exponential_moving_average, ExponentialMovingAverage};
pub use ma_crossover::{moving_average_crossover, MovingAverageCrossover};
pub use rsi::{rsi_oversold, RsiOversold};
pub use volume::{volume_spikes, VolumeSpikes};
