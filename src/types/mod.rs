pub mod backtest;
pub mod series;
pub mod signals;

pub use backtest::*;
pub use series::*;
pub use signals::*;
