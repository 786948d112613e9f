//! Price momentum and performance indicators.
//!
//! - YTD: percent change since the prior calendar year's last close
//! - RSI: relative strength index over simple moving averages of gains and losses

mod rsi;
mod ytd;

pub use rsi::{Rsi, RsiConfig, rsi};
pub use ytd::{YtdPerformance, YtdReference, ytd};
