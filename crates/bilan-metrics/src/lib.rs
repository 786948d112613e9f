//! Financial metric engines for bilan.
//!
//! This crate turns the statement tables of a [`bilan_traits::CompanyFinancials`]
//! into headline metrics:
//! - Profitability: net margin, ROE, ROIC with NOPAT and invested capital
//! - Valuation: PER and PEG read against sector thresholds
//! - Growth: revenue, free cash flow, EPS and dividend CAGR
//! - Momentum: year-to-date performance and RSI
//!
//! Every metric that cannot be computed is reported as
//! [`bilan_traits::Availability::Unavailable`] with a reason, never as a zero.
//!
//! # Example
//!
//! ```
//! use bilan_metrics::{MetricsConfig, registry::get_metric_info};
//!
//! let config = MetricsConfig::default();
//! let roic = get_metric_info("roic").unwrap();
//! assert!(roic.policy().is_ok());
//! assert_eq!(config.rsi_window, 14);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod classify;
pub mod config;
pub mod growth;
pub mod headline;
pub mod items;
pub mod momentum;
pub mod nopat;
pub mod normalize;
pub mod profitability;
pub mod registry;
pub mod resolve;
pub mod sector;
pub mod window;

// Re-export key types
pub use classify::{
    Classification, Direction, Gauge, GaugeReading, StatusLabels, ThresholdPolicy, Tier,
};
pub use config::MetricsConfig;
pub use growth::{GrowthEngine, GrowthPanel};
pub use headline::{all_metrics, metric_by_name};
pub use profitability::{ProfitabilityEngine, ProfitabilityHistory, ProfitabilitySnapshot};
pub use registry::{MetricCategory, MetricInfo};
pub use sector::SectorThresholds;
