#![doc(issue_tracker_base_url = "https://github.com/factordynamics/bilan/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # bilan
//!
//! Financial statement metrics for a single company: profitability ratios,
//! valuation gauges, growth rates and price momentum, each classified into a
//! good / mid / bad traffic light.
//!
//! bilan is an umbrella crate re-exporting the workspace crates:
//!
//! - `bilan-traits`: statement tables, series, `Availability` and errors
//! - `bilan-metrics`: the metric engines, registry and classification
//! - `bilan-fmp`: Financial Modeling Prep data provider
//!
//! Values that cannot be computed are reported as unavailable with a reason,
//! never as zero.
//!
//! ```rust,ignore
//! use bilan::{Dashboard, MetricsConfig, fmp::FmpClient};
//!
//! let client = FmpClient::from_env()?;
//! let company = client.company("AAPL", 5, as_of).await?;
//! let report = Dashboard::new(MetricsConfig::default())?.analyze(&company, as_of)?;
//! for reading in &report.headline {
//!     println!("{}: {}", reading.title, reading.classification.status);
//! }
//! ```

/// Version information for the bilan crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod dashboard;

pub use dashboard::{
    Dashboard, DashboardReport, MetricReading, PEG_GAUGE_RANGE, PER_GAUGE_RANGE,
    ProfitabilityPanel, ValuationPanel,
};

// ============================================================================
// Core Types
// ============================================================================

/// Core types for bilan.
///
/// Statement tables, period and time series, company bundles, the
/// [`Metric`] trait and the [`Availability`] result type.
pub mod traits {
    pub use bilan_traits::*;
}

pub use bilan_traits::{Availability, BilanError, Metric, Result, UnavailableReason};
pub use bilan_traits::{CompanyFinancials, CompanyProfile, Date, StatementTable, Symbol};

// ============================================================================
// Metric Engines
// ============================================================================

/// Metric engines.
///
/// ## Profitability
///
/// - **Net margin**: net income / revenue
/// - **ROE**: net income / equity
/// - **ROIC**: NOPAT / (debt + equity − cash)
///
/// ## Growth
///
/// Compound annual growth of revenue, free cash flow, diluted EPS and
/// complete-year dividends.
///
/// ## Momentum
///
/// Year-to-date performance against the prior-year close, and the RSI.
///
/// # Example
///
/// ```
/// use bilan::metrics::growth::cagr;
///
/// let rate = cagr(100.0, 121.0, 2.0);
/// assert!((rate - 0.1).abs() < 1e-12);
/// ```
pub mod metrics {
    pub use bilan_metrics::*;
}

pub use bilan_metrics::{MetricsConfig, Tier};

// ============================================================================
// Data Providers
// ============================================================================

/// Financial Modeling Prep (FMP) data provider.
///
/// ## Setup
///
/// 1. Get a free API key at <https://financialmodelingprep.com/>
/// 2. Set the `FMP_API_KEY` environment variable or add to `.env` file
///
/// ## Example
///
/// ```ignore
/// use bilan::fmp::FmpClient;
///
/// let client = FmpClient::from_env()?;
/// let company = client.company("AAPL", 5, as_of).await?;
/// ```
pub mod fmp {
    pub use bilan_fmp::*;
}

/// Prelude module for convenient imports.
///
/// ```ignore
/// use bilan::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Availability, BilanError, CompanyFinancials, CompanyProfile, Dashboard, DashboardReport,
        Date, Metric, MetricsConfig, Result, Tier,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_re_exports() {
        fn _accept_metric(_metric: &dyn Metric) {}
        let _config = MetricsConfig::default();
        let _error: BilanError = BilanError::InvalidData("test".to_string());
        let _result: Result<()> = Ok(());
    }
}
