#![doc(issue_tracker_base_url = "https://github.com/factordynamics/bilan/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core value types and trait definitions for the bilan workspace.
//!
//! This crate provides the statement, series and availability types shared by
//! every metric engine, along with the [`Metric`] trait and the error type.
//!
//! - [`StatementTable`]: named line items × reporting periods, most recent first
//! - [`PeriodSeries`] / [`TimeSeries`]: period-keyed and date-keyed values
//! - [`CompanyProfile`] / [`CompanyFinancials`]: the per-company input bundle
//! - [`Availability`]: a computed value, or the reason it could not be computed

/// The version of the bilan-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod availability;
pub mod error;
pub mod metric;
pub mod series;
pub mod statement;
pub mod types;

// Re-exports
pub use availability::{Availability, UnavailableReason};
pub use error::{BilanError, Result};
pub use metric::Metric;
pub use series::{PeriodSeries, TimeSeries, parse_iso_date};
pub use statement::{LINE_ITEM_COLUMN, LineItem, StatementTable};
pub use types::{
    CompanyFinancials, CompanyProfile, Date, Frequency, StatementKind, StatementSet, Symbol,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
