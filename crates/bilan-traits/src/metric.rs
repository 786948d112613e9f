//! Metric trait for computing headline indicators.
//!
//! A [`Metric`] turns one company's financials into a single scalar, such as
//! net margin or RSI. Metrics that cannot be computed from the data at hand
//! report [`Availability::Unavailable`] rather than an error.

use crate::{Availability, CompanyFinancials, Date, Result};

/// A headline indicator computed from a company's financials.
///
/// Implementations must be thread-safe (`Send + Sync`) so a set of metrics
/// can be evaluated in parallel.
///
/// # Example
///
/// ```
/// use bilan_traits::{Availability, CompanyFinancials, Date, Metric, Result};
///
/// struct LastClose;
///
/// impl Metric for LastClose {
///     fn name(&self) -> &str {
///         "last_close"
///     }
///
///     fn description(&self) -> &str {
///         "Most recent closing price"
///     }
///
///     fn compute(&self, company: &CompanyFinancials, _as_of: Date) -> Result<Availability<f64>> {
///         Ok(Availability::from_option(
///             company.prices.last().map(|(_, close)| close),
///             bilan_traits::UnavailableReason::missing("prices"),
///         ))
///     }
/// }
/// ```
pub trait Metric: Send + Sync {
    /// Unique identifier, e.g. `"roic"`.
    fn name(&self) -> &str;

    /// One-line human description.
    fn description(&self) -> &str;

    /// Computes the metric as of `as_of`.
    ///
    /// # Errors
    ///
    /// Returns an error only for contract violations such as invalid
    /// configuration. Missing or degenerate data yields
    /// `Ok(Availability::Unavailable(_))`.
    fn compute(&self, company: &CompanyFinancials, as_of: Date) -> Result<Availability<f64>>;
}
