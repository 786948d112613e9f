//! Compound annual growth rates.
//!
//! [`cagr`] is the scalar formula with its documented fallbacks. The
//! [`GrowthEngine`] applies it to a company's annual revenue, free cash
//! flow, diluted EPS and dividend history.

use crate::{
    config::MetricsConfig,
    items,
    resolve::{Resolution, resolve},
    window::{AnnualizedEvents, EventWindow},
};
use bilan_traits::{
    Availability, CompanyFinancials, Date, PeriodSeries, StatementTable, UnavailableReason,
};
use serde::Serialize;
use tracing::debug;

/// Compound growth rate per period between `start` and `end`.
///
/// - Standard case: `(end / start)^(1 / periods) − 1`.
/// - `start == 0` or `periods == 0`: `0.0`.
/// - `start < 0 < end` (loss to profit): the linear approximation
///   `(end − start) / |start| / periods`, since a geometric rate is undefined
///   across a sign change.
/// - Any other non-finite result (negative base under a fractional power):
///   `0.0`.
///
/// Use [`growth_rate`] to tell "no growth" apart from "undefined".
///
/// ```
/// use bilan_metrics::growth::cagr;
///
/// assert!((cagr(100.0, 200.0, 4.0) - 0.1892).abs() < 1e-4);
/// assert_eq!(cagr(0.0, 100.0, 4.0), 0.0);
/// assert_eq!(cagr(-50.0, 50.0, 2.0), 1.0);
/// ```
pub fn cagr(start: f64, end: f64, periods: f64) -> f64 {
    growth_rate(start, end, periods).unwrap_or(0.0)
}

/// Checked form of [`cagr`]: undefined cases are unavailable instead of zero.
pub fn growth_rate(start: f64, end: f64, periods: f64) -> Availability<f64> {
    if !start.is_finite() || !end.is_finite() || !periods.is_finite() {
        return Availability::Unavailable(UnavailableReason::missing("non-finite growth input"));
    }
    if start == 0.0 || periods == 0.0 {
        return Availability::Unavailable(UnavailableReason::indeterminate(
            "growth from zero or over zero periods",
        ));
    }
    if start < 0.0 && end > 0.0 {
        debug!(start, end, "sign change, using linear growth approximation");
        return Availability::finite((end - start) / start.abs() / periods, "linear growth");
    }
    Availability::finite((end / start).powf(1.0 / periods) - 1.0, "compound growth")
}

/// CAGR across a chronological sequence, from its first to its last finite
/// value. The period count is the index distance between the two.
pub fn cagr_of(values: &[f64]) -> Availability<f64> {
    let mut finite = values.iter().enumerate().filter(|(_, v)| v.is_finite());
    let Some((first_idx, &first)) = finite.next() else {
        return Availability::Unavailable(UnavailableReason::missing("no values"));
    };
    let Some((last_idx, &last)) = finite.last() else {
        return Availability::Unavailable(UnavailableReason::missing(
            "fewer than two values",
        ));
    };
    let periods = (last_idx - first_idx) as f64;
    growth_rate(first, last, periods)
}

/// Growth rates over the reported history of one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPanel {
    /// Annual revenue CAGR.
    pub revenue: Availability<f64>,
    /// Annual free-cash-flow CAGR.
    pub free_cash_flow: Availability<f64>,
    /// Annual diluted EPS CAGR.
    pub eps: Availability<f64>,
    /// CAGR of complete-year dividend totals.
    pub dividends: Availability<f64>,
    /// Dividends per calendar year plus the LTM bucket.
    pub dividend_history: AnnualizedEvents,
}

/// Growth engine over annual statements and dividend events.
#[derive(Debug, Clone, Default)]
pub struct GrowthEngine {
    config: MetricsConfig,
}

impl GrowthEngine {
    /// Create a new engine with the given configuration.
    #[must_use]
    pub const fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Computes every growth rate of the panel.
    ///
    /// Free cash flow uses the reported row when present, otherwise
    /// operating cash flow minus the absolute capital expenditure.
    pub fn panel(&self, company: &CompanyFinancials, as_of: Option<Date>) -> GrowthPanel {
        let annual = &company.annual;
        let window = EventWindow {
            years: self.config.dividend_years,
            ltm_days: self.config.ltm_days,
        };
        let dividend_history = window.annualize(&company.dividends, as_of);
        let dividends = if dividend_history.annual.is_empty() {
            Availability::Unavailable(UnavailableReason::missing("no complete dividend year"))
        } else {
            cagr_of(&dividend_history.annual_values())
        };

        GrowthPanel {
            revenue: series_cagr(&resolve(&annual.income, &items::TOTAL_REVENUE)),
            free_cash_flow: free_cash_flow(&annual.cash_flow)
                .and_then(|series| cagr_of(&chronological_values(&series))),
            eps: series_cagr(&resolve(&annual.income, &items::DILUTED_EPS)),
            dividends,
            dividend_history,
        }
    }
}

fn chronological_values(series: &PeriodSeries) -> Vec<f64> {
    series.chronological().into_iter().map(|(_, v)| v).collect()
}

fn series_cagr(resolution: &Resolution) -> Availability<f64> {
    if resolution.is_resolved() {
        cagr_of(&chronological_values(resolution.series()))
    } else {
        Availability::Unavailable(UnavailableReason::missing("line item not reported"))
    }
}

fn free_cash_flow(cash_flow: &StatementTable) -> Availability<PeriodSeries> {
    let reported = resolve(cash_flow, &items::FREE_CASH_FLOW);
    if reported.is_resolved() {
        return Availability::Available(reported.into_series());
    }
    let operating = resolve(cash_flow, &items::OPERATING_CASH_FLOW);
    let capex = resolve(cash_flow, &items::CAPITAL_EXPENDITURE);
    if operating.is_resolved() && capex.is_resolved() {
        debug!("free cash flow not reported, using operating cash flow minus capex");
        Availability::Available(
            operating
                .series()
                .zip_with(capex.series(), |ocf, capex| ocf - capex.abs()),
        )
    } else {
        Availability::Unavailable(UnavailableReason::missing("free cash flow"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(100.0, 200.0, 4.0, 0.189_207)]
    #[case(0.0, 100.0, 4.0, 0.0)]
    #[case(100.0, 200.0, 0.0, 0.0)]
    #[case(-50.0, 50.0, 2.0, 1.0)]
    #[case(-100.0, -50.0, 0.5, -0.75)]
    #[case(100.0, -50.0, 3.0, 0.0)]
    #[case(100.0, 100.0, 3.0, 0.0)]
    fn test_cagr(
        #[case] start: f64,
        #[case] end: f64,
        #[case] periods: f64,
        #[case] expected: f64,
    ) {
        assert_relative_eq!(cagr(start, end, periods), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_growth_rate_distinguishes_undefined() {
        assert!(!growth_rate(0.0, 100.0, 4.0).is_available());
        assert_eq!(growth_rate(100.0, 100.0, 4.0), Availability::Available(0.0));
        assert!(matches!(
            growth_rate(100.0, -50.0, 3.0).reason(),
            Some(UnavailableReason::Indeterminate(_))
        ));
    }

    #[test]
    fn test_cagr_of_skips_missing_ends() {
        let values = [f64::NAN, 100.0, 120.0, 150.0, 200.0, f64::NAN];
        // 100 -> 200 over 3 periods
        assert_relative_eq!(
            cagr_of(&values).unwrap_or(f64::NAN),
            2f64.powf(1.0 / 3.0) - 1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_cagr_of_needs_two_values() {
        assert!(!cagr_of(&[]).is_available());
        assert!(!cagr_of(&[5.0]).is_available());
        assert!(!cagr_of(&[f64::NAN, 5.0, f64::NAN]).is_available());
    }

    fn fy(year: i32) -> Date {
        Date::from_ymd_opt(year, 12, 31).unwrap()
    }

    fn company() -> CompanyFinancials {
        use bilan_traits::{CompanyProfile, LineItem, TimeSeries};

        let periods = vec![fy(2024), fy(2023), fy(2022)];
        let mut company = CompanyFinancials::new(CompanyProfile::new("ACME"));
        company.annual.income = StatementTable::new(
            periods.clone(),
            vec![
                LineItem::new("Total Revenue", vec![144.0, 120.0, 100.0]),
                LineItem::new("Diluted EPS", vec![2.0, 1.0, -1.0]),
            ],
        )
        .unwrap();
        company.annual.cash_flow = StatementTable::new(
            periods,
            vec![
                LineItem::new("Operating Cash Flow", vec![60.0, 45.0, 30.0]),
                LineItem::new("Capital Expenditure", vec![-20.0, -15.0, -10.0]),
            ],
        )
        .unwrap();
        company.dividends = TimeSeries::new(vec![
            (Date::from_ymd_opt(2022, 6, 1).unwrap(), 1.0),
            (Date::from_ymd_opt(2023, 6, 1).unwrap(), 1.1),
            (Date::from_ymd_opt(2024, 6, 1).unwrap(), 1.21),
        ]);
        company
    }

    #[test]
    fn test_growth_panel() {
        let as_of = Date::from_ymd_opt(2025, 3, 1).unwrap();
        let panel = GrowthEngine::default().panel(&company(), Some(as_of));
        assert_relative_eq!(panel.revenue.unwrap_or(f64::NAN), 0.2, epsilon = 1e-12);
        // FCF 20 -> 40 over two years
        assert_relative_eq!(
            panel.free_cash_flow.unwrap_or(f64::NAN),
            2f64.sqrt() - 1.0,
            epsilon = 1e-12
        );
        // EPS -1 -> 2: linear approximation (2 + 1) / 1 / 2
        assert_relative_eq!(panel.eps.unwrap_or(f64::NAN), 1.5, epsilon = 1e-12);
        assert_relative_eq!(panel.dividends.unwrap_or(f64::NAN), 0.1, epsilon = 1e-9);
        assert_eq!(panel.dividend_history.annual.len(), 3);
    }

    #[test]
    fn test_growth_panel_without_data() {
        let empty = CompanyFinancials::default();
        let panel = GrowthEngine::default().panel(&empty, None);
        assert!(!panel.revenue.is_available());
        assert!(!panel.free_cash_flow.is_available());
        assert!(!panel.dividends.is_available());
    }
}
