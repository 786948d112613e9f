//! Year-to-date price performance.

use bilan_traits::{Availability, Date, TimeSeries, UnavailableReason};
use chrono::Datelike;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which close served as the YTD reference price.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YtdReference {
    /// Last close of the prior calendar year.
    #[display("prior-year close")]
    PriorYearClose,
    /// First close of the current year, for listings younger than the year.
    #[display("first close of the year")]
    FirstCloseOfYear,
}

/// Year-to-date performance and how it was measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YtdPerformance {
    /// Change since the reference close, in percent.
    pub percent: f64,
    /// Price the change is measured against.
    pub reference_price: f64,
    /// Date of the reference close.
    pub reference_date: Date,
    /// How the reference was chosen.
    pub reference: YtdReference,
    /// Price the change is measured to.
    pub current_price: f64,
}

/// Percent change of `current_price` since the prior calendar year's close.
///
/// The reference is the last close dated in the year before `as_of`. For a
/// listing with no prior-year data, the first close of `as_of`'s year is used
/// instead. Closes after `as_of` are ignored. When `current_price` is `None`
/// or not a positive price, the latest close up to `as_of` is used.
///
/// Unavailable when no reference or current price exists, or when the
/// reference is zero.
pub fn ytd(
    prices: &TimeSeries,
    current_price: Option<f64>,
    as_of: Date,
) -> Availability<YtdPerformance> {
    let year = as_of.year();
    let history = prices.filter(|d| d <= as_of);

    let prior_year_close = history
        .points()
        .iter()
        .rev()
        .find(|(d, v)| d.year() == year - 1 && v.is_finite())
        .map(|&(d, v)| (d, v, YtdReference::PriorYearClose));
    let reference = prior_year_close.or_else(|| {
        debug!(year, "no prior-year close, falling back to first close of the year");
        history
            .points()
            .iter()
            .find(|(d, v)| d.year() == year && v.is_finite())
            .map(|&(d, v)| (d, v, YtdReference::FirstCloseOfYear))
    });
    let Some((reference_date, reference_price, reference)) = reference else {
        return Availability::Unavailable(UnavailableReason::missing(format!(
            "no close in {} or {year}",
            year - 1
        )));
    };

    let current = current_price
        .filter(|p| p.is_finite() && *p > 0.0)
        .or_else(|| history.last().map(|(_, v)| v).filter(|v| v.is_finite()));
    let Some(current_price) = current else {
        return Availability::Unavailable(UnavailableReason::missing("current price"));
    };

    if reference_price == 0.0 {
        return Availability::Unavailable(UnavailableReason::indeterminate(
            "reference close is zero",
        ));
    }

    Availability::Available(YtdPerformance {
        percent: (current_price - reference_price) / reference_price * 100.0,
        reference_price,
        reference_date,
        reference,
        current_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_uses_last_prior_year_close() {
        let prices = TimeSeries::new(vec![
            (d(2023, 12, 28), 95.0),
            (d(2023, 12, 29), 100.0),
            (d(2024, 1, 2), 102.0),
            (d(2024, 3, 1), 110.0),
        ]);
        let perf = ytd(&prices, Some(120.0), d(2024, 3, 1)).into_option().unwrap();
        assert_eq!(perf.reference, YtdReference::PriorYearClose);
        assert_eq!(perf.reference_date, d(2023, 12, 29));
        assert_relative_eq!(perf.percent, 20.0);
    }

    #[test]
    fn test_ipo_fallback_to_first_close() {
        let prices = TimeSeries::new(vec![(d(2024, 2, 1), 50.0), (d(2024, 2, 2), 55.0)]);
        let perf = ytd(&prices, Some(60.0), d(2024, 6, 1)).into_option().unwrap();
        assert_eq!(perf.reference, YtdReference::FirstCloseOfYear);
        assert_relative_eq!(perf.percent, 20.0);
    }

    #[test]
    fn test_latest_close_when_no_current_price() {
        let prices = TimeSeries::new(vec![
            (d(2023, 12, 29), 100.0),
            (d(2024, 1, 2), 90.0),
            (d(2024, 1, 3), 999.0),
        ]);
        let perf = ytd(&prices, None, d(2024, 1, 2)).into_option().unwrap();
        assert_eq!(perf.current_price, 90.0);
        assert_relative_eq!(perf.percent, -10.0);
    }

    #[test]
    fn test_zero_current_price_falls_back_to_close() {
        let prices = TimeSeries::new(vec![(d(2023, 12, 29), 100.0), (d(2024, 2, 1), 105.0)]);
        let perf = ytd(&prices, Some(0.0), d(2024, 3, 1)).into_option().unwrap();
        assert_eq!(perf.current_price, 105.0);
        assert_relative_eq!(perf.percent, 5.0);
    }

    #[test]
    fn test_unavailable_cases() {
        assert!(!ytd(&TimeSeries::empty(), Some(10.0), d(2024, 1, 5)).is_available());

        let stale = TimeSeries::new(vec![(d(2020, 5, 1), 10.0)]);
        assert!(!ytd(&stale, Some(10.0), d(2024, 1, 5)).is_available());

        let zero = TimeSeries::new(vec![(d(2023, 12, 29), 0.0)]);
        assert!(!ytd(&zero, Some(10.0), d(2024, 1, 5)).is_available());
    }

    #[test]
    fn test_unavailable_reads_as_zero() {
        let percent = ytd(&TimeSeries::empty(), None, d(2024, 1, 5))
            .map(|p| p.percent)
            .unwrap_or(0.0);
        assert_eq!(percent, 0.0);
    }
}
