//! Period alignment and window aggregation.
//!
//! Income statements and balance sheets are not guaranteed to report the
//! same periods, quarterly figures need rolling up to trailing-twelve-month
//! values, and point events such as dividends need bucketing by year.

use bilan_traits::{Availability, Date, PeriodSeries, StatementTable, TimeSeries, UnavailableReason};
use chrono::{Datelike, TimeDelta};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Periods reported by both tables, in `a`'s most-recent-first order.
///
/// Periods found in only one table are dropped, never filled.
pub fn align(a: &StatementTable, b: &StatementTable) -> Vec<Date> {
    let other: HashSet<Date> = b.periods().iter().copied().collect();
    a.periods()
        .iter()
        .filter(|p| other.contains(p))
        .copied()
        .collect()
}

/// Sums the `n` most recent values of a most-recent-first slice.
///
/// With fewer than `n` values, sums what exists. Non-finite cells are
/// skipped.
///
/// ```
/// assert_eq!(bilan_metrics::window::ttm(&[10.0, 20.0, 30.0, 40.0, 50.0], 4), 100.0);
/// ```
pub fn ttm(values: &[f64], n: usize) -> f64 {
    values.iter().take(n).filter(|v| v.is_finite()).sum()
}

/// Trailing sum of a period series over its `n` most recent periods.
///
/// Unavailable when none of those periods holds a finite value.
pub fn ttm_series(series: &PeriodSeries, n: usize) -> Availability<f64> {
    let values = series.take_latest(n).values();
    if values.iter().any(|v| v.is_finite()) {
        Availability::Available(ttm(&values, n))
    } else {
        Availability::Unavailable(UnavailableReason::missing(format!(
            "no reported value in the latest {n} periods"
        )))
    }
}

/// Sum of events within one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearTotal {
    /// Calendar year.
    pub year: i32,
    /// Sum of the year's events; zero when there were none.
    pub total: f64,
}

/// A labelled bucket, as displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBucket {
    /// Year number or `"LTM"`.
    pub label: String,
    /// Bucket total.
    pub total: f64,
}

/// Point events rolled up into calendar years plus a trailing window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualizedEvents {
    /// Complete calendar years, oldest first.
    pub annual: Vec<YearTotal>,
    /// Sum over the last twelve months.
    pub ltm: f64,
}

impl AnnualizedEvents {
    /// Annual buckets followed by the `LTM` bucket.
    #[must_use]
    pub fn buckets(&self) -> Vec<EventBucket> {
        self.annual
            .iter()
            .map(|y| EventBucket {
                label: y.year.to_string(),
                total: y.total,
            })
            .chain(std::iter::once(EventBucket {
                label: "LTM".to_string(),
                total: self.ltm,
            }))
            .collect()
    }

    /// Annual totals as a chronological value sequence.
    #[must_use]
    pub fn annual_values(&self) -> Vec<f64> {
        self.annual.iter().map(|y| y.total).collect()
    }
}

/// Window sizes for [`EventWindow::annualize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    /// Number of complete calendar years reported (default: 4)
    pub years: usize,
    /// Length of the trailing window in days (default: 365)
    pub ltm_days: i64,
}

impl Default for EventWindow {
    fn default() -> Self {
        Self {
            years: 4,
            ltm_days: 365,
        }
    }
}

impl EventWindow {
    /// Buckets `events` by calendar year.
    ///
    /// Complete years are those strictly before the year of `as_of` (or, when
    /// `as_of` is `None`, of the latest event). The most recent `years` of
    /// them are reported oldest first, never starting before the year of the
    /// first event; years without events inside that span are zero.
    ///
    /// The LTM bucket sums events in `(as_of − ltm_days, as_of]`. Without an
    /// `as_of` date it sums the last four events.
    pub fn annualize(&self, events: &TimeSeries, as_of: Option<Date>) -> AnnualizedEvents {
        let (Some((first, _)), Some((last, _))) = (events.first(), events.last()) else {
            return AnnualizedEvents::default();
        };

        let reference_year = as_of.unwrap_or(last).year();
        let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
        for &(date, value) in events.points() {
            if value.is_finite() {
                *by_year.entry(date.year()).or_default() += value;
            }
        }

        let span = i32::try_from(self.years).unwrap_or(i32::MAX);
        let start = reference_year.saturating_sub(span).max(first.year());
        let annual = (start..reference_year)
            .map(|year| YearTotal {
                year,
                total: by_year.get(&year).copied().unwrap_or_default(),
            })
            .collect();

        let ltm = match as_of {
            Some(as_of) => {
                let window_start = TimeDelta::try_days(self.ltm_days)
                    .and_then(|days| as_of.checked_sub_signed(days))
                    .unwrap_or(Date::MIN);
                events
                    .points()
                    .iter()
                    .filter(|(d, v)| *d > window_start && *d <= as_of && v.is_finite())
                    .map(|(_, v)| v)
                    .sum()
            }
            None => events
                .points()
                .iter()
                .rev()
                .take(4)
                .filter(|(_, v)| v.is_finite())
                .map(|(_, v)| v)
                .sum(),
        };

        AnnualizedEvents { annual, ltm }
    }
}

/// [`EventWindow::annualize`] with the default four years and 365 days.
pub fn annualize_events(events: &TimeSeries, as_of: Option<Date>) -> AnnualizedEvents {
    EventWindow::default().annualize(events, as_of)
}
