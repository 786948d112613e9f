//! Period-keyed and date-keyed numeric series.
//!
//! [`PeriodSeries`] holds one value per reporting period, most recent first,
//! matching the column order of a [`StatementTable`](crate::StatementTable).
//! [`TimeSeries`] holds dated observations (daily closes, dividend events) in
//! ascending chronological order.

use crate::{BilanError, Date, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One numeric value per reporting period, most recent period first.
///
/// A `NaN` value marks a cell the provider left empty. Periods that were
/// never reported are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSeries {
    points: Vec<(Date, f64)>,
}

impl PeriodSeries {
    /// Builds a series from `(period, value)` pairs in any order.
    ///
    /// # Errors
    ///
    /// Returns [`BilanError::InvalidData`] if a period appears twice.
    pub fn new(mut points: Vec<(Date, f64)>) -> Result<Self> {
        points.sort_by(|a, b| b.0.cmp(&a.0));
        if let Some(pair) = points.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(BilanError::InvalidData(format!(
                "duplicate period {} in series",
                pair[0].0
            )));
        }
        Ok(Self { points })
    }

    /// Builds a series from pairs already ordered most recent first with
    /// unique periods.
    pub(crate) const fn from_sorted(points: Vec<(Date, f64)>) -> Self {
        Self { points }
    }

    /// A series holding `value` for every period in `periods`.
    pub fn constant(periods: &[Date], value: f64) -> Self {
        Self {
            points: periods.iter().map(|&p| (p, value)).collect(),
        }
    }

    /// An empty series.
    pub const fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no periods.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Periods, most recent first.
    pub fn periods(&self) -> Vec<Date> {
        self.points.iter().map(|(p, _)| *p).collect()
    }

    /// Values, most recent first.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    /// Iterates `(period, value)` pairs, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.points.iter().copied()
    }

    /// Value for `period`, if the period is present.
    pub fn get(&self, period: Date) -> Option<f64> {
        self.points
            .iter()
            .find(|(p, _)| *p == period)
            .map(|(_, v)| *v)
    }

    /// The most recent `(period, value)` pair.
    pub fn latest(&self) -> Option<(Date, f64)> {
        self.points.first().copied()
    }

    /// The oldest `(period, value)` pair.
    pub fn oldest(&self) -> Option<(Date, f64)> {
        self.points.last().copied()
    }

    /// `(period, value)` pairs in ascending chronological order.
    pub fn chronological(&self) -> Vec<(Date, f64)> {
        self.points.iter().rev().copied().collect()
    }

    /// Applies `f` to every value.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            points: self.points.iter().map(|&(p, v)| (p, f(v))).collect(),
        }
    }

    /// Combines two series over the periods they share, in `self`'s order.
    ///
    /// Periods present in only one of the series are dropped.
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let points = self
            .points
            .iter()
            .filter_map(|&(p, a)| other.get(p).map(|b| (p, f(a, b))))
            .collect();
        Self { points }
    }

    /// Keeps only the periods listed in `periods`.
    pub fn restrict_to(&self, periods: &[Date]) -> Self {
        let keep: HashSet<Date> = periods.iter().copied().collect();
        Self {
            points: self
                .points
                .iter()
                .filter(|(p, _)| keep.contains(p))
                .copied()
                .collect(),
        }
    }

    /// Keeps the `n` most recent periods.
    pub fn take_latest(&self, n: usize) -> Self {
        Self {
            points: self.points.iter().take(n).copied().collect(),
        }
    }
}

/// Dated observations in ascending chronological order.
///
/// Used for daily closing prices and for point events such as dividend
/// payments. Several observations may share a date for event series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    points: Vec<(Date, f64)>,
}

impl TimeSeries {
    /// Builds a series from observations in any order; they are sorted by
    /// date, keeping the input order for equal dates.
    pub fn new(mut points: Vec<(Date, f64)>) -> Self {
        points.sort_by_key(|(d, _)| *d);
        Self { points }
    }

    /// An empty series.
    pub const fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no observations.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Observations in ascending date order.
    pub fn points(&self) -> &[(Date, f64)] {
        &self.points
    }

    /// Values in ascending date order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    /// The first observation.
    pub fn first(&self) -> Option<(Date, f64)> {
        self.points.first().copied()
    }

    /// The most recent observation.
    pub fn last(&self) -> Option<(Date, f64)> {
        self.points.last().copied()
    }

    /// Observations satisfying `keep`, order preserved.
    pub fn filter(&self, keep: impl Fn(Date) -> bool) -> Self {
        Self {
            points: self
                .points
                .iter()
                .filter(|(d, _)| keep(*d))
                .copied()
                .collect(),
        }
    }
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`BilanError::InvalidDate`] when the string is not a valid date.
pub fn parse_iso_date(s: &str) -> Result<Date> {
    Date::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| BilanError::InvalidDate(format!("'{s}': {e}")))
}
