//! Line-item resolution.
//!
//! Providers spell the same concept differently (`"EBIT"` vs
//! `"Operating Income"`). A [`LineItemQuery`] lists the accepted names in
//! priority order together with the value to assume when none is present.

use bilan_traits::{PeriodSeries, StatementTable};
use serde::Serialize;
use tracing::debug;

/// Prioritized names for one financial concept plus a fill value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineItemQuery {
    /// Short label used in logs and unavailability reasons.
    pub concept: &'static str,
    /// Accepted row names, first match wins.
    pub names: &'static [&'static str],
    /// Value assumed for every period when no name matches.
    pub fill: f64,
}

impl LineItemQuery {
    /// Creates a query.
    #[must_use]
    pub const fn new(concept: &'static str, names: &'static [&'static str], fill: f64) -> Self {
        Self {
            concept,
            names,
            fill,
        }
    }

    /// The same query with a different fill value.
    #[must_use]
    pub const fn with_fill(self, fill: f64) -> Self {
        Self { fill, ..self }
    }
}

/// Outcome of resolving a [`LineItemQuery`] against a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// A row matched; its values are returned unchanged.
    Resolved {
        /// The row name that matched.
        name: String,
        /// The row's values.
        series: PeriodSeries,
    },
    /// No row matched; the fill value over the table's periods.
    Defaulted {
        /// Constant fill series.
        series: PeriodSeries,
    },
}

impl Resolution {
    /// The resolved or filled series.
    #[must_use]
    pub const fn series(&self) -> &PeriodSeries {
        match self {
            Self::Resolved { series, .. } | Self::Defaulted { series } => series,
        }
    }

    /// Consumes the resolution, returning the series.
    #[must_use]
    pub fn into_series(self) -> PeriodSeries {
        match self {
            Self::Resolved { series, .. } | Self::Defaulted { series } => series,
        }
    }

    /// Whether a real row matched.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// The matched row name, if any.
    #[must_use]
    pub fn matched_name(&self) -> Option<&str> {
        match self {
            Self::Resolved { name, .. } => Some(name.as_str()),
            Self::Defaulted { .. } => None,
        }
    }
}

/// Resolves `query` against `table`.
///
/// Returns the first row whose name matches one of `query.names`, in query
/// order. Rows are never merged. When nothing matches, the result is a
/// constant series of `query.fill` over every period of the table (empty for
/// an empty table).
///
/// # Example
///
/// ```
/// use bilan_metrics::resolve::{LineItemQuery, resolve};
/// use bilan_traits::{Date, LineItem, StatementTable};
///
/// let table = StatementTable::new(
///     vec![Date::from_ymd_opt(2024, 12, 31).unwrap()],
///     vec![LineItem::new("Operating Income", vec![42.0])],
/// )
/// .unwrap();
///
/// const EBIT: LineItemQuery = LineItemQuery::new("ebit", &["EBIT", "Operating Income"], 0.0);
/// let resolution = resolve(&table, &EBIT);
/// assert_eq!(resolution.matched_name(), Some("Operating Income"));
/// ```
pub fn resolve(table: &StatementTable, query: &LineItemQuery) -> Resolution {
    for &name in query.names {
        if let Some(series) = table.row(name) {
            return Resolution::Resolved {
                name: name.to_string(),
                series,
            };
        }
    }
    debug!(
        concept = query.concept,
        fill = query.fill,
        "line item not found, using fill value"
    );
    Resolution::Defaulted {
        series: PeriodSeries::constant(table.periods(), query.fill),
    }
}
