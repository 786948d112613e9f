//! Net operating profit after tax.

use crate::normalize::{EbitSource, TaxPolicy, normalize};
use bilan_traits::{Availability, PeriodSeries, StatementTable, UnavailableReason};
use serde::Serialize;
use tracing::debug;

/// NOPAT for the most recent period and across all periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nopat {
    /// NOPAT of the most recent period.
    pub current: Availability<f64>,
    /// NOPAT per period, most recent first. Empty when EBIT is unavailable.
    pub history: PeriodSeries,
    /// How EBIT was obtained, when available.
    pub ebit_source: Option<EbitSource>,
}

impl Nopat {
    /// The current NOPAT, or zero when it could not be computed.
    #[must_use]
    pub fn current_or_zero(&self) -> f64 {
        self.current.value().copied().unwrap_or(0.0)
    }
}

/// Computes `EBIT × (1 − tax rate)` per period of an income statement.
///
/// # Example
///
/// ```
/// use bilan_metrics::{nopat::nopat, normalize::TaxPolicy};
/// use bilan_traits::{Availability, Date, LineItem, StatementTable};
///
/// let table = StatementTable::new(
///     vec![Date::from_ymd_opt(2024, 12, 31).unwrap()],
///     vec![LineItem::new("EBIT", vec![100.0])],
/// )
/// .unwrap();
/// let result = nopat(&table, &TaxPolicy::default());
/// assert_eq!(result.current, Availability::Available(75.0));
/// ```
pub fn nopat(table: &StatementTable, policy: &TaxPolicy) -> Nopat {
    let normalized = normalize(table, policy);
    let ebit_source = normalized.ebit_source;
    let ebit = match normalized.ebit {
        Availability::Available(ebit) => ebit,
        Availability::Unavailable(reason) => {
            debug!(%reason, "NOPAT unavailable");
            return Nopat {
                current: Availability::Unavailable(reason),
                history: PeriodSeries::empty(),
                ebit_source,
            };
        }
    };

    let history = ebit.zip_with(&normalized.tax_rate, |e, rate| e * (1.0 - rate));
    let current = match history.latest() {
        Some((_, value)) => Availability::finite(value, "latest NOPAT"),
        None => Availability::Unavailable(UnavailableReason::missing("no NOPAT periods")),
    };

    Nopat {
        current,
        history,
        ebit_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bilan_traits::{Date, LineItem};

    fn periods() -> Vec<Date> {
        vec![
            Date::from_ymd_opt(2024, 12, 31).unwrap(),
            Date::from_ymd_opt(2023, 12, 31).unwrap(),
            Date::from_ymd_opt(2022, 12, 31).unwrap(),
        ]
    }

    #[test]
    fn test_default_rate_gives_75() {
        let table = StatementTable::new(
            periods(),
            vec![LineItem::new("EBIT", vec![100.0, 80.0, 60.0])],
        )
        .unwrap();
        let result = nopat(&table, &TaxPolicy::default());
        assert_eq!(result.current, Availability::Available(75.0));
        assert_eq!(result.history.values(), vec![75.0, 60.0, 45.0]);
    }

    #[test]
    fn test_uses_effective_rate_per_period() {
        let table = StatementTable::new(
            periods(),
            vec![
                LineItem::new("EBIT", vec![200.0, 100.0, 100.0]),
                LineItem::new("Pretax Income", vec![190.0, 100.0, 100.0]),
                LineItem::new("Tax Provision", vec![19.0, 30.0, 80.0]),
            ],
        )
        .unwrap();
        let result = nopat(&table, &TaxPolicy::default());
        let history = result.history.values();
        assert_relative_eq!(history[0], 180.0);
        assert_relative_eq!(history[1], 70.0);
        // 80% effective rate is implausible; the 25% default applies.
        assert_relative_eq!(history[2], 75.0);
    }

    #[test]
    fn test_unavailable_ebit_gives_empty_history() {
        let table = StatementTable::new(
            periods(),
            vec![LineItem::new("Total Revenue", vec![1.0, 1.0, 1.0])],
        )
        .unwrap();
        let result = nopat(&table, &TaxPolicy::default());
        assert!(!result.current.is_available());
        assert!(result.history.is_empty());
        assert_eq!(result.current_or_zero(), 0.0);
    }

    #[test]
    fn test_empty_table() {
        let result = nopat(&StatementTable::empty(), &TaxPolicy::default());
        assert!(!result.current.is_available());
        assert_eq!(result.ebit_source, None);
    }

    #[test]
    fn test_missing_latest_cell_is_unavailable() {
        let table = StatementTable::new(
            periods(),
            vec![LineItem::new("EBIT", vec![f64::NAN, 80.0, 60.0])],
        )
        .unwrap();
        let result = nopat(&table, &TaxPolicy::default());
        assert!(!result.current.is_available());
        assert_eq!(result.history.len(), 3);
    }
}
