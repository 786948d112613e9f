//! Effective tax rate and EBIT normalization.
//!
//! Reported figures are frequently incomplete: tax provisions go missing, a
//! loss year produces a negative effective rate, and some issuers never
//! report EBIT. This module produces a per-period tax rate that is always
//! usable and an EBIT series that is either reported, reconstructed from
//! pretax income and interest, or explicitly unavailable.

use crate::{items, resolve::resolve};
use bilan_traits::{Availability, PeriodSeries, StatementTable, UnavailableReason};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bounds applied to effective tax rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxPolicy {
    /// Rate used when the effective rate is missing or implausible.
    pub default_rate: f64,
    /// Largest plausible effective rate.
    pub max_rate: f64,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self {
            default_rate: 0.25,
            max_rate: 0.5,
        }
    }
}

impl TaxPolicy {
    /// Clamps an effective rate into the plausible range.
    ///
    /// `NaN`, negative and above-maximum rates become the default rate;
    /// `[0, max_rate]` passes through unchanged.
    #[must_use]
    pub fn clamp(&self, rate: f64) -> f64 {
        if (0.0..=self.max_rate).contains(&rate) {
            rate
        } else {
            self.default_rate
        }
    }
}

/// Where the tax-rate series came from.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRateSource {
    /// Tax provision over pretax income, clamped per period.
    #[display("effective")]
    Effective,
    /// The default rate for every period.
    #[display("default")]
    Default,
}

/// Where the EBIT series came from.
#[derive(Debug, Display, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "row", rename_all = "snake_case")]
pub enum EbitSource {
    /// A reported EBIT-like row, by name.
    #[display("reported ({_0})")]
    Reported(String),
    /// Pretax income plus the absolute interest expense.
    #[display("pretax income + interest expense")]
    Reconstructed,
}

/// Normalized tax rate and EBIT for one income statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalized {
    /// Per-period tax rate, every value within `[0, max_rate]`.
    pub tax_rate: PeriodSeries,
    /// How the tax rate was obtained.
    pub tax_source: TaxRateSource,
    /// EBIT per period, or the reason it could not be obtained.
    pub ebit: Availability<PeriodSeries>,
    /// How EBIT was obtained, when available.
    pub ebit_source: Option<EbitSource>,
}

/// Derives the tax rate and EBIT from an income statement.
///
/// The effective rate is `tax provision / pretax income` when both rows
/// exist, clamped per period by `policy`; otherwise `policy.default_rate`
/// applies to every period.
///
/// EBIT is taken from the first reported EBIT-like row. Failing that, it is
/// rebuilt as `pretax income + |interest expense|` when both rows exist,
/// treating empty interest cells as zero. Otherwise EBIT is unavailable.
pub fn normalize(table: &StatementTable, policy: &TaxPolicy) -> Normalized {
    if table.is_empty() {
        return Normalized {
            tax_rate: PeriodSeries::empty(),
            tax_source: TaxRateSource::Default,
            ebit: Availability::Unavailable(UnavailableReason::missing(
                "income statement is empty",
            )),
            ebit_source: None,
        };
    }

    let pretax = resolve(table, &items::PRETAX_INCOME);
    let tax = resolve(table, &items::TAX_PROVISION);

    let (tax_rate, tax_source) = if pretax.is_resolved() && tax.is_resolved() {
        let rate = tax.series().zip_with(pretax.series(), |t, p| t / p);
        let clamped = rate.map(|r| policy.clamp(r));
        for ((period, raw), (_, used)) in rate.iter().zip(clamped.iter()) {
            if raw.to_bits() != used.to_bits() {
                debug!(%period, raw, used, "effective tax rate out of range, using default");
            }
        }
        (clamped, TaxRateSource::Effective)
    } else {
        debug!(
            rate = policy.default_rate,
            "tax provision or pretax income missing, using default tax rate"
        );
        (
            PeriodSeries::constant(table.periods(), policy.default_rate),
            TaxRateSource::Default,
        )
    };

    let reported = resolve(table, &items::EBIT);
    let (ebit, ebit_source) = if let Some(name) = reported.matched_name() {
        let source = EbitSource::Reported(name.to_string());
        (Availability::Available(reported.into_series()), Some(source))
    } else {
        let interest = resolve(table, &items::INTEREST_EXPENSE);
        if pretax.is_resolved() && interest.is_resolved() {
            debug!("EBIT not reported, rebuilding from pretax income and interest expense");
            let ebit = pretax.series().zip_with(interest.series(), |p, i| {
                let interest = if i.is_nan() { 0.0 } else { i.abs() };
                p + interest
            });
            (Availability::Available(ebit), Some(EbitSource::Reconstructed))
        } else {
            debug!("EBIT unavailable: no reported row and no pretax/interest pair");
            (
                Availability::Unavailable(UnavailableReason::missing(
                    "EBIT not reported and cannot be rebuilt from pretax income and interest",
                )),
                None,
            )
        }
    };

    Normalized {
        tax_rate,
        tax_source,
        ebit,
        ebit_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bilan_traits::{Date, LineItem};
    use rstest::rstest;

    fn periods() -> Vec<Date> {
        vec![
            Date::from_ymd_opt(2024, 12, 31).unwrap(),
            Date::from_ymd_opt(2023, 12, 31).unwrap(),
        ]
    }

    fn table(rows: Vec<LineItem>) -> StatementTable {
        StatementTable::new(periods(), rows).unwrap()
    }

    #[rstest]
    #[case(-1.0, 0.25)]
    #[case(0.0, 0.0)]
    #[case(0.25, 0.25)]
    #[case(0.5, 0.5)]
    #[case(0.51, 0.25)]
    #[case(f64::NAN, 0.25)]
    #[case(f64::INFINITY, 0.25)]
    fn test_clamp(#[case] raw: f64, #[case] expected: f64) {
        assert_eq!(TaxPolicy::default().clamp(raw), expected);
    }

    #[test]
    fn test_effective_rate_clamped_per_period() {
        let t = table(vec![
            LineItem::new("Pretax Income", vec![100.0, -50.0]),
            LineItem::new("Tax Provision", vec![21.0, 10.0]),
            LineItem::new("EBIT", vec![110.0, -40.0]),
        ]);
        let n = normalize(&t, &TaxPolicy::default());
        assert_eq!(n.tax_source, TaxRateSource::Effective);
        assert_relative_eq!(n.tax_rate.values()[0], 0.21);
        assert_relative_eq!(n.tax_rate.values()[1], 0.25);
        assert_eq!(n.ebit_source, Some(EbitSource::Reported("EBIT".to_string())));
    }

    #[test]
    fn test_zero_pretax_income_falls_back_to_default() {
        let t = table(vec![
            LineItem::new("Pretax Income", vec![0.0, 10.0]),
            LineItem::new("Tax Provision", vec![5.0, 1.0]),
        ]);
        let n = normalize(&t, &TaxPolicy::default());
        assert_eq!(n.tax_rate.values()[0], 0.25);
        assert_relative_eq!(n.tax_rate.values()[1], 0.1);
    }

    #[test]
    fn test_default_rate_when_tax_row_missing() {
        let t = table(vec![LineItem::new("Operating Income", vec![10.0, 8.0])]);
        let n = normalize(&t, &TaxPolicy::default());
        assert_eq!(n.tax_source, TaxRateSource::Default);
        assert_eq!(n.tax_rate.values(), vec![0.25, 0.25]);
        assert_eq!(
            n.ebit_source,
            Some(EbitSource::Reported("Operating Income".to_string()))
        );
    }

    #[test]
    fn test_ebit_rebuilt_from_pretax_and_interest() {
        let t = table(vec![
            LineItem::new("Pretax Income", vec![90.0, 80.0]),
            LineItem::new("Interest Expense", vec![-10.0, f64::NAN]),
        ]);
        let n = normalize(&t, &TaxPolicy::default());
        assert_eq!(n.ebit_source, Some(EbitSource::Reconstructed));
        let ebit = n.ebit.into_option().unwrap();
        assert_eq!(ebit.values(), vec![100.0, 80.0]);
    }

    #[test]
    fn test_ebit_unavailable_without_interest_row() {
        let t = table(vec![LineItem::new("Pretax Income", vec![90.0, 80.0])]);
        let n = normalize(&t, &TaxPolicy::default());
        assert!(!n.ebit.is_available());
        assert_eq!(n.ebit_source, None);
        assert!(matches!(
            n.ebit.reason(),
            Some(UnavailableReason::MissingData(_))
        ));
    }

    #[test]
    fn test_empty_table() {
        let n = normalize(&StatementTable::empty(), &TaxPolicy::default());
        assert!(n.tax_rate.is_empty());
        assert!(!n.ebit.is_available());
    }
}
