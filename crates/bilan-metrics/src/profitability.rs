//! Net margin, ROE and ROIC.
//!
//! Three views are produced:
//!
//! - **History**: one row of ratios per period reported by both the income
//!   statement and the balance sheet, capped to the most recent periods.
//! - **Point in time**: provider-reported margin and ROE where available, and
//!   ROIC from the latest NOPAT over invested capital derived from the
//!   profile.
//! - **Trailing twelve months**: quarterly sums over the latest balance.
//!
//! Invested capital is `debt + equity − cash`. ROIC is only reported when
//! invested capital is strictly positive.

use crate::{
    config::MetricsConfig,
    items,
    nopat::nopat,
    resolve::{LineItemQuery, resolve},
    window::{align, ttm_series},
};
use bilan_traits::{
    Availability, CompanyFinancials, Date, Frequency, PeriodSeries, StatementTable,
    UnavailableReason,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ratios for one reporting period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRatios {
    /// Period end date.
    pub period: Date,
    /// Net income / revenue.
    pub net_margin: Availability<f64>,
    /// Net income / equity.
    pub roe: Availability<f64>,
    /// NOPAT / invested capital.
    pub roic: Availability<f64>,
    /// NOPAT of the period.
    pub nopat: Availability<f64>,
    /// Debt + equity − cash.
    pub invested_capital: Availability<f64>,
}

/// Direction of ROIC over the history window.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Latest ROIC above the oldest.
    #[display("improving")]
    Improving,
    /// Latest ROIC below the oldest.
    #[display("deteriorating")]
    Deteriorating,
    /// No change.
    #[display("flat")]
    Flat,
}

/// Ratios per period, most recent first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitabilityHistory {
    /// Frequency of the underlying statements.
    pub frequency: Frequency,
    /// One entry per shared period.
    pub periods: Vec<PeriodRatios>,
}

impl ProfitabilityHistory {
    /// Whether no period could be aligned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// The most recent period.
    #[must_use]
    pub fn latest(&self) -> Option<&PeriodRatios> {
        self.periods.first()
    }

    /// Compares the most recent available ROIC with the oldest one.
    ///
    /// `None` when fewer than two periods have a ROIC.
    #[must_use]
    pub fn roic_trend(&self) -> Option<Trend> {
        let mut available = self.periods.iter().filter_map(|p| p.roic.value().copied());
        let latest = available.next()?;
        let oldest = available.last()?;
        Some(if latest > oldest {
            Trend::Improving
        } else if latest < oldest {
            Trend::Deteriorating
        } else {
            Trend::Flat
        })
    }
}

/// Headline ratios at a single point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitabilitySnapshot {
    /// Net margin.
    pub net_margin: Availability<f64>,
    /// Return on equity.
    pub roe: Availability<f64>,
    /// Return on invested capital.
    pub roic: Availability<f64>,
    /// NOPAT used for ROIC.
    pub nopat: Availability<f64>,
    /// Invested capital used for ROIC.
    pub invested_capital: Availability<f64>,
}

/// Profitability ratio engine.
///
/// # Example
///
/// ```
/// use bilan_metrics::{MetricsConfig, profitability::ProfitabilityEngine};
/// use bilan_traits::{Date, Frequency, LineItem, StatementTable};
///
/// let periods = vec![Date::from_ymd_opt(2024, 12, 31).unwrap()];
/// let income = StatementTable::new(periods.clone(), vec![
///     LineItem::new("Net Income", vec![10.0]),
///     LineItem::new("Total Revenue", vec![100.0]),
///     LineItem::new("EBIT", vec![20.0]),
/// ]).unwrap();
/// let balance = StatementTable::new(periods, vec![
///     LineItem::new("Stockholders Equity", vec![50.0]),
///     LineItem::new("Total Debt", vec![30.0]),
///     LineItem::new("Cash And Cash Equivalents", vec![5.0]),
/// ]).unwrap();
///
/// let engine = ProfitabilityEngine::new(MetricsConfig::default());
/// let history = engine.history(&income, &balance, Frequency::Annual);
/// let latest = history.latest().unwrap();
/// assert_eq!(latest.net_margin.value(), Some(&0.1));
/// assert_eq!(latest.roic.value(), Some(&0.2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProfitabilityEngine {
    config: MetricsConfig,
}

impl ProfitabilityEngine {
    /// Create a new engine with the given configuration.
    #[must_use]
    pub const fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Ratios for the periods reported by both statements.
    ///
    /// Periods present in only one statement are dropped. The result keeps
    /// the `annual_history` or `quarterly_history` most recent periods.
    pub fn history(
        &self,
        income: &StatementTable,
        balance: &StatementTable,
        frequency: Frequency,
    ) -> ProfitabilityHistory {
        let mut shared = align(income, balance);
        shared.truncate(self.config.history_cap(frequency));
        if shared.is_empty() {
            debug!(%frequency, "no period shared by income statement and balance sheet");
            return ProfitabilityHistory {
                frequency,
                periods: Vec::new(),
            };
        }

        let income_shared = income.select_periods(&shared);
        let balance_shared = balance.select_periods(&shared);

        let net_income = Line::resolve(&income_shared, &items::NET_INCOME);
        let revenue = Line::resolve(&income_shared, &items::TOTAL_REVENUE);
        let equity = Line::resolve(&balance_shared, &items::STOCKHOLDERS_EQUITY);
        let debt = Line::resolve(&balance_shared, &items::TOTAL_DEBT);
        let cash = Line::resolve(&balance_shared, &items::CASH);
        let nopat = nopat(income, &self.config.tax_policy()).history;

        let periods = shared
            .iter()
            .map(|&period| {
                let ni = net_income.at(period);
                let invested_capital = invested_capital(
                    debt.at_or_zero(period),
                    equity.at(period),
                    cash.at_or_zero(period),
                );
                let period_nopat = nopat_at(&nopat, period);
                let ratios = PeriodRatios {
                    period,
                    net_margin: divide(ni.clone(), revenue.at(period), "net margin"),
                    roe: divide(ni, equity.at(period), "ROE"),
                    roic: roic(period_nopat.clone(), invested_capital.clone()),
                    nopat: period_nopat,
                    invested_capital,
                };
                if let Some(reason) = ratios.roic.reason() {
                    debug!(%period, %reason, "ROIC unavailable");
                }
                ratios
            })
            .collect();

        ProfitabilityHistory { frequency, periods }
    }

    /// Current ratios.
    ///
    /// Net margin and ROE come from the profile when reported. Otherwise net
    /// margin uses the latest annual income statement alone and ROE the
    /// latest period shared with the balance sheet. ROIC divides the latest annual NOPAT by invested
    /// capital built from the profile's debt, cash and book equity (book
    /// value per share × shares outstanding), using the latest annual
    /// balance-sheet equity when the profile lacks it.
    pub fn point_in_time(&self, company: &CompanyFinancials) -> ProfitabilitySnapshot {
        let profile = &company.profile;
        let annual = self.history(
            &company.annual.income,
            &company.annual.balance,
            Frequency::Annual,
        );
        let latest = annual.latest();

        let net_margin = profile.profit_margin.map_or_else(
            || latest_net_margin(&company.annual.income),
            |v| Availability::finite(v, "reported profit margin"),
        );
        let roe = profile.return_on_equity.map_or_else(
            || latest_or_missing(latest, |r| &r.roe, "ROE"),
            |v| Availability::finite(v, "reported ROE"),
        );

        let equity = profile.book_equity().map_or_else(
            || {
                Line::resolve(&company.annual.balance, &items::STOCKHOLDERS_EQUITY)
                    .latest()
            },
            |v| Availability::finite(v, "book equity"),
        );
        let invested_capital = invested_capital(
            profile.total_debt.filter(|v| v.is_finite()).unwrap_or(0.0),
            equity,
            profile.total_cash.filter(|v| v.is_finite()).unwrap_or(0.0),
        );
        let nopat = nopat(&company.annual.income, &self.config.tax_policy()).current;

        ProfitabilitySnapshot {
            roic: roic(nopat.clone(), invested_capital.clone()),
            net_margin,
            roe,
            nopat,
            invested_capital,
        }
    }

    /// Trailing-twelve-month ratios from quarterly statements.
    ///
    /// Flows (net income, revenue, NOPAT) are summed over the latest
    /// `ttm_quarters` quarters; stocks (equity, debt, cash) are taken from
    /// the latest balance sheet.
    pub fn trailing(
        &self,
        income: &StatementTable,
        balance: &StatementTable,
    ) -> ProfitabilitySnapshot {
        let n = self.config.ttm_quarters;
        let net_income = Line::resolve(income, &items::NET_INCOME).trailing(n);
        let revenue = Line::resolve(income, &items::TOTAL_REVENUE).trailing(n);

        let equity_line = Line::resolve(balance, &items::STOCKHOLDERS_EQUITY);
        let equity = equity_line.latest();
        let (debt, cash) = match balance.periods().first() {
            Some(&latest) => (
                Line::resolve(balance, &items::TOTAL_DEBT).at_or_zero(latest),
                Line::resolve(balance, &items::CASH).at_or_zero(latest),
            ),
            None => (0.0, 0.0),
        };
        let invested_capital = invested_capital(debt, equity.clone(), cash);

        let quarterly_nopat = nopat(income, &self.config.tax_policy());
        let nopat = if quarterly_nopat.history.is_empty() {
            quarterly_nopat.current
        } else {
            ttm_series(&quarterly_nopat.history, n)
        };

        ProfitabilitySnapshot {
            net_margin: divide(net_income.clone(), revenue, "TTM net margin"),
            roe: divide(net_income, equity, "TTM ROE"),
            roic: roic(nopat.clone(), invested_capital.clone()),
            nopat,
            invested_capital,
        }
    }
}

/// A resolved line item that reports missing rows and cells as unavailable.
struct Line {
    concept: &'static str,
    series: PeriodSeries,
    resolved: bool,
}

impl Line {
    fn resolve(table: &StatementTable, query: &LineItemQuery) -> Self {
        let resolution = resolve(table, query);
        Self {
            concept: query.concept,
            resolved: resolution.is_resolved(),
            series: resolution.into_series(),
        }
    }

    fn at(&self, period: Date) -> Availability<f64> {
        if !self.resolved {
            return Availability::Unavailable(UnavailableReason::missing(format!(
                "{} not reported",
                self.concept
            )));
        }
        match self.series.get(period) {
            Some(v) if v.is_finite() => Availability::Available(v),
            _ => Availability::Unavailable(UnavailableReason::missing(format!(
                "{} empty for {period}",
                self.concept
            ))),
        }
    }

    /// Value at `period`, treating a missing row or cell as zero.
    fn at_or_zero(&self, period: Date) -> f64 {
        self.series
            .get(period)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    fn latest(&self) -> Availability<f64> {
        match self.series.latest() {
            Some((period, _)) => self.at(period),
            None => Availability::Unavailable(UnavailableReason::missing(format!(
                "{} has no periods",
                self.concept
            ))),
        }
    }

    fn trailing(&self, n: usize) -> Availability<f64> {
        if !self.resolved {
            return Availability::Unavailable(UnavailableReason::missing(format!(
                "{} not reported",
                self.concept
            )));
        }
        ttm_series(&self.series, n)
    }
}

fn divide(
    numerator: Availability<f64>,
    denominator: Availability<f64>,
    label: &str,
) -> Availability<f64> {
    numerator.and_then(|n| {
        denominator.and_then(|d| {
            if d == 0.0 {
                Availability::Unavailable(UnavailableReason::indeterminate(format!(
                    "{label} denominator is zero"
                )))
            } else {
                Availability::finite(n / d, label)
            }
        })
    })
}

fn invested_capital(debt: f64, equity: Availability<f64>, cash: f64) -> Availability<f64> {
    equity.and_then(|e| Availability::finite(debt + e - cash, "invested capital"))
}

fn roic(nopat: Availability<f64>, invested_capital: Availability<f64>) -> Availability<f64> {
    nopat.and_then(|n| {
        invested_capital.and_then(|ic| {
            if ic > 0.0 {
                Availability::finite(n / ic, "ROIC")
            } else {
                Availability::Unavailable(UnavailableReason::indeterminate(format!(
                    "invested capital {ic} is not positive"
                )))
            }
        })
    })
}

fn nopat_at(history: &PeriodSeries, period: Date) -> Availability<f64> {
    match history.get(period) {
        Some(v) => Availability::finite(v, "NOPAT"),
        None => Availability::Unavailable(UnavailableReason::missing(format!(
            "no NOPAT for {period}"
        ))),
    }
}

fn latest_net_margin(income: &StatementTable) -> Availability<f64> {
    let Some(&period) = income.periods().first() else {
        return Availability::Unavailable(UnavailableReason::missing(
            "net margin: no annual period",
        ));
    };
    divide(
        Line::resolve(income, &items::NET_INCOME).at(period),
        Line::resolve(income, &items::TOTAL_REVENUE).at(period),
        "net margin",
    )
}

fn latest_or_missing(
    latest: Option<&PeriodRatios>,
    field: impl Fn(&PeriodRatios) -> &Availability<f64>,
    label: &str,
) -> Availability<f64> {
    latest.map_or_else(
        || {
            Availability::Unavailable(UnavailableReason::missing(format!(
                "{label}: no annual period"
            )))
        },
        |r| field(r).clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bilan_traits::{CompanyProfile, LineItem};

    fn y(year: i32) -> Date {
        Date::from_ymd_opt(year, 12, 31).unwrap()
    }

    fn q(year: i32, month: u32) -> Date {
        Date::from_ymd_opt(year, month, 28).unwrap()
    }

    fn years(range: std::ops::RangeInclusive<i32>) -> Vec<Date> {
        range.rev().map(y).collect()
    }

    fn income(periods: Vec<Date>) -> StatementTable {
        let n = periods.len();
        StatementTable::new(
            periods,
            vec![
                LineItem::new("Net Income", vec![10.0; n]),
                LineItem::new("Total Revenue", vec![100.0; n]),
                LineItem::new("EBIT", vec![20.0; n]),
            ],
        )
        .unwrap()
    }

    fn balance(periods: Vec<Date>) -> StatementTable {
        let n = periods.len();
        StatementTable::new(
            periods,
            vec![
                LineItem::new("Stockholders Equity", vec![50.0; n]),
                LineItem::new("Total Debt", vec![30.0; n]),
                LineItem::new("Cash And Cash Equivalents", vec![5.0; n]),
            ],
        )
        .unwrap()
    }

    fn engine() -> ProfitabilityEngine {
        ProfitabilityEngine::default()
    }

    #[test]
    fn test_history_ratios() {
        let history = engine().history(
            &income(years(2023..=2024)),
            &balance(years(2023..=2024)),
            Frequency::Annual,
        );
        assert_eq!(history.periods.len(), 2);
        let latest = history.latest().unwrap();
        assert_eq!(latest.period, y(2024));
        assert_relative_eq!(latest.net_margin.value().copied().unwrap(), 0.1);
        assert_relative_eq!(latest.roe.value().copied().unwrap(), 0.2);
        // NOPAT 15 / (30 + 50 - 5)
        assert_relative_eq!(latest.roic.value().copied().unwrap(), 0.2);
        assert_eq!(latest.invested_capital, Availability::Available(75.0));
    }

    #[test]
    fn test_history_drops_unshared_periods() {
        let history = engine().history(
            &income(vec![y(2024), y(2023), y(2022)]),
            &balance(vec![y(2024), y(2022), y(2021)]),
            Frequency::Annual,
        );
        let periods: Vec<Date> = history.periods.iter().map(|p| p.period).collect();
        assert_eq!(periods, vec![y(2024), y(2022)]);
    }

    #[test]
    fn test_history_caps() {
        let annual = engine().history(
            &income(years(2015..=2024)),
            &balance(years(2015..=2024)),
            Frequency::Annual,
        );
        assert_eq!(annual.periods.len(), 5);
        assert_eq!(annual.periods[4].period, y(2020));

        let quarters = vec![
            q(2024, 9),
            q(2024, 6),
            q(2024, 3),
            q(2023, 12),
            q(2023, 9),
            q(2023, 6),
        ];
        let quarterly = engine().history(
            &income(quarters.clone()),
            &balance(quarters),
            Frequency::Quarterly,
        );
        assert_eq!(quarterly.periods.len(), 4);
    }

    #[test]
    fn test_non_positive_invested_capital_is_unavailable() {
        let periods = vec![y(2024)];
        let balance = StatementTable::new(
            periods.clone(),
            vec![
                LineItem::new("Stockholders Equity", vec![10.0]),
                LineItem::new("Total Debt", vec![0.0]),
                LineItem::new("Cash And Cash Equivalents", vec![50.0]),
            ],
        )
        .unwrap();
        let history = engine().history(&income(periods), &balance, Frequency::Annual);
        let roic = &history.latest().unwrap().roic;
        assert!(matches!(roic.reason(), Some(UnavailableReason::Indeterminate(_))));
    }

    #[test]
    fn test_defaulted_denominator_is_unavailable() {
        let periods = vec![y(2024)];
        let income = StatementTable::new(
            periods.clone(),
            vec![LineItem::new("Net Income", vec![10.0])],
        )
        .unwrap();
        let balance = StatementTable::new(
            periods,
            vec![LineItem::new("Total Debt", vec![10.0])],
        )
        .unwrap();
        let history = engine().history(&income, &balance, Frequency::Annual);
        let latest = history.latest().unwrap();
        assert!(matches!(
            latest.net_margin.reason(),
            Some(UnavailableReason::MissingData(_))
        ));
        assert!(!latest.roe.is_available());
        assert!(!latest.roic.is_available());
    }

    #[test]
    fn test_zero_revenue_is_indeterminate() {
        let periods = vec![y(2024)];
        let income = StatementTable::new(
            periods.clone(),
            vec![
                LineItem::new("Net Income", vec![-5.0]),
                LineItem::new("Total Revenue", vec![0.0]),
            ],
        )
        .unwrap();
        let history = engine().history(&income, &balance(periods), Frequency::Annual);
        assert!(matches!(
            history.latest().unwrap().net_margin.reason(),
            Some(UnavailableReason::Indeterminate(_))
        ));
    }

    #[test]
    fn test_roic_trend() {
        let periods = years(2022..=2024);
        let income = StatementTable::new(
            periods.clone(),
            vec![LineItem::new("EBIT", vec![40.0, 30.0, 20.0])],
        )
        .unwrap();
        let history = engine().history(&income, &balance(periods), Frequency::Annual);
        assert_eq!(history.roic_trend(), Some(Trend::Improving));

        let single = engine().history(
            &income.latest_periods(1),
            &balance(vec![y(2024)]),
            Frequency::Annual,
        );
        assert_eq!(single.roic_trend(), None);
    }

    #[test]
    fn test_empty_statements() {
        let history = engine().history(
            &StatementTable::empty(),
            &balance(vec![y(2024)]),
            Frequency::Annual,
        );
        assert!(history.is_empty());
        assert_eq!(history.roic_trend(), None);
    }

    #[test]
    fn test_point_in_time_prefers_profile() {
        let mut profile = CompanyProfile::new("ACME");
        profile.profit_margin = Some(0.3);
        profile.return_on_equity = Some(0.25);
        profile.book_value_per_share = Some(10.0);
        profile.shares_outstanding = Some(10.0);
        profile.total_debt = Some(20.0);
        profile.total_cash = Some(45.0);

        let mut company = CompanyFinancials::new(profile);
        company.annual.income = income(vec![y(2024)]);
        company.annual.balance = balance(vec![y(2024)]);

        let snapshot = engine().point_in_time(&company);
        assert_eq!(snapshot.net_margin, Availability::Available(0.3));
        assert_eq!(snapshot.roe, Availability::Available(0.25));
        // NOPAT 15 / (20 + 100 - 45)
        assert_eq!(snapshot.invested_capital, Availability::Available(75.0));
        assert_relative_eq!(snapshot.roic.value().copied().unwrap(), 0.2);
    }

    #[test]
    fn test_point_in_time_falls_back_to_statements() {
        let mut company = CompanyFinancials::new(CompanyProfile::new("ACME"));
        company.annual.income = income(vec![y(2024)]);
        company.annual.balance = balance(vec![y(2024)]);

        let snapshot = engine().point_in_time(&company);
        assert_relative_eq!(snapshot.net_margin.value().copied().unwrap(), 0.1);
        assert_relative_eq!(snapshot.roe.value().copied().unwrap(), 0.2);
        // Profile has no debt or cash: 15 / 50
        assert_relative_eq!(snapshot.roic.value().copied().unwrap(), 0.3);
    }

    #[test]
    fn test_point_in_time_net_margin_needs_only_income() {
        let mut company = CompanyFinancials::new(CompanyProfile::new("ACME"));
        company.annual.income = income(vec![y(2024), y(2023)]);

        let snapshot = engine().point_in_time(&company);
        assert_relative_eq!(snapshot.net_margin.value().copied().unwrap(), 0.1);
        assert!(!snapshot.roe.is_available());

        company.annual.balance = balance(vec![y(2023)]);
        let snapshot = engine().point_in_time(&company);
        assert_relative_eq!(snapshot.net_margin.value().copied().unwrap(), 0.1);
        assert_relative_eq!(snapshot.roe.value().copied().unwrap(), 0.2);
    }

    #[test]
    fn test_trailing_sums_quarters() {
        let quarters = vec![q(2024, 9), q(2024, 6), q(2024, 3), q(2023, 12), q(2023, 9)];
        let income = income(quarters.clone());
        let snapshot = engine().trailing(&income, &balance(quarters));
        // 4 × 10 / 4 × 100
        assert_relative_eq!(snapshot.net_margin.value().copied().unwrap(), 0.1);
        // 40 / 50
        assert_relative_eq!(snapshot.roe.value().copied().unwrap(), 0.8);
        // 4 × 15 / 75
        assert_relative_eq!(snapshot.nopat.value().copied().unwrap(), 60.0);
        assert_relative_eq!(snapshot.roic.value().copied().unwrap(), 0.8);
    }

    #[test]
    fn test_trailing_without_statements() {
        let snapshot = engine().trailing(&StatementTable::empty(), &StatementTable::empty());
        assert!(!snapshot.net_margin.is_available());
        assert!(!snapshot.roic.is_available());
    }
}
