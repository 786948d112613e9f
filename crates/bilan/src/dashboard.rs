//! Company dashboard.
//!
//! Runs every metric engine over one [`CompanyFinancials`] bundle and
//! classifies each headline value against its thresholds.

use bilan_metrics::{
    Classification, Gauge, GaugeReading, GrowthEngine, GrowthPanel, MetricCategory,
    MetricsConfig, ProfitabilityEngine, ProfitabilityHistory, ProfitabilitySnapshot,
    SectorThresholds, StatusLabels, ThresholdPolicy,
    classify::Direction,
    headline::all_metrics,
    momentum::{YtdPerformance, ytd},
    profitability::Trend,
    registry::{MetricInfo, Unit, get_metric_info},
};
use bilan_traits::{Availability, CompanyFinancials, Date, Frequency, Result, UnavailableReason};
use serde::Serialize;
use tracing::debug;

/// Range of the PER gauge.
pub const PER_GAUGE_RANGE: [f64; 2] = [0.0, 40.0];

/// Range of the PEG gauge.
pub const PEG_GAUGE_RANGE: [f64; 2] = [0.0, 3.0];

/// One classified headline metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricReading {
    /// Registry key.
    pub key: &'static str,
    /// Display title.
    pub title: &'static str,
    /// Category.
    pub category: MetricCategory,
    /// Display unit.
    pub unit: Unit,
    /// Computed value.
    pub value: Availability<f64>,
    /// Thresholds the value was classified against.
    pub thresholds: [f64; 2],
    /// Tier, colour and status.
    pub classification: Classification,
}

/// Profitability ratios in every view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitabilityPanel {
    /// Current ratios.
    pub point_in_time: ProfitabilitySnapshot,
    /// Trailing-twelve-month ratios from quarterly statements.
    pub trailing: ProfitabilitySnapshot,
    /// Ratios per fiscal year.
    pub annual: ProfitabilityHistory,
    /// Ratios per fiscal quarter.
    pub quarterly: ProfitabilityHistory,
    /// Direction of annual ROIC.
    pub roic_trend: Option<Trend>,
}

/// PER and PEG gauges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationPanel {
    /// PER thresholds of the company's sector.
    pub per_thresholds: [f64; 2],
    /// PER on a 0–40 gauge.
    pub per: GaugeReading,
    /// PEG on a 0–3 gauge.
    pub peg: GaugeReading,
}

/// Everything the dashboard shows for one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    /// Ticker symbol.
    pub symbol: String,
    /// Company name.
    pub name: Option<String>,
    /// Sector label.
    pub sector: Option<String>,
    /// Evaluation date.
    pub as_of: Date,
    /// Every registry metric, classified, in registry order.
    pub headline: Vec<MetricReading>,
    /// Profitability detail.
    pub profitability: ProfitabilityPanel,
    /// Valuation gauges.
    pub valuation: ValuationPanel,
    /// Year-to-date performance detail.
    pub ytd: Availability<YtdPerformance>,
    /// Growth detail.
    pub growth: GrowthPanel,
}

impl DashboardReport {
    /// The headline reading with the given key.
    #[must_use]
    pub fn reading(&self, key: &str) -> Option<&MetricReading> {
        self.headline.iter().find(|r| r.key == key)
    }

    /// Headline readings of one category.
    pub fn category(&self, category: MetricCategory) -> impl Iterator<Item = &MetricReading> {
        self.headline.iter().filter(move |r| r.category == category)
    }
}

/// Dashboard orchestrator.
///
/// # Example
///
/// ```
/// use bilan::{Dashboard, MetricsConfig};
/// use bilan::traits::{CompanyFinancials, CompanyProfile, Date};
///
/// let dashboard = Dashboard::new(MetricsConfig::default()).unwrap();
/// let company = CompanyFinancials::new(CompanyProfile::new("ACME"));
/// let report = dashboard
///     .analyze(&company, Date::from_ymd_opt(2025, 1, 31).unwrap())
///     .unwrap();
///
/// // Nothing reported: every value is unavailable and classified bad.
/// let roic = report.reading("roic").unwrap();
/// assert!(!roic.value.is_available());
/// assert_eq!(roic.classification.status, "Not available");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    config: MetricsConfig,
    sectors: SectorThresholds,
}

impl Dashboard {
    /// Create a dashboard with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: MetricsConfig) -> Result<Self> {
        config.validate()?;
        let sectors = SectorThresholds::new(config.sector_overrides.clone());
        Ok(Self { config, sectors })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Computes and classifies every metric for `company` as of `as_of`.
    ///
    /// Missing data never fails the report; it shows up as unavailable
    /// values.
    ///
    /// # Errors
    ///
    /// Returns an error only for invalid thresholds or configuration.
    pub fn analyze(&self, company: &CompanyFinancials, as_of: Date) -> Result<DashboardReport> {
        let profile = &company.profile;
        let sector = profile.sector.as_deref();
        debug!(symbol = %profile.symbol, %as_of, "building dashboard");

        let profitability = self.profitability(company);
        let growth = GrowthEngine::new(self.config.clone()).panel(company, Some(as_of));
        let ytd = ytd(&company.prices, profile.price_at(as_of), as_of);

        let headline = all_metrics(&self.config)
            .iter()
            .filter_map(|metric| Some((metric, get_metric_info(metric.name())?)))
            .map(|(metric, info)| {
                let value = metric.compute(company, as_of)?;
                self.read(&info, value, sector)
            })
            .collect::<Result<Vec<_>>>()?;
        let value_of = |key: &str| {
            headline.iter().find(|r| r.key == key).map_or_else(
                || Availability::Unavailable(UnavailableReason::missing(key.to_string())),
                |r| r.value.clone(),
            )
        };
        let per = value_of("per");
        let peg = value_of("peg");

        let per_policy = self.sectors.per_policy(sector)?;
        let peg_policy = get_metric_info("peg").map_or_else(
            || ThresholdPolicy::new(1.0, 2.0, Direction::LowerIsBetter),
            |info| info.policy(),
        )?;
        let valuation = ValuationPanel {
            per_thresholds: self.sectors.per(sector),
            per: gauge_reading(PER_GAUGE_RANGE, per_policy, &per)?,
            peg: gauge_reading(PEG_GAUGE_RANGE, peg_policy, &peg)?,
        };

        Ok(DashboardReport {
            symbol: profile.symbol.clone(),
            name: profile.name.clone(),
            sector: profile.sector.clone(),
            as_of,
            headline,
            profitability,
            valuation,
            ytd,
            growth,
        })
    }

    fn profitability(&self, company: &CompanyFinancials) -> ProfitabilityPanel {
        let engine = ProfitabilityEngine::new(self.config.clone());
        let annual = engine.history(
            &company.annual.income,
            &company.annual.balance,
            Frequency::Annual,
        );
        let quarterly = engine.history(
            &company.quarterly.income,
            &company.quarterly.balance,
            Frequency::Quarterly,
        );
        ProfitabilityPanel {
            point_in_time: engine.point_in_time(company),
            trailing: engine.trailing(&company.quarterly.income, &company.quarterly.balance),
            roic_trend: annual.roic_trend(),
            annual,
            quarterly,
        }
    }

    fn read(
        &self,
        info: &MetricInfo,
        value: Availability<f64>,
        sector: Option<&str>,
    ) -> Result<MetricReading> {
        let (policy, thresholds) = if info.key == "per" {
            (self.sectors.per_policy(sector)?, self.sectors.per(sector))
        } else {
            (info.policy()?, info.thresholds)
        };
        let classification = policy.assess_availability(&value, info.labels());
        Ok(MetricReading {
            key: info.key,
            title: info.title,
            category: info.category,
            unit: info.unit,
            value,
            thresholds,
            classification,
        })
    }
}

fn gauge_reading(
    [min, max]: [f64; 2],
    policy: ThresholdPolicy,
    value: &Availability<f64>,
) -> Result<GaugeReading> {
    let gauge = Gauge::new(min, max, policy)?;
    Ok(gauge.read(
        value.value().copied().unwrap_or(f64::NAN),
        &StatusLabels::VALUATION,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bilan_metrics::{Tier, registry::available_metrics};
    use bilan_traits::{CompanyProfile, LineItem, StatementTable, TimeSeries};

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    fn acme() -> CompanyFinancials {
        let mut profile = CompanyProfile::new("ACME");
        profile.name = Some("Acme Corp".to_string());
        profile.sector = Some("Technology".to_string());
        profile.current_price = Some(120.0);
        profile.trailing_pe = Some(30.0);
        profile.peg_ratio = Some(0.8);
        profile.book_value_per_share = Some(50.0);
        profile.shares_outstanding = Some(10.0);
        profile.total_debt = Some(300.0);
        profile.total_cash = Some(100.0);

        let mut company = CompanyFinancials::new(profile);
        let years = vec![d(2024, 12, 31), d(2023, 12, 31), d(2022, 12, 31)];
        company.annual.income = StatementTable::new(
            years.clone(),
            vec![
                LineItem::new("Total Revenue", vec![1210.0, 1100.0, 1000.0]),
                LineItem::new("Net Income", vec![121.0, 99.0, 80.0]),
                LineItem::new("EBIT", vec![160.0, 140.0, 120.0]),
                LineItem::new("Pretax Income", vec![150.0, 130.0, 110.0]),
                LineItem::new("Tax Provision", vec![30.0, 26.0, 22.0]),
                LineItem::new("Diluted EPS", vec![12.1, 9.9, 8.0]),
            ],
        )
        .unwrap();
        company.annual.balance = StatementTable::new(
            years.clone(),
            vec![
                LineItem::new("Stockholders Equity", vec![500.0, 450.0, 400.0]),
                LineItem::new("Total Debt", vec![300.0, 300.0, 300.0]),
                LineItem::new("Cash And Cash Equivalents", vec![100.0, 90.0, 80.0]),
            ],
        )
        .unwrap();
        company.annual.cash_flow = StatementTable::new(
            years,
            vec![LineItem::new("Free Cash Flow", vec![144.0, 120.0, 100.0])],
        )
        .unwrap();

        let mut closes = vec![(d(2024, 12, 31), 100.0)];
        closes.extend((1..=20).map(|i| (d(2025, 1, i), 100.0 + f64::from(i))));
        company.prices = TimeSeries::new(closes);
        company.dividends = TimeSeries::new(vec![
            (d(2022, 6, 1), 1.0),
            (d(2023, 6, 1), 1.1),
            (d(2024, 6, 1), 1.21),
        ]);
        company
    }

    #[test]
    fn test_end_to_end_report() {
        let dashboard = Dashboard::default();
        let report = dashboard.analyze(&acme(), d(2025, 1, 31)).unwrap();

        assert_eq!(report.symbol, "ACME");
        assert_eq!(report.headline.len(), available_metrics().len());

        // 121 / 1210
        let margin = report.reading("net_margin").unwrap();
        assert_relative_eq!(*margin.value.value().unwrap(), 0.1);
        assert_eq!(margin.classification.tier, Tier::Good);

        // NOPAT 160 × 0.8 = 128 over 300 + 500 − 100
        let roic = report.reading("roic").unwrap();
        assert_relative_eq!(*roic.value.value().unwrap(), 128.0 / 700.0);

        // Technology PER band [20, 35]
        let per = report.reading("per").unwrap();
        assert_eq!(per.thresholds, [20.0, 35.0]);
        assert_eq!(per.classification.tier, Tier::Mid);
        assert_eq!(per.classification.status, "Fair");
        assert_relative_eq!(report.valuation.per.position, 0.75);

        let revenue = report.reading("revenue_cagr").unwrap();
        assert_relative_eq!(*revenue.value.value().unwrap(), 0.1, epsilon = 1e-12);
        let dividends = report.reading("dividend_cagr").unwrap();
        assert_relative_eq!(*dividends.value.value().unwrap(), 0.1, epsilon = 1e-12);

        let ytd = report.reading("ytd").unwrap();
        assert_relative_eq!(*ytd.value.value().unwrap(), 20.0);

        // Only gains over the window
        let rsi = report.reading("rsi").unwrap();
        assert_eq!(rsi.value, Availability::Available(100.0));
        assert_eq!(rsi.classification.tier, Tier::Bad);
        assert_eq!(rsi.classification.status, "Stretched");

        assert_eq!(report.profitability.annual.periods.len(), 3);
        assert_eq!(report.profitability.roic_trend, Some(Trend::Improving));
    }

    #[test]
    fn test_missing_per_reads_not_profitable() {
        let mut company = acme();
        company.profile.trailing_pe = None;
        let report = Dashboard::default().analyze(&company, d(2025, 1, 31)).unwrap();
        let per = report.reading("per").unwrap();
        assert_eq!(per.classification.tier, Tier::Bad);
        assert_eq!(per.classification.status, "Not profitable");
        assert_eq!(report.valuation.per.position, 0.0);
    }

    #[test]
    fn test_historical_date_ignores_later_quote() {
        let mut company = acme();
        company.profile.current_price = Some(150.0);
        company.profile.quote_date = Some(d(2025, 6, 2));

        let report = Dashboard::default().analyze(&company, d(2025, 1, 31)).unwrap();
        // Latest close up to the date, 120, against the 2024 close of 100
        let ytd = report.ytd.value().unwrap();
        assert_eq!(ytd.current_price, 120.0);
        assert_relative_eq!(*report.reading("ytd").unwrap().value.value().unwrap(), 20.0);
        assert!(!report.reading("per").unwrap().value.is_available());
        assert!(!report.reading("peg").unwrap().value.is_available());

        let current = Dashboard::default().analyze(&company, d(2025, 6, 2)).unwrap();
        assert_eq!(current.ytd.value().unwrap().current_price, 150.0);
        assert_eq!(current.reading("per").unwrap().value, Availability::Available(30.0));
    }

    #[test]
    fn test_sector_override() {
        let mut config = MetricsConfig::default();
        config
            .sector_overrides
            .insert("Technology".to_string(), [10.0, 25.0]);
        let report = Dashboard::new(config)
            .unwrap()
            .analyze(&acme(), d(2025, 1, 31))
            .unwrap();
        assert_eq!(report.valuation.per_thresholds, [10.0, 25.0]);
        assert_eq!(
            report.reading("per").unwrap().classification.tier,
            Tier::Bad
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MetricsConfig {
            rsi_window: 0,
            ..MetricsConfig::default()
        };
        assert!(Dashboard::new(config).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let report = Dashboard::default().analyze(&acme(), d(2025, 1, 31)).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["symbol"], "ACME");
        assert!(json["headline"].as_array().unwrap().len() > 10);
        assert_eq!(report.category(MetricCategory::Growth).count(), 4);
    }
}
