//! [`Metric`] implementations for every registry entry.
//!
//! Each headline metric wraps one engine so a single value can be computed
//! by key without building the whole dashboard.

use crate::{
    config::MetricsConfig,
    growth::{GrowthEngine, GrowthPanel},
    momentum::{Rsi, RsiConfig, ytd},
    profitability::{ProfitabilityEngine, ProfitabilitySnapshot},
    registry::get_metric_info,
};
use bilan_traits::{Availability, CompanyFinancials, Date, Metric, Result, UnavailableReason};

/// Which point-in-time profitability ratio to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitabilityRatio {
    /// Net income / revenue
    NetMargin,
    /// Net income / equity
    ReturnOnEquity,
    /// NOPAT / invested capital
    ReturnOnInvestedCapital,
}

/// A point-in-time profitability ratio.
#[derive(Debug, Clone)]
pub struct ProfitabilityMetric {
    ratio: ProfitabilityRatio,
    engine: ProfitabilityEngine,
}

impl ProfitabilityMetric {
    /// Create a new metric with the given configuration.
    #[must_use]
    pub const fn new(ratio: ProfitabilityRatio, config: MetricsConfig) -> Self {
        Self {
            ratio,
            engine: ProfitabilityEngine::new(config),
        }
    }

    /// Get the ratio.
    #[must_use]
    pub const fn ratio(&self) -> ProfitabilityRatio {
        self.ratio
    }

    fn pick(&self, snapshot: ProfitabilitySnapshot) -> Availability<f64> {
        match self.ratio {
            ProfitabilityRatio::NetMargin => snapshot.net_margin,
            ProfitabilityRatio::ReturnOnEquity => snapshot.roe,
            ProfitabilityRatio::ReturnOnInvestedCapital => snapshot.roic,
        }
    }
}

impl Metric for ProfitabilityMetric {
    fn name(&self) -> &str {
        match self.ratio {
            ProfitabilityRatio::NetMargin => "net_margin",
            ProfitabilityRatio::ReturnOnEquity => "roe",
            ProfitabilityRatio::ReturnOnInvestedCapital => "roic",
        }
    }

    fn description(&self) -> &str {
        describe(self.name())
    }

    fn compute(&self, company: &CompanyFinancials, _as_of: Date) -> Result<Availability<f64>> {
        Ok(self.pick(self.engine.point_in_time(company)))
    }
}

/// Which provider-reported multiple to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiple {
    /// Trailing price/earnings
    PriceEarnings,
    /// Price/earnings-to-growth
    PriceEarningsGrowth,
}

/// A valuation multiple read from the company profile.
///
/// A missing or non-positive PER means the company is not profitable and is
/// reported as unavailable. So is a multiple quoted after the evaluation
/// date.
#[derive(Debug, Clone, Copy)]
pub struct MultipleMetric {
    multiple: Multiple,
}

impl MultipleMetric {
    /// Create a new multiple metric.
    #[must_use]
    pub const fn new(multiple: Multiple) -> Self {
        Self { multiple }
    }
}

impl Metric for MultipleMetric {
    fn name(&self) -> &str {
        match self.multiple {
            Multiple::PriceEarnings => "per",
            Multiple::PriceEarningsGrowth => "peg",
        }
    }

    fn description(&self) -> &str {
        describe(self.name())
    }

    fn compute(&self, company: &CompanyFinancials, as_of: Date) -> Result<Availability<f64>> {
        let profile = &company.profile;
        if !profile.quote_applies(as_of) {
            return Ok(Availability::Unavailable(UnavailableReason::missing(format!(
                "{} quoted after {as_of}",
                self.name()
            ))));
        }
        let value = match self.multiple {
            Multiple::PriceEarnings => profile.trailing_pe,
            Multiple::PriceEarningsGrowth => profile.peg_ratio,
        };
        Ok(match value {
            Some(v) if v.is_finite() && v > 0.0 => Availability::Available(v),
            Some(_) => Availability::Unavailable(UnavailableReason::indeterminate(format!(
                "{} is not positive",
                self.name()
            ))),
            None => Availability::Unavailable(UnavailableReason::missing(self.name())),
        })
    }
}

/// Year-to-date performance in percent.
#[derive(Debug, Clone, Copy, Default)]
pub struct YtdMetric;

impl Metric for YtdMetric {
    fn name(&self) -> &str {
        "ytd"
    }

    fn description(&self) -> &str {
        describe(self.name())
    }

    fn compute(&self, company: &CompanyFinancials, as_of: Date) -> Result<Availability<f64>> {
        Ok(ytd(&company.prices, company.profile.price_at(as_of), as_of).map(|p| p.percent))
    }
}

/// RSI at the latest close up to the evaluation date.
#[derive(Debug, Clone, Default)]
pub struct RsiMetric {
    rsi: Rsi,
}

impl RsiMetric {
    /// Create a new RSI metric with the given window.
    #[must_use]
    pub const fn new(window: usize) -> Self {
        Self {
            rsi: Rsi::new(RsiConfig { window }),
        }
    }
}

impl Metric for RsiMetric {
    fn name(&self) -> &str {
        "rsi"
    }

    fn description(&self) -> &str {
        describe(self.name())
    }

    fn compute(&self, company: &CompanyFinancials, as_of: Date) -> Result<Availability<f64>> {
        self.rsi.latest(&company.prices.filter(|d| d <= as_of))
    }
}

/// Which growth rate to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthSeries {
    /// Annual revenue
    Revenue,
    /// Annual free cash flow
    FreeCashFlow,
    /// Annual diluted EPS
    Eps,
    /// Complete-year dividends
    Dividends,
}

/// A compound annual growth rate.
#[derive(Debug, Clone)]
pub struct GrowthMetric {
    series: GrowthSeries,
    engine: GrowthEngine,
}

impl GrowthMetric {
    /// Create a new growth metric with the given configuration.
    #[must_use]
    pub const fn new(series: GrowthSeries, config: MetricsConfig) -> Self {
        Self {
            series,
            engine: GrowthEngine::new(config),
        }
    }

    fn pick(&self, panel: GrowthPanel) -> Availability<f64> {
        match self.series {
            GrowthSeries::Revenue => panel.revenue,
            GrowthSeries::FreeCashFlow => panel.free_cash_flow,
            GrowthSeries::Eps => panel.eps,
            GrowthSeries::Dividends => panel.dividends,
        }
    }
}

impl Metric for GrowthMetric {
    fn name(&self) -> &str {
        match self.series {
            GrowthSeries::Revenue => "revenue_cagr",
            GrowthSeries::FreeCashFlow => "fcf_cagr",
            GrowthSeries::Eps => "eps_cagr",
            GrowthSeries::Dividends => "dividend_cagr",
        }
    }

    fn description(&self) -> &str {
        describe(self.name())
    }

    fn compute(&self, company: &CompanyFinancials, as_of: Date) -> Result<Availability<f64>> {
        Ok(self.pick(self.engine.panel(company, Some(as_of))))
    }
}

fn describe(key: &str) -> &'static str {
    get_metric_info(key).map_or("", |info| info.definition)
}

/// Every headline metric, in registry order.
#[must_use]
pub fn all_metrics(config: &MetricsConfig) -> Vec<Box<dyn Metric>> {
    vec![
        Box::new(ProfitabilityMetric::new(ProfitabilityRatio::NetMargin, config.clone())),
        Box::new(ProfitabilityMetric::new(ProfitabilityRatio::ReturnOnEquity, config.clone())),
        Box::new(ProfitabilityMetric::new(
            ProfitabilityRatio::ReturnOnInvestedCapital,
            config.clone(),
        )),
        Box::new(MultipleMetric::new(Multiple::PriceEarnings)),
        Box::new(MultipleMetric::new(Multiple::PriceEarningsGrowth)),
        Box::new(GrowthMetric::new(GrowthSeries::Revenue, config.clone())),
        Box::new(GrowthMetric::new(GrowthSeries::FreeCashFlow, config.clone())),
        Box::new(GrowthMetric::new(GrowthSeries::Eps, config.clone())),
        Box::new(GrowthMetric::new(GrowthSeries::Dividends, config.clone())),
        Box::new(YtdMetric),
        Box::new(RsiMetric::new(config.rsi_window)),
    ]
}

/// The headline metric with the given key.
#[must_use]
pub fn metric_by_name(name: &str, config: &MetricsConfig) -> Option<Box<dyn Metric>> {
    all_metrics(config).into_iter().find(|m| m.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::available_metrics;
    use approx::assert_relative_eq;
    use bilan_traits::{CompanyProfile, LineItem, StatementTable, TimeSeries};

    fn as_of() -> Date {
        Date::from_ymd_opt(2025, 1, 31).unwrap()
    }

    fn company() -> CompanyFinancials {
        let mut profile = CompanyProfile::new("ACME");
        profile.trailing_pe = Some(22.0);
        profile.peg_ratio = Some(-1.0);
        profile.current_price = Some(110.0);
        let mut company = CompanyFinancials::new(profile);
        let periods = vec![Date::from_ymd_opt(2024, 12, 31).unwrap()];
        company.annual.income = StatementTable::new(
            periods.clone(),
            vec![
                LineItem::new("Net Income", vec![10.0]),
                LineItem::new("Total Revenue", vec![200.0]),
            ],
        )
        .unwrap();
        company.annual.balance = StatementTable::new(
            periods,
            vec![LineItem::new("Stockholders Equity", vec![100.0])],
        )
        .unwrap();
        company.prices = TimeSeries::new(vec![
            (Date::from_ymd_opt(2024, 12, 31).unwrap(), 100.0),
            (Date::from_ymd_opt(2025, 1, 2).unwrap(), 105.0),
        ]);
        company
    }

    #[test]
    fn test_every_registry_entry_has_a_metric() {
        let config = MetricsConfig::default();
        for info in available_metrics() {
            let metric = metric_by_name(info.key, &config);
            assert!(metric.is_some(), "no metric for {}", info.key);
            assert_eq!(metric.unwrap().description(), info.definition);
        }
        assert!(metric_by_name("nonexistent", &config).is_none());
    }

    #[test]
    fn test_profitability_metrics() {
        let config = MetricsConfig::default();
        let margin = metric_by_name("net_margin", &config).unwrap();
        assert_eq!(
            margin.compute(&company(), as_of()).unwrap(),
            Availability::Available(0.05)
        );
        let roe = metric_by_name("roe", &config).unwrap();
        assert_eq!(
            roe.compute(&company(), as_of()).unwrap(),
            Availability::Available(0.1)
        );
        let roic = metric_by_name("roic", &config).unwrap();
        assert!(!roic.compute(&company(), as_of()).unwrap().is_available());
    }

    #[test]
    fn test_multiples() {
        let per = MultipleMetric::new(Multiple::PriceEarnings);
        assert_eq!(
            per.compute(&company(), as_of()).unwrap(),
            Availability::Available(22.0)
        );
        let peg = MultipleMetric::new(Multiple::PriceEarningsGrowth);
        assert!(matches!(
            peg.compute(&company(), as_of()).unwrap().reason(),
            Some(UnavailableReason::Indeterminate(_))
        ));
    }

    #[test]
    fn test_ytd_metric() {
        let value = YtdMetric.compute(&company(), as_of()).unwrap();
        assert_relative_eq!(value.into_option().unwrap(), 10.0);
    }

    #[test]
    fn test_later_quote_ignored_for_past_dates() {
        let mut company = company();
        company.profile.quote_date = Date::from_ymd_opt(2025, 6, 2);

        let per = MultipleMetric::new(Multiple::PriceEarnings)
            .compute(&company, as_of())
            .unwrap();
        assert!(matches!(per.reason(), Some(UnavailableReason::MissingData(_))));

        // Latest close 105 against the 2024 close of 100
        let value = YtdMetric.compute(&company, as_of()).unwrap();
        assert_relative_eq!(value.into_option().unwrap(), 5.0);

        let today = Date::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(
            MultipleMetric::new(Multiple::PriceEarnings)
                .compute(&company, today)
                .unwrap(),
            Availability::Available(22.0)
        );
    }

    #[test]
    fn test_rsi_metric_needs_history() {
        let value = RsiMetric::default().compute(&company(), as_of()).unwrap();
        assert!(!value.is_available());
        let short = RsiMetric::new(2).compute(&company(), as_of()).unwrap();
        assert_eq!(short, Availability::Available(100.0));
    }

    #[test]
    fn test_zero_window_is_an_error() {
        assert!(RsiMetric::new(0).compute(&company(), as_of()).is_err());
    }
}
