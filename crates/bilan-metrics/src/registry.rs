//! Metric registry for discovering and describing headline metrics.
//!
//! This module provides the glossary entry, default thresholds and
//! classification direction of every metric the dashboard reports.

use crate::classify::{Direction, StatusLabels, ThresholdPolicy};
use bilan_traits::Result;
use serde::Serialize;

/// Metric category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MetricCategory {
    /// Returns on sales, equity and capital
    Profitability,
    /// Price multiples
    Valuation,
    /// Multi-year growth rates
    Growth,
    /// Price performance and oscillators
    Momentum,
}

impl MetricCategory {
    /// Get a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &str {
        match self {
            Self::Profitability => "How much profit the business generates from sales and capital",
            Self::Valuation => "What the market charges for a unit of earnings or growth",
            Self::Growth => "Compound annual growth of revenue, cash flow, earnings and dividends",
            Self::Momentum => "Recent price performance and overbought/oversold oscillators",
        }
    }

    /// Parses a category name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "profitability" => Some(Self::Profitability),
            "valuation" => Some(Self::Valuation),
            "growth" => Some(Self::Growth),
            "momentum" => Some(Self::Momentum),
            _ => None,
        }
    }
}

/// How a metric's value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    /// A fraction shown as a percentage (0.12 → 12%).
    Ratio,
    /// A value already in percent.
    Percent,
    /// A multiple such as 18.5x.
    Multiple,
    /// A bounded index such as the RSI.
    Index,
}

/// Glossary entry and default classification for a metric.
#[derive(Debug, Clone, Serialize)]
pub struct MetricInfo {
    /// Unique identifier for the metric
    pub key: &'static str,

    /// Display title
    pub title: &'static str,

    /// Category classification
    pub category: MetricCategory,

    /// Formula
    pub definition: &'static str,

    /// What the value says about the business
    pub interpretation: &'static str,

    /// Caveat for reading the value
    pub tip: &'static str,

    /// Classification direction
    pub direction: Direction,

    /// Default `[low, high]` thresholds
    pub thresholds: [f64; 2],

    /// Display unit
    pub unit: Unit,
}

impl MetricInfo {
    /// The default threshold policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the thresholds are malformed.
    pub fn policy(&self) -> Result<ThresholdPolicy> {
        ThresholdPolicy::new(self.thresholds[0], self.thresholds[1], self.direction)
    }

    /// Status texts used when classifying this metric.
    #[must_use]
    pub const fn labels(&self) -> &'static StatusLabels {
        match (self.direction, self.category) {
            (Direction::RangeOptimal, _) => &StatusLabels::RANGE,
            (_, MetricCategory::Profitability) => &StatusLabels::PROFITABILITY,
            (_, MetricCategory::Valuation) => &StatusLabels::VALUATION,
            (_, MetricCategory::Growth | MetricCategory::Momentum) => &StatusLabels::GROWTH,
        }
    }
}

/// Get information about all available metrics.
#[must_use]
pub fn available_metrics() -> Vec<MetricInfo> {
    vec![
        // Profitability
        MetricInfo {
            key: "net_margin",
            title: "Net Margin",
            category: MetricCategory::Profitability,
            definition: "Net income / Revenue",
            interpretation: "Share of revenue left as profit after every expense, interest and tax. \
                A high and stable margin points to a profitable, robust business model.",
            tip: "Compare with companies of the same sector and over several years rather than a single period.",
            direction: Direction::HigherIsBetter,
            thresholds: [0.05, 0.10],
            unit: Unit::Ratio,
        },
        MetricInfo {
            key: "roe",
            title: "ROE (Return on Equity)",
            category: MetricCategory::Profitability,
            definition: "Net income / Shareholders' equity",
            interpretation: "Profit generated from the capital shareholders invested. \
                A high ROE reflects efficient use of equity.",
            tip: "Read alongside leverage: heavy debt shrinks equity and can inflate ROE.",
            direction: Direction::HigherIsBetter,
            thresholds: [0.08, 0.15],
            unit: Unit::Ratio,
        },
        MetricInfo {
            key: "roic",
            title: "ROIC (Return on Invested Capital)",
            category: MetricCategory::Profitability,
            definition: "NOPAT / (Debt + Equity - Cash), NOPAT = EBIT × (1 - tax rate)",
            interpretation: "Return earned on all capital invested, equity and debt alike. \
                More complete than ROE because it neutralizes leverage.",
            tip: "Compare with the cost of capital: value is created while ROIC exceeds WACC.",
            direction: Direction::HigherIsBetter,
            thresholds: [0.05, 0.10],
            unit: Unit::Ratio,
        },
        // Valuation
        MetricInfo {
            key: "per",
            title: "PER (Price/Earnings)",
            category: MetricCategory::Valuation,
            definition: "Share price / Earnings per share",
            interpretation: "Years of current earnings the market price represents.",
            tip: "Thresholds depend on the sector; a missing or zero PER means the company is not profitable.",
            direction: Direction::LowerIsBetter,
            thresholds: [15.0, 25.0],
            unit: Unit::Multiple,
        },
        MetricInfo {
            key: "peg",
            title: "PEG (PER/Growth)",
            category: MetricCategory::Valuation,
            definition: "PER / Expected earnings growth (%)",
            interpretation: "PER adjusted for growth; around 1 is commonly read as fairly priced.",
            tip: "Depends on growth forecasts, which are often optimistic.",
            direction: Direction::LowerIsBetter,
            thresholds: [1.0, 2.0],
            unit: Unit::Multiple,
        },
        // Growth
        MetricInfo {
            key: "revenue_cagr",
            title: "Revenue CAGR",
            category: MetricCategory::Growth,
            definition: "(Last revenue / First revenue)^(1 / years) - 1",
            interpretation: "Average yearly growth of sales over the reported years.",
            tip: "Acquisitions can inflate revenue growth without organic progress.",
            direction: Direction::HigherIsBetter,
            thresholds: [0.05, 0.10],
            unit: Unit::Ratio,
        },
        MetricInfo {
            key: "fcf_cagr",
            title: "Free Cash Flow CAGR",
            category: MetricCategory::Growth,
            definition: "CAGR of operating cash flow minus capital expenditure",
            interpretation: "Average yearly growth of the cash the business generates after investment.",
            tip: "Volatile for capital-intensive companies; a negative start uses a linear approximation.",
            direction: Direction::HigherIsBetter,
            thresholds: [0.05, 0.10],
            unit: Unit::Ratio,
        },
        MetricInfo {
            key: "eps_cagr",
            title: "EPS CAGR",
            category: MetricCategory::Growth,
            definition: "CAGR of diluted earnings per share",
            interpretation: "Average yearly growth of per-share earnings, net of dilution.",
            tip: "Buybacks raise EPS growth above net income growth.",
            direction: Direction::HigherIsBetter,
            thresholds: [0.05, 0.10],
            unit: Unit::Ratio,
        },
        MetricInfo {
            key: "dividend_cagr",
            title: "Dividend CAGR",
            category: MetricCategory::Growth,
            definition: "CAGR of dividends paid per share over complete calendar years",
            interpretation: "Average yearly growth of the dividend.",
            tip: "Check the payout ratio: dividends growing faster than earnings cannot last.",
            direction: Direction::HigherIsBetter,
            thresholds: [0.03, 0.07],
            unit: Unit::Ratio,
        },
        // Momentum
        MetricInfo {
            key: "ytd",
            title: "YTD Performance",
            category: MetricCategory::Momentum,
            definition: "(Price - Prior-year close) / Prior-year close × 100",
            interpretation: "Price change since the start of the calendar year.",
            tip: "Short horizon; says nothing about valuation.",
            direction: Direction::HigherIsBetter,
            thresholds: [0.0, 10.0],
            unit: Unit::Percent,
        },
        MetricInfo {
            key: "rsi",
            title: "RSI (14)",
            category: MetricCategory::Momentum,
            definition: "100 - 100 / (1 + average gain / average loss) over 14 sessions",
            interpretation: "Below 30 the stock is commonly considered oversold, above 70 overbought.",
            tip: "Strong trends can keep the RSI outside the band for long periods.",
            direction: Direction::RangeOptimal,
            thresholds: [30.0, 70.0],
            unit: Unit::Index,
        },
    ]
}

/// Get all metrics in a specific category.
#[must_use]
pub fn metrics_by_category(category: &MetricCategory) -> Vec<MetricInfo> {
    available_metrics()
        .into_iter()
        .filter(|info| &info.category == category)
        .collect()
}

/// Get information about a specific metric by key.
#[must_use]
pub fn get_metric_info(key: &str) -> Option<MetricInfo> {
    available_metrics().into_iter().find(|info| info.key == key)
}

/// Get all categories with metrics.
#[must_use]
pub fn available_categories() -> Vec<MetricCategory> {
    let mut categories: Vec<_> = available_metrics()
        .into_iter()
        .map(|info| info.category)
        .collect();
    categories.sort();
    categories.dedup();
    categories
}
