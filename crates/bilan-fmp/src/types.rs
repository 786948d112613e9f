//! Data types for FMP API responses.
//!
//! Numeric fields are optional: FMP returns `null` or omits fields it does
//! not have, and a missing value must stay distinguishable from zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reporting period for financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// Annual reports (10-K filings).
    #[default]
    Annual,
    /// Quarterly reports (10-Q filings).
    Quarter,
}

impl Period {
    /// Get the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarter => "quarter",
        }
    }
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Income statement data from FMP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeStatement {
    /// Fiscal period end date.
    pub date: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Reporting period (FY, Q1..Q4).
    pub period: String,
    /// Total revenue.
    pub revenue: Option<f64>,
    /// Operating income.
    pub operating_income: Option<f64>,
    /// Earnings before interest and taxes.
    pub ebit: Option<f64>,
    /// Interest expense.
    pub interest_expense: Option<f64>,
    /// Income before income taxes.
    pub income_before_tax: Option<f64>,
    /// Income tax expense.
    pub income_tax_expense: Option<f64>,
    /// Net income.
    pub net_income: Option<f64>,
    /// Earnings per share (diluted).
    pub eps_diluted: Option<f64>,
}

impl IncomeStatement {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Balance sheet data from FMP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceSheet {
    /// Fiscal period end date.
    pub date: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Reporting period.
    pub period: String,
    /// Cash and cash equivalents.
    pub cash_and_cash_equivalents: Option<f64>,
    /// Cash, equivalents and short-term investments.
    pub cash_and_short_term_investments: Option<f64>,
    /// Total debt.
    pub total_debt: Option<f64>,
    /// Total stockholders' equity.
    pub total_stockholders_equity: Option<f64>,
}

impl BalanceSheet {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Cash flow statement data from FMP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CashFlowStatement {
    /// Fiscal period end date.
    pub date: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Reporting period.
    pub period: String,
    /// Operating cash flow.
    pub operating_cash_flow: Option<f64>,
    /// Capital expenditure, reported negative.
    pub capital_expenditure: Option<f64>,
    /// Free cash flow.
    pub free_cash_flow: Option<f64>,
}

impl CashFlowStatement {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Company profile from FMP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    /// Ticker symbol.
    pub symbol: String,
    /// Company name.
    pub company_name: Option<String>,
    /// Sector label.
    pub sector: Option<String>,
    /// Reporting currency.
    pub currency: Option<String>,
    /// Latest price.
    pub price: Option<f64>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
}

/// Trailing-twelve-month ratios from FMP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RatiosTtm {
    /// Ticker symbol.
    pub symbol: String,
    /// Trailing price to earnings.
    #[serde(rename = "priceToEarningsRatioTTM")]
    pub price_to_earnings: Option<f64>,
    /// Price/earnings-to-growth.
    #[serde(rename = "priceToEarningsGrowthRatioTTM")]
    pub price_to_earnings_growth: Option<f64>,
    /// Net profit margin.
    #[serde(rename = "netProfitMarginTTM")]
    pub net_profit_margin: Option<f64>,
    /// Book value per share.
    #[serde(rename = "bookValuePerShareTTM")]
    pub book_value_per_share: Option<f64>,
}

/// Trailing-twelve-month key metrics from FMP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyMetricsTtm {
    /// Ticker symbol.
    pub symbol: String,
    /// Return on equity.
    #[serde(rename = "returnOnEquityTTM")]
    pub return_on_equity: Option<f64>,
}

/// Real-time quote data from FMP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quote {
    /// Ticker symbol.
    pub symbol: String,
    /// Company name.
    pub name: Option<String>,
    /// Current price.
    pub price: Option<f64>,
    /// Market cap.
    pub market_cap: Option<f64>,
    /// Shares outstanding.
    pub shares_outstanding: Option<f64>,
    /// P/E ratio.
    pub pe: Option<f64>,
}

/// Historical end-of-day price from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPrice {
    /// Date.
    pub date: String,
    /// Close price.
    pub close: f64,
    /// Adjusted close.
    #[serde(rename = "adjClose", default)]
    pub adj_close: Option<f64>,
}

impl HistoricalPrice {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// One dividend payment from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dividend {
    /// Ex-dividend date.
    pub date: String,
    /// Dividend per share as declared.
    #[serde(default)]
    pub dividend: Option<f64>,
    /// Split-adjusted dividend per share.
    #[serde(default)]
    pub adj_dividend: Option<f64>,
}

impl Dividend {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// The split-adjusted amount, falling back to the declared one.
    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        self.adj_dividend.or(self.dividend)
    }
}

/// Statements at one reporting frequency.
#[derive(Debug, Clone, Default)]
pub struct Statements {
    /// Income statements (most recent first).
    pub income: Vec<IncomeStatement>,
    /// Balance sheets (most recent first).
    pub balance: Vec<BalanceSheet>,
    /// Cash flow statements (most recent first).
    pub cash_flow: Vec<CashFlowStatement>,
}

/// Everything fetched for one symbol.
#[derive(Debug, Clone, Default)]
pub struct FundamentalData {
    /// Ticker symbol.
    pub symbol: String,
    /// Company profile.
    pub profile: Option<Profile>,
    /// Current quote.
    pub quote: Option<Quote>,
    /// Trailing ratios.
    pub ratios: Option<RatiosTtm>,
    /// Trailing key metrics.
    pub key_metrics: Option<KeyMetricsTtm>,
    /// Annual statements.
    pub annual: Statements,
    /// Quarterly statements.
    pub quarterly: Statements,
    /// Daily prices (most recent first, as FMP returns them).
    pub prices: Vec<HistoricalPrice>,
    /// Dividend history.
    pub dividends: Vec<Dividend>,
    /// Day the profile, quote and TTM endpoints were read.
    pub quoted_on: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_income_statement_nulls_stay_missing() {
        let json = r#"{
            "date": "2024-09-28",
            "symbol": "AAPL",
            "period": "FY",
            "revenue": 391035000000,
            "ebit": null,
            "incomeBeforeTax": 123485000000,
            "epsDiluted": 6.08
        }"#;
        let statement: IncomeStatement = serde_json::from_str(json).unwrap();
        assert_eq!(statement.revenue, Some(391_035_000_000.0));
        assert_eq!(statement.ebit, None);
        assert_eq!(statement.net_income, None);
        assert_eq!(statement.eps_diluted, Some(6.08));
        assert_eq!(statement.parsed_date(), NaiveDate::from_ymd_opt(2024, 9, 28));
    }

    #[test]
    fn test_ratios_ttm_field_names() {
        let json = r#"{"symbol":"AAPL","priceToEarningsRatioTTM":37.2,"priceToEarningsGrowthRatioTTM":2.1}"#;
        let ratios: RatiosTtm = serde_json::from_str(json).unwrap();
        assert_eq!(ratios.price_to_earnings, Some(37.2));
        assert_eq!(ratios.price_to_earnings_growth, Some(2.1));
        assert_eq!(ratios.net_profit_margin, None);
    }

    #[test]
    fn test_dividend_amount_prefers_adjusted() {
        let json = r#"{"date":"2024-11-08","dividend":0.25,"adjDividend":0.24}"#;
        let dividend: Dividend = serde_json::from_str(json).unwrap();
        assert_eq!(dividend.amount(), Some(0.24));
    }

    #[test]
    fn test_period_param() {
        assert_eq!(Period::Annual.as_str(), "annual");
        assert_eq!(Period::Quarter.as_str(), "quarter");
    }
}
