//! Common types used throughout the bilan workspace.
//!
//! This module defines the company-level inputs every metric engine consumes:
//! the descriptive profile and the bundle of statements, prices and
//! dividends for one company.

use crate::{StatementTable, TimeSeries};
use derive_more::Display;
use serde::{Deserialize, Serialize};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A ticker symbol such as `"AAPL"`.
pub type Symbol = String;

/// Reporting frequency of a statement.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Fiscal-year statements.
    #[display("annual")]
    Annual,
    /// Fiscal-quarter statements.
    #[display("quarterly")]
    Quarterly,
}

/// Which of the three primary statements a table holds.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Income statement.
    #[display("income statement")]
    Income,
    /// Balance sheet.
    #[display("balance sheet")]
    Balance,
    /// Cash-flow statement.
    #[display("cash-flow statement")]
    CashFlow,
}

/// Point-in-time descriptive and market data for a company.
///
/// Every numeric field is optional: providers routinely omit some of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Company name.
    pub name: Option<String>,
    /// Sector label, e.g. `"Technology"`.
    pub sector: Option<String>,
    /// Reporting currency code.
    pub currency: Option<String>,
    /// Latest traded price.
    pub current_price: Option<f64>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Shares outstanding.
    pub shares_outstanding: Option<f64>,
    /// Book value per share.
    pub book_value_per_share: Option<f64>,
    /// Total debt.
    pub total_debt: Option<f64>,
    /// Cash and short-term investments.
    pub total_cash: Option<f64>,
    /// Trailing price-to-earnings ratio.
    pub trailing_pe: Option<f64>,
    /// Price/earnings-to-growth ratio.
    pub peg_ratio: Option<f64>,
    /// Provider-reported net profit margin, as a fraction.
    pub profit_margin: Option<f64>,
    /// Provider-reported return on equity, as a fraction.
    pub return_on_equity: Option<f64>,
    /// Date the price and multiples were quoted. `None` treats them as
    /// current at any evaluation date.
    pub quote_date: Option<Date>,
}

impl CompanyProfile {
    /// Creates an empty profile for `symbol`.
    pub fn new(symbol: impl Into<Symbol>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Whether the quoted price and multiples describe the market at `as_of`.
    ///
    /// A quote taken after `as_of` does not.
    pub fn quote_applies(&self, as_of: Date) -> bool {
        self.quote_date.is_none_or(|quoted| quoted <= as_of)
    }

    /// The quoted price, if it applies at `as_of`.
    pub fn price_at(&self, as_of: Date) -> Option<f64> {
        self.current_price.filter(|_| self.quote_applies(as_of))
    }

    /// Book equity implied by book value per share × shares outstanding.
    pub fn book_equity(&self) -> Option<f64> {
        Some(self.book_value_per_share? * self.shares_outstanding?)
    }
}

/// Annual or quarterly statements of one company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementSet {
    /// Income statement.
    pub income: StatementTable,
    /// Balance sheet.
    pub balance: StatementTable,
    /// Cash-flow statement.
    pub cash_flow: StatementTable,
}

impl StatementSet {
    /// The table of the given kind.
    pub const fn get(&self, kind: StatementKind) -> &StatementTable {
        match kind {
            StatementKind::Income => &self.income,
            StatementKind::Balance => &self.balance,
            StatementKind::CashFlow => &self.cash_flow,
        }
    }
}

/// Everything the metric engines need about one company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyFinancials {
    /// Descriptive and market data.
    pub profile: CompanyProfile,
    /// Fiscal-year statements.
    pub annual: StatementSet,
    /// Fiscal-quarter statements.
    pub quarterly: StatementSet,
    /// Daily closing prices, ascending.
    pub prices: TimeSeries,
    /// Dividend payments per share, ascending.
    pub dividends: TimeSeries,
}

impl CompanyFinancials {
    /// Creates an empty bundle for `profile`.
    pub fn new(profile: CompanyProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Statements at the given frequency.
    pub const fn statements(&self, frequency: Frequency) -> &StatementSet {
        match frequency {
            Frequency::Annual => &self.annual,
            Frequency::Quarterly => &self.quarterly,
        }
    }

    /// One statement table.
    pub const fn table(&self, frequency: Frequency, kind: StatementKind) -> &StatementTable {
        self.statements(frequency).get(kind)
    }
}
