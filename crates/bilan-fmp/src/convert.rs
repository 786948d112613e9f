//! Conversion of FMP responses into the bilan input types.
//!
//! Statement rows are named with the display names the line-item catalogue
//! resolves first (`"Total Revenue"`, `"Net Income"`, ...). A field FMP left
//! null in every period produces no row at all, so the resolver falls through
//! to its next candidate instead of matching an all-missing row.

use crate::{
    Result,
    types::{
        BalanceSheet, CashFlowStatement, Dividend, FundamentalData, HistoricalPrice,
        IncomeStatement, Statements,
    },
};
use bilan_traits::{
    BilanError, CompanyFinancials, CompanyProfile, Date, LINE_ITEM_COLUMN, StatementSet,
    StatementTable, TimeSeries,
};
use polars::prelude::{Column, DataFrame};
use std::collections::HashSet;
use tracing::warn;

/// A dated statement record whose fields map onto named line items.
pub trait StatementRecord {
    /// Fiscal period end as reported.
    fn date(&self) -> &str;

    /// Line items in output row order.
    fn line_items(&self) -> Vec<(&'static str, Option<f64>)>;
}

impl StatementRecord for IncomeStatement {
    fn date(&self) -> &str {
        &self.date
    }

    fn line_items(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("Total Revenue", self.revenue),
            ("EBIT", self.ebit),
            ("Operating Income", self.operating_income),
            ("Interest Expense", self.interest_expense),
            ("Pretax Income", self.income_before_tax),
            ("Tax Provision", self.income_tax_expense),
            ("Net Income", self.net_income),
            ("Diluted EPS", self.eps_diluted),
        ]
    }
}

impl StatementRecord for BalanceSheet {
    fn date(&self) -> &str {
        &self.date
    }

    fn line_items(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("Total Debt", self.total_debt),
            ("Cash And Cash Equivalents", self.cash_and_cash_equivalents),
            (
                "Cash Cash Equivalents And Short Term Investments",
                self.cash_and_short_term_investments,
            ),
            ("Stockholders Equity", self.total_stockholders_equity),
        ]
    }
}

impl StatementRecord for CashFlowStatement {
    fn date(&self) -> &str {
        &self.date
    }

    fn line_items(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("Operating Cash Flow", self.operating_cash_flow),
            ("Capital Expenditure", self.capital_expenditure),
            ("Free Cash Flow", self.free_cash_flow),
        ]
    }
}

/// Builds a statement table from FMP records.
///
/// The records are laid out as a `line_item` + period-column DataFrame and
/// read back through [`StatementTable::from_dataframe`]. Records with an
/// unparseable date are skipped, as are repeated dates after the first. Null
/// fields become `NaN` cells.
///
/// # Errors
///
/// Returns an error if the resulting table is malformed.
pub fn statement_table<R: StatementRecord>(records: &[R]) -> Result<StatementTable> {
    let mut seen = HashSet::new();
    let mut periods = Vec::with_capacity(records.len());
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        let Ok(period) = Date::parse_from_str(record.date(), "%Y-%m-%d") else {
            warn!(date = record.date(), "skipping FMP statement with unparseable date");
            continue;
        };
        if !seen.insert(period) {
            warn!(%period, "skipping duplicate FMP statement period");
            continue;
        }
        periods.push(period);
        kept.push(record.line_items());
    }

    let Some(first) = kept.first() else {
        return Ok(StatementTable::empty());
    };
    let reported: Vec<usize> = (0..first.len())
        .filter(|&index| kept.iter().any(|items| items[index].1.is_some()))
        .collect();

    let names: Vec<&str> = reported.iter().map(|&index| first[index].0).collect();
    let mut columns = Vec::with_capacity(periods.len() + 1);
    columns.push(Column::new(LINE_ITEM_COLUMN.into(), names));
    for (period, items) in periods.iter().zip(&kept) {
        let cells: Vec<Option<f64>> = reported.iter().map(|&index| items[index].1).collect();
        columns.push(Column::new(
            period.format("%Y-%m-%d").to_string().into(),
            cells,
        ));
    }
    let frame = DataFrame::new(columns).map_err(BilanError::from)?;

    Ok(StatementTable::from_dataframe(&frame)?)
}

/// Builds the three statement tables of one frequency.
///
/// # Errors
///
/// Returns an error if any table is malformed.
pub fn statement_set(statements: &Statements) -> Result<StatementSet> {
    Ok(StatementSet {
        income: statement_table(&statements.income)?,
        balance: statement_table(&statements.balance)?,
        cash_flow: statement_table(&statements.cash_flow)?,
    })
}

/// Daily closes in ascending date order.
pub fn price_series(prices: &[HistoricalPrice]) -> TimeSeries {
    TimeSeries::new(
        prices
            .iter()
            .filter_map(|p| Some((p.parsed_date()?, p.close)))
            .collect(),
    )
}

/// Dividend payments per share in ascending date order.
pub fn dividend_series(dividends: &[Dividend]) -> TimeSeries {
    TimeSeries::new(
        dividends
            .iter()
            .filter_map(|d| Some((d.parsed_date()?, d.amount()?)))
            .collect(),
    )
}

/// Merges profile, quote, TTM ratios and the latest balance sheet into one
/// profile.
pub fn company_profile(data: &FundamentalData) -> CompanyProfile {
    let profile = data.profile.as_ref();
    let quote = data.quote.as_ref();
    let ratios = data.ratios.as_ref();

    let current_price = quote
        .and_then(|q| q.price)
        .or_else(|| profile.and_then(|p| p.price));
    let market_cap = quote
        .and_then(|q| q.market_cap)
        .or_else(|| profile.and_then(|p| p.market_cap));
    let shares_outstanding = quote.and_then(|q| q.shares_outstanding).or_else(|| {
        let price = current_price.filter(|p| *p > 0.0)?;
        Some(market_cap? / price)
    });
    let balance = data
        .quarterly
        .balance
        .first()
        .or_else(|| data.annual.balance.first());

    CompanyProfile {
        symbol: data.symbol.clone(),
        name: profile
            .and_then(|p| p.company_name.clone())
            .or_else(|| quote.and_then(|q| q.name.clone())),
        sector: profile.and_then(|p| p.sector.clone()),
        currency: profile.and_then(|p| p.currency.clone()),
        current_price,
        market_cap,
        shares_outstanding,
        book_value_per_share: ratios.and_then(|r| r.book_value_per_share),
        total_debt: balance.and_then(|b| b.total_debt),
        total_cash: balance.and_then(|b| {
            b.cash_and_short_term_investments
                .or(b.cash_and_cash_equivalents)
        }),
        trailing_pe: ratios
            .and_then(|r| r.price_to_earnings)
            .or_else(|| quote.and_then(|q| q.pe)),
        peg_ratio: ratios.and_then(|r| r.price_to_earnings_growth),
        profit_margin: ratios.and_then(|r| r.net_profit_margin),
        return_on_equity: data.key_metrics.as_ref().and_then(|k| k.return_on_equity),
        quote_date: data.quoted_on,
    }
}

/// Converts everything fetched for one symbol.
///
/// # Errors
///
/// Returns an error if any statement table is malformed.
pub fn company_financials(data: &FundamentalData) -> Result<CompanyFinancials> {
    Ok(CompanyFinancials {
        profile: company_profile(data),
        annual: statement_set(&data.annual)?,
        quarterly: statement_set(&data.quarterly)?,
        prices: price_series(&data.prices),
        dividends: dividend_series(&data.dividends),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Profile, Quote, RatiosTtm};

    fn income(date: &str, revenue: f64, net_income: Option<f64>) -> IncomeStatement {
        IncomeStatement {
            date: date.to_string(),
            symbol: "ACME".to_string(),
            period: "FY".to_string(),
            revenue: Some(revenue),
            net_income,
            ..IncomeStatement::default()
        }
    }

    #[test]
    fn test_statement_table_rows_and_periods() {
        let records = vec![
            income("2024-12-31", 200.0, Some(20.0)),
            income("2023-12-31", 150.0, None),
        ];
        let table = statement_table(&records).unwrap();
        assert_eq!(
            table.periods(),
            &[
                Date::from_ymd_opt(2024, 12, 31).unwrap(),
                Date::from_ymd_opt(2023, 12, 31).unwrap()
            ]
        );
        assert_eq!(
            table.line_items().collect::<Vec<_>>(),
            vec!["Total Revenue", "Net Income"]
        );
        let net = table.row("Net Income").unwrap().values();
        assert_eq!(net[0], 20.0);
        assert!(net[1].is_nan());
    }

    #[test]
    fn test_all_null_field_produces_no_row() {
        let table = statement_table(&[income("2024-12-31", 200.0, None)]).unwrap();
        assert!(!table.has_row("EBIT"));
        assert!(!table.has_row("Net Income"));
        assert!(table.has_row("Total Revenue"));
    }

    #[test]
    fn test_bad_and_duplicate_dates_skipped() {
        let records = vec![
            income("2024-12-31", 200.0, None),
            income("2024-12-31", 999.0, None),
            income("not a date", 1.0, None),
        ];
        let table = statement_table(&records).unwrap();
        assert_eq!(table.periods().len(), 1);
        assert_eq!(table.row("Total Revenue").unwrap().values(), vec![200.0]);
    }

    #[test]
    fn test_empty_records() {
        let records: Vec<IncomeStatement> = Vec::new();
        assert!(statement_table(&records).unwrap().is_empty());
    }

    #[test]
    fn test_company_profile_merge() {
        let data = FundamentalData {
            symbol: "ACME".to_string(),
            profile: Some(Profile {
                symbol: "ACME".to_string(),
                company_name: Some("Acme Corp".to_string()),
                sector: Some("Industrials".to_string()),
                price: Some(49.0),
                market_cap: Some(5_000.0),
                ..Profile::default()
            }),
            quote: Some(Quote {
                symbol: "ACME".to_string(),
                price: Some(50.0),
                ..Quote::default()
            }),
            ratios: Some(RatiosTtm {
                price_to_earnings: Some(18.0),
                ..RatiosTtm::default()
            }),
            annual: Statements {
                balance: vec![BalanceSheet {
                    date: "2024-12-31".to_string(),
                    total_debt: Some(300.0),
                    cash_and_cash_equivalents: Some(80.0),
                    ..BalanceSheet::default()
                }],
                ..Statements::default()
            },
            quoted_on: Date::from_ymd_opt(2025, 6, 2),
            ..FundamentalData::default()
        };
        let profile = company_profile(&data);
        assert_eq!(profile.name.as_deref(), Some("Acme Corp"));
        assert_eq!(profile.current_price, Some(50.0));
        assert_eq!(profile.shares_outstanding, Some(100.0));
        assert_eq!(profile.trailing_pe, Some(18.0));
        assert_eq!(profile.total_debt, Some(300.0));
        assert_eq!(profile.total_cash, Some(80.0));
        assert_eq!(profile.peg_ratio, None);
        assert_eq!(profile.quote_date, Date::from_ymd_opt(2025, 6, 2));
    }

    #[test]
    fn test_price_and_dividend_series_ascending() {
        let prices = vec![
            HistoricalPrice {
                date: "2024-01-03".to_string(),
                close: 11.0,
                adj_close: None,
            },
            HistoricalPrice {
                date: "2024-01-02".to_string(),
                close: 10.0,
                adj_close: None,
            },
        ];
        let series = price_series(&prices);
        assert_eq!(series.values(), vec![10.0, 11.0]);

        let dividends = vec![Dividend {
            date: "2024-05-10".to_string(),
            dividend: Some(0.25),
            adj_dividend: None,
        }];
        assert_eq!(dividend_series(&dividends).values(), vec![0.25]);
    }
}
