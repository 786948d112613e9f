//! FMP API client implementation.

use crate::{
    Result,
    convert::company_financials,
    error::FmpError,
    types::{
        BalanceSheet, CashFlowStatement, Dividend, FundamentalData, HistoricalPrice,
        IncomeStatement, KeyMetricsTtm, Period, Profile, Quote, RatiosTtm, Statements,
    },
};
use bilan_traits::CompanyFinancials;
use chrono::{Datelike, Local, NaiveDate};
use reqwest::Client;
use std::env;
use tracing::{debug, warn};

/// Base URL for the FMP stable API.
const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Financial Modeling Prep API client.
#[derive(Debug, Clone)]
pub struct FmpClient {
    client: Client,
    api_key: String,
}

impl FmpClient {
    /// Create a new FMP client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Create a new FMP client from the `FMP_API_KEY` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = env::var("FMP_API_KEY").map_err(|_| FmpError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Build a URL with the API key.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.contains('?') {
            format!("{FMP_BASE_URL}/{endpoint}&apikey={}", self.api_key)
        } else {
            format!("{FMP_BASE_URL}/{endpoint}?apikey={}", self.api_key)
        }
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        debug!(endpoint, "FMP request");
        let response = self.client.get(self.url(endpoint)).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FmpError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(FmpError::Api(format!("HTTP {status}: {text}")));
        }

        let text = response.text().await?;

        // Check for error responses
        if text.contains("\"Error Message\"") || text.contains("\"error\"") {
            return Err(FmpError::Api(text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch one statement endpoint.
    async fn statements<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<T>> {
        let limit_param = limit.map(|l| format!("&limit={l}")).unwrap_or_default();
        let endpoint = format!(
            "{endpoint}?symbol={}&period={}{}",
            symbol.to_uppercase(),
            period.as_str(),
            limit_param
        );
        self.get(&endpoint).await
    }

    /// Get income statements for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol (e.g., "AAPL")
    /// * `period` - Annual or quarterly
    /// * `limit` - Number of periods to return (most recent first)
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn income_statement(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<IncomeStatement>> {
        self.statements("income-statement", symbol, period, limit)
            .await
    }

    /// Get balance sheets for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn balance_sheet(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<BalanceSheet>> {
        self.statements("balance-sheet-statement", symbol, period, limit)
            .await
    }

    /// Get cash flow statements for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn cash_flow(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<CashFlowStatement>> {
        self.statements("cash-flow-statement", symbol, period, limit)
            .await
    }

    /// Get the company profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the symbol is unknown.
    pub async fn profile(&self, symbol: &str) -> Result<Profile> {
        let endpoint = format!("profile?symbol={}", symbol.to_uppercase());
        let profiles: Vec<Profile> = self.get(&endpoint).await?;
        profiles
            .into_iter()
            .next()
            .ok_or_else(|| FmpError::SymbolNotFound(symbol.to_string()))
    }

    /// Get real-time quote for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn quote(&self, symbol: &str) -> Result<Quote> {
        let endpoint = format!("quote?symbol={}", symbol.to_uppercase());
        let quotes: Vec<Quote> = self.get(&endpoint).await?;
        quotes
            .into_iter()
            .next()
            .ok_or_else(|| FmpError::SymbolNotFound(symbol.to_string()))
    }

    /// Get trailing-twelve-month ratios.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn ratios_ttm(&self, symbol: &str) -> Result<RatiosTtm> {
        let endpoint = format!("ratios-ttm?symbol={}", symbol.to_uppercase());
        let ratios: Vec<RatiosTtm> = self.get(&endpoint).await?;
        ratios
            .into_iter()
            .next()
            .ok_or_else(|| FmpError::NoData(format!("{symbol} TTM ratios")))
    }

    /// Get trailing-twelve-month key metrics.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn key_metrics_ttm(&self, symbol: &str) -> Result<KeyMetricsTtm> {
        let endpoint = format!("key-metrics-ttm?symbol={}", symbol.to_uppercase());
        let metrics: Vec<KeyMetricsTtm> = self.get(&endpoint).await?;
        metrics
            .into_iter()
            .next()
            .ok_or_else(|| FmpError::NoData(format!("{symbol} TTM key metrics")))
    }

    /// Get historical daily prices for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol
    /// * `from` - Start date (YYYY-MM-DD)
    /// * `to` - End date (YYYY-MM-DD)
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn historical_prices(
        &self,
        symbol: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<HistoricalPrice>> {
        let mut params = String::new();
        if let Some(f) = from {
            params.push_str(&format!("&from={f}"));
        }
        if let Some(t) = to {
            params.push_str(&format!("&to={t}"));
        }

        let endpoint = format!(
            "historical-price-eod/full?symbol={}{}",
            symbol.to_uppercase(),
            params
        );
        // The stable API returns a flat array, not a wrapped response
        self.get(&endpoint).await
    }

    /// Get the dividend history of a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn dividends(&self, symbol: &str) -> Result<Vec<Dividend>> {
        let endpoint = format!("dividends?symbol={}", symbol.to_uppercase());
        self.get(&endpoint).await
    }

    /// Fetch everything the dashboard needs for one symbol.
    ///
    /// All endpoints are requested concurrently. The annual income statement
    /// is required; any other endpoint that fails is logged and left empty.
    /// Prices are fetched from the start of the year before `as_of`. The
    /// profile, quote and TTM endpoints only serve current values, so the
    /// result is stamped with today's date as `quoted_on`.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol
    /// * `periods` - Number of annual and quarterly periods to fetch
    /// * `as_of` - Evaluation date
    ///
    /// # Errors
    ///
    /// Returns an error if the annual income statement cannot be fetched or
    /// is empty.
    pub async fn fundamental_data(
        &self,
        symbol: &str,
        periods: u32,
        as_of: NaiveDate,
    ) -> Result<FundamentalData> {
        let from = NaiveDate::from_ymd_opt(as_of.year() - 1, 1, 1)
            .map(|d| d.format("%Y-%m-%d").to_string());
        let to = as_of.format("%Y-%m-%d").to_string();

        let (
            income,
            balance,
            cash,
            q_income,
            q_balance,
            q_cash,
            profile,
            quote,
            ratios,
            key_metrics,
            prices,
            dividends,
        ) = tokio::join!(
            self.income_statement(symbol, Period::Annual, Some(periods)),
            self.balance_sheet(symbol, Period::Annual, Some(periods)),
            self.cash_flow(symbol, Period::Annual, Some(periods)),
            self.income_statement(symbol, Period::Quarter, Some(periods)),
            self.balance_sheet(symbol, Period::Quarter, Some(periods)),
            self.cash_flow(symbol, Period::Quarter, Some(periods)),
            self.profile(symbol),
            self.quote(symbol),
            self.ratios_ttm(symbol),
            self.key_metrics_ttm(symbol),
            self.historical_prices(symbol, from.as_deref(), Some(&to)),
            self.dividends(symbol),
        );

        let income = income?;
        if income.is_empty() {
            return Err(FmpError::NoData(symbol.to_uppercase()));
        }

        Ok(FundamentalData {
            symbol: symbol.to_uppercase(),
            profile: optional(symbol, "profile", profile),
            quote: optional(symbol, "quote", quote),
            ratios: optional(symbol, "ratios-ttm", ratios),
            key_metrics: optional(symbol, "key-metrics-ttm", key_metrics),
            annual: Statements {
                income,
                balance: optional(symbol, "balance sheet", balance).unwrap_or_default(),
                cash_flow: optional(symbol, "cash flow", cash).unwrap_or_default(),
            },
            quarterly: Statements {
                income: optional(symbol, "quarterly income", q_income).unwrap_or_default(),
                balance: optional(symbol, "quarterly balance sheet", q_balance)
                    .unwrap_or_default(),
                cash_flow: optional(symbol, "quarterly cash flow", q_cash).unwrap_or_default(),
            },
            prices: optional(symbol, "prices", prices).unwrap_or_default(),
            dividends: optional(symbol, "dividends", dividends).unwrap_or_default(),
            quoted_on: Some(Local::now().date_naive()),
        })
    }

    /// Fetch and convert everything for one symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Self::fundamental_data`] fails or the response
    /// cannot be converted.
    pub async fn company(
        &self,
        symbol: &str,
        periods: u32,
        as_of: NaiveDate,
    ) -> Result<CompanyFinancials> {
        let data = self.fundamental_data(symbol, periods, as_of).await?;
        company_financials(&data)
    }
}

fn optional<T>(symbol: &str, what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(symbol, what, error = %e, "FMP fetch failed, continuing without it");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = FmpClient::new("test_key");
        assert_eq!(
            client.url("quote?symbol=AAPL"),
            "https://financialmodelingprep.com/stable/quote?symbol=AAPL&apikey=test_key"
        );
        assert_eq!(
            client.url("profile"),
            "https://financialmodelingprep.com/stable/profile?apikey=test_key"
        );
    }

    #[test]
    fn test_optional_drops_errors() {
        assert_eq!(optional("AAPL", "quote", Ok(3)), Some(3));
        assert_eq!(
            optional::<i32>("AAPL", "quote", Err(FmpError::RateLimitExceeded)),
            None
        );
    }
}
