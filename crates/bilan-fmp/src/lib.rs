//! Financial Modeling Prep (FMP) data provider for bilan.
//!
//! This crate fetches statements, prices, dividends and profile data from
//! the [Financial Modeling Prep](https://financialmodelingprep.com/) API and
//! converts them into [`bilan_traits::CompanyFinancials`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use bilan_fmp::FmpClient;
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FmpClient::from_env()?;
//!     let as_of = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
//!
//!     // Fetch and convert everything for one symbol
//!     let company = client.company("AAPL", 5, as_of).await?;
//!     println!("{} annual periods", company.annual.income.periods().len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `FMP_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```

mod client;
pub mod convert;
mod error;
mod types;

pub use client::FmpClient;
pub use convert::company_financials;
pub use error::FmpError;
pub use types::*;

/// Result type for FMP operations.
pub type Result<T> = std::result::Result<T, FmpError>;
