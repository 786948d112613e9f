//! Data loading utilities for the bilan CLI.

use anyhow::{Context, Result};
use bilan::{
    BilanError, CompanyFinancials, Date, MetricsConfig, fmp::FmpClient, traits::parse_iso_date,
};
use chrono::Local;
use std::{fs, path::Path};
use tracing::info;

/// Parse a date string in YYYY-MM-DD format, defaulting to today.
pub(crate) fn resolve_as_of(as_of: Option<&str>) -> Result<Date, BilanError> {
    as_of.map_or_else(|| Ok(Local::now().date_naive()), parse_iso_date)
}

/// Load and validate the metric configuration.
///
/// Without a path the defaults are used.
pub(crate) fn load_config(path: Option<&Path>) -> Result<MetricsConfig> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => MetricsConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Load company data from a JSON file, or fetch it from FMP.
///
/// A single provider failure ends the invocation with
/// [`BilanError::UpstreamUnavailable`].
pub(crate) async fn load_company(
    symbol: &str,
    input: Option<&Path>,
    config: &MetricsConfig,
    as_of: Date,
) -> Result<CompanyFinancials> {
    if let Some(path) = input {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading company data {}", path.display()))?;
        let company: CompanyFinancials = serde_json::from_str(&text)
            .with_context(|| format!("parsing company data {}", path.display()))?;
        return Ok(company);
    }

    let client = FmpClient::from_env().map_err(BilanError::from)?;
    let periods = config
        .annual_history
        .max(config.quarterly_history + config.ttm_quarters);
    let periods = u32::try_from(periods).unwrap_or(u32::MAX);
    info!(symbol, periods, %as_of, "fetching company data from FMP");
    let company = client
        .company(symbol, periods, as_of)
        .await
        .map_err(BilanError::from)?;
    Ok(company)
}
