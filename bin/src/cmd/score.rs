//! Score command implementation.

use crate::{data, format};
use anyhow::{Result, anyhow};
use bilan::{
    Availability,
    metrics::{SectorThresholds, metric_by_name, registry::get_metric_info},
};
use std::path::Path;

/// Compute and classify one headline metric for a company.
pub(crate) async fn show_score(
    metric_name: &str,
    symbol: &str,
    as_of: Option<&str>,
    config: Option<&Path>,
    input: Option<&Path>,
) -> Result<()> {
    let config = data::load_config(config)?;
    let metric = metric_by_name(metric_name, &config)
        .ok_or_else(|| anyhow!("unknown metric '{metric_name}', see `bilan metrics`"))?;
    let info = get_metric_info(metric_name)
        .ok_or_else(|| anyhow!("metric '{metric_name}' has no registry entry"))?;

    let as_of = data::resolve_as_of(as_of)?;
    let company = data::load_company(symbol, input, &config, as_of).await?;
    let value = metric.compute(&company, as_of)?;

    let policy = if info.key == "per" {
        SectorThresholds::new(config.sector_overrides.clone())
            .per_policy(company.profile.sector.as_deref())?
    } else {
        info.policy()?
    };
    let classification = policy.assess_availability(&value, info.labels());

    println!("Metric: {} ({})", info.title, metric.description());
    println!("Symbol: {}", company.profile.symbol);
    println!("As of:  {as_of}");
    println!();
    println!("Value:  {}", format::availability(&value, info.unit));
    if let Availability::Unavailable(reason) = &value {
        println!("Reason: {reason}");
    }
    println!(
        "Status: {} ({})",
        classification.status,
        format::tier(classification.tier)
    );
    println!();

    Ok(())
}
