//! Analyze command implementation.

use crate::{OutputFormat, data, format};
use anyhow::Result;
use bilan::{
    Dashboard, DashboardReport,
    metrics::{
        GaugeReading, MetricCategory,
        profitability::{PeriodRatios, ProfitabilityHistory, ProfitabilitySnapshot},
        registry::Unit,
    },
};
use std::path::Path;

/// Build and print the dashboard for one company.
pub(crate) async fn analyze(
    symbol: &str,
    as_of: Option<&str>,
    output: OutputFormat,
    config: Option<&Path>,
    input: Option<&Path>,
) -> Result<()> {
    let config = data::load_config(config)?;
    let as_of = data::resolve_as_of(as_of)?;
    let company = data::load_company(symbol, input, &config, as_of).await?;
    let report = Dashboard::new(config)?.analyze(&company, as_of)?;

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &DashboardReport) {
    format::banner(&format!("{} Dashboard", report.symbol));

    if let Some(name) = &report.name {
        println!("Company: {name}");
    }
    println!("Sector:  {}", report.sector.as_deref().unwrap_or("Unknown"));
    println!("As of:   {}", report.as_of);
    println!();

    for category in [
        MetricCategory::Profitability,
        MetricCategory::Valuation,
        MetricCategory::Growth,
        MetricCategory::Momentum,
    ] {
        format::section(&format!("{category:?}").to_uppercase());
        println!(
            "{:<36} {:>10} {:>18}  {}",
            "Metric", "Value", "Thresholds", "Status"
        );
        println!("{}", "─".repeat(80));
        for reading in report.category(category) {
            let [low, high] = reading.thresholds;
            println!(
                "{:<36} {:>10} {:>18}  {} ({})",
                reading.title,
                format::availability(&reading.value, reading.unit),
                format!(
                    "[{}, {}]",
                    format::value(low, reading.unit),
                    format::value(high, reading.unit)
                ),
                reading.classification.status,
                format::tier(reading.classification.tier),
            );
        }
        println!();

        match category {
            MetricCategory::Profitability => print_profitability(report),
            MetricCategory::Valuation => print_valuation(report),
            MetricCategory::Growth => print_dividends(report),
            MetricCategory::Momentum => print_ytd(report),
        }
    }
}

fn print_profitability(report: &DashboardReport) {
    let panel = &report.profitability;
    print_snapshot("Trailing twelve months", &panel.trailing);
    print_history(&panel.annual);
    print_history(&panel.quarterly);
    if let Some(trend) = panel.roic_trend {
        println!("ROIC trend: {trend}");
    }
    println!();
}

fn print_snapshot(label: &str, snapshot: &ProfitabilitySnapshot) {
    println!(
        "{label}: net margin {}, ROE {}, ROIC {}",
        format::availability(&snapshot.net_margin, Unit::Ratio),
        format::availability(&snapshot.roe, Unit::Ratio),
        format::availability(&snapshot.roic, Unit::Ratio),
    );
    println!();
}

fn print_history(history: &ProfitabilityHistory) {
    if history.is_empty() {
        println!(
            "No {} periods shared by income statement and balance sheet.\n",
            history.frequency
        );
        return;
    }
    println!(
        "{:<12} {:>12} {:>10} {:>10} {:>16}",
        history.frequency.to_string(),
        "Net margin",
        "ROE",
        "ROIC",
        "NOPAT"
    );
    for PeriodRatios {
        period,
        net_margin,
        roe,
        roic,
        nopat,
        ..
    } in &history.periods
    {
        println!(
            "{:<12} {:>12} {:>10} {:>10} {:>16}",
            period.to_string(),
            format::availability(net_margin, Unit::Ratio),
            format::availability(roe, Unit::Ratio),
            format::availability(roic, Unit::Ratio),
            nopat
                .value()
                .map_or_else(|| "n/a".to_string(), |v| format!("{v:.0}")),
        );
    }
    println!();
}

fn print_valuation(report: &DashboardReport) {
    let [low, high] = report.valuation.per_thresholds;
    println!("PER band for sector: [{low}, {high}]");
    println!("PER {}", gauge_bar(&report.valuation.per));
    println!("PEG {}", gauge_bar(&report.valuation.peg));
    println!();
}

fn gauge_bar(reading: &GaugeReading) -> String {
    const WIDTH: usize = 40;
    let filled = (reading.position * WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {}",
        "█".repeat(filled.min(WIDTH)),
        "░".repeat(WIDTH - filled.min(WIDTH)),
        reading.classification.status
    )
}

fn print_dividends(report: &DashboardReport) {
    let history = &report.growth.dividend_history;
    if history.annual.is_empty() {
        println!("No dividend history.\n");
        return;
    }
    println!("Dividends per share:");
    for bucket in history.buckets() {
        println!("  {:<8} {:>10.4}", bucket.label, bucket.total);
    }
    println!();
}

fn print_ytd(report: &DashboardReport) {
    match report.ytd.value() {
        Some(ytd) => println!(
            "YTD measured from the {} of {} on {} to {:.2}",
            ytd.reference, ytd.reference_price, ytd.reference_date, ytd.current_price
        ),
        None => println!("YTD not available."),
    }
    println!();
}
