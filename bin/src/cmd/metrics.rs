//! Metric listing command implementation.

use crate::format;
use anyhow::{Result, bail};
use bilan::metrics::registry::{MetricCategory, available_categories, metrics_by_category};

/// List available metrics, optionally filtered by category.
pub(crate) fn list_metrics(category: Option<&str>, verbose: bool) -> Result<()> {
    format::banner("Available Metrics");

    let categories = match category {
        Some(name) => match MetricCategory::parse(name) {
            Some(category) => vec![category],
            None => bail!(
                "unknown category '{name}' (expected profitability, valuation, growth or momentum)"
            ),
        },
        None => available_categories(),
    };

    for category in categories {
        println!("{category:?}: {}", category.description());
        println!("{}", "-".repeat(60));

        for info in metrics_by_category(&category) {
            if verbose {
                println!("  {:15} {}", info.key, info.title);
                println!("  {:15} = {}", "", info.definition);
                println!("  {:15} {}", "", info.interpretation);
                println!("  {:15} Tip: {}", "", info.tip);
                println!(
                    "  {:15} {} on [{}, {}]",
                    "", info.direction, info.thresholds[0], info.thresholds[1]
                );
                println!();
            } else {
                println!("  {:15} {}", info.key, info.title);
            }
        }
        println!();
    }

    if !verbose {
        println!("Use --verbose for definitions and thresholds.\n");
    }

    Ok(())
}
