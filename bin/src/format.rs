//! Text formatting shared by the report commands.

use bilan::{Availability, Tier, metrics::registry::Unit};

/// Banner printed above every report.
pub(crate) fn banner(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{title:^62}║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

/// Section heading.
pub(crate) fn section(title: &str) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{title}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}

/// Formats a finite value in its display unit.
pub(crate) fn value(value: f64, unit: Unit) -> String {
    match unit {
        Unit::Ratio => format!("{:.1}%", value * 100.0),
        Unit::Percent => format!("{value:+.1}%"),
        Unit::Multiple => format!("{value:.1}x"),
        Unit::Index => format!("{value:.1}"),
    }
}

/// Formats a value that may be unavailable.
pub(crate) fn availability(avail: &Availability<f64>, unit: Unit) -> String {
    avail
        .value()
        .map_or_else(|| "n/a".to_string(), |v| value(*v, unit))
}

/// Colour name and tier, e.g. `green/good`.
pub(crate) fn tier(tier: Tier) -> String {
    format!("{}/{tier}", tier.color_name())
}
