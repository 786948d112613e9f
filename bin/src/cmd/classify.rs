//! Classify command implementation.

use crate::format;
use anyhow::Result;
use bilan::metrics::{Direction, ThresholdPolicy};

/// Classify a single value and print its tier and colour.
pub(crate) fn classify_value(value: f64, low: f64, high: f64, mode: &str) -> Result<()> {
    let direction: Direction = mode.parse()?;
    let policy = ThresholdPolicy::new(low, high, direction)?;
    let tier = policy.classify(value);

    println!("Value:      {value}");
    println!("Thresholds: [{low}, {high}] ({direction})");
    println!("Tier:       {}", format::tier(tier));
    println!("Colour:     {}", tier.color());

    Ok(())
}
