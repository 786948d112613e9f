//! Sector-relative PER thresholds.

use crate::classify::{Direction, ThresholdPolicy};
use bilan_traits::Result;
use std::collections::BTreeMap;

/// PER `[low, high]` used for sectors missing from the table.
pub const DEFAULT_PER_THRESHOLDS: [f64; 2] = [15.0, 25.0];

/// Built-in PER thresholds by sector.
pub const SECTOR_PER_THRESHOLDS: &[(&str, [f64; 2])] = &[
    ("Technology", [20.0, 35.0]),
    ("Financial Services", [12.0, 18.0]),
    ("Healthcare", [15.0, 25.0]),
    ("Consumer Cyclical", [15.0, 25.0]),
    ("Consumer Defensive", [18.0, 25.0]),
    ("Industrials", [12.0, 20.0]),
    ("Energy", [10.0, 15.0]),
    ("Real Estate", [12.0, 20.0]),
    ("Basic Materials", [10.0, 15.0]),
    ("Utilities", [12.0, 18.0]),
];

/// PER thresholds for `sector`, falling back to the default pair.
///
/// ```
/// use bilan_metrics::sector::per_thresholds;
///
/// assert_eq!(per_thresholds(Some("Technology")), [20.0, 35.0]);
/// assert_eq!(per_thresholds(Some("Communication Services")), [15.0, 25.0]);
/// assert_eq!(per_thresholds(None), [15.0, 25.0]);
/// ```
pub fn per_thresholds(sector: Option<&str>) -> [f64; 2] {
    sector
        .and_then(|s| {
            SECTOR_PER_THRESHOLDS
                .iter()
                .find(|(name, _)| *name == s)
                .map(|(_, pair)| *pair)
        })
        .unwrap_or(DEFAULT_PER_THRESHOLDS)
}

/// Sector thresholds with caller-supplied overrides taking precedence.
#[derive(Debug, Clone, Default)]
pub struct SectorThresholds {
    overrides: BTreeMap<String, [f64; 2]>,
}

impl SectorThresholds {
    /// Creates a table with the given overrides.
    #[must_use]
    pub const fn new(overrides: BTreeMap<String, [f64; 2]>) -> Self {
        Self { overrides }
    }

    /// PER thresholds for `sector`.
    #[must_use]
    pub fn per(&self, sector: Option<&str>) -> [f64; 2] {
        sector
            .and_then(|s| self.overrides.get(s).copied())
            .unwrap_or_else(|| per_thresholds(sector))
    }

    /// Lower-is-better PER policy for `sector`.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is not an ordered finite pair.
    pub fn per_policy(&self, sector: Option<&str>) -> Result<ThresholdPolicy> {
        let [low, high] = self.per(sector);
        ThresholdPolicy::new(low, high, Direction::LowerIsBetter)
    }
}
