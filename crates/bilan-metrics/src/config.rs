//! Engine configuration.

use crate::normalize::TaxPolicy;
use bilan_traits::{BilanError, Frequency, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tunable constants shared by the metric engines.
///
/// Every field has a default, so a JSON config file only needs to list the
/// values it overrides.
///
/// # Example
///
/// ```
/// use bilan_metrics::MetricsConfig;
///
/// let config: MetricsConfig = serde_json::from_str(r#"{"rsi_window": 21}"#).unwrap();
/// assert_eq!(config.rsi_window, 21);
/// assert_eq!(config.default_tax_rate, 0.25);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Tax rate used when the effective rate is missing or implausible
    /// (default: 0.25)
    pub default_tax_rate: f64,

    /// Effective rates above this are replaced by the default (default: 0.5)
    pub max_tax_rate: f64,

    /// Annual periods kept in historical ratio tables (default: 5)
    pub annual_history: usize,

    /// Quarterly periods kept in historical ratio tables (default: 4)
    pub quarterly_history: usize,

    /// Quarters summed into a trailing-twelve-month figure (default: 4)
    pub ttm_quarters: usize,

    /// RSI averaging window in observations (default: 14)
    pub rsi_window: usize,

    /// Complete calendar years reported by dividend annualization (default: 4)
    pub dividend_years: usize,

    /// Length of the last-twelve-months event window in days (default: 365)
    pub ltm_days: i64,

    /// Per-sector PER `[low, high]` thresholds replacing the built-in table
    pub sector_overrides: BTreeMap<String, [f64; 2]>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            default_tax_rate: 0.25,
            max_tax_rate: 0.5,
            annual_history: 5,
            quarterly_history: 4,
            ttm_quarters: 4,
            rsi_window: 14,
            dividend_years: 4,
            ltm_days: 365,
            sector_overrides: BTreeMap::new(),
        }
    }
}

impl MetricsConfig {
    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`BilanError::InvalidConfiguration`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.max_tax_rate) {
            return Err(invalid(format!(
                "max_tax_rate must be within [0, 1], got {}",
                self.max_tax_rate
            )));
        }
        if !(0.0..=self.max_tax_rate).contains(&self.default_tax_rate) {
            return Err(invalid(format!(
                "default_tax_rate must be within [0, max_tax_rate], got {}",
                self.default_tax_rate
            )));
        }
        for (field, value) in [
            ("annual_history", self.annual_history),
            ("quarterly_history", self.quarterly_history),
            ("ttm_quarters", self.ttm_quarters),
            ("rsi_window", self.rsi_window),
            ("dividend_years", self.dividend_years),
        ] {
            if value == 0 {
                return Err(invalid(format!("{field} must be positive")));
            }
        }
        if self.ltm_days <= 0 {
            return Err(invalid(format!(
                "ltm_days must be positive, got {}",
                self.ltm_days
            )));
        }
        for (sector, [low, high]) in &self.sector_overrides {
            if !low.is_finite() || !high.is_finite() || low > high {
                return Err(invalid(format!(
                    "sector override for '{sector}' is not an ordered pair: [{low}, {high}]"
                )));
            }
        }
        Ok(())
    }

    /// Tax assumptions as a [`TaxPolicy`].
    #[must_use]
    pub const fn tax_policy(&self) -> TaxPolicy {
        TaxPolicy {
            default_rate: self.default_tax_rate,
            max_rate: self.max_tax_rate,
        }
    }

    /// Number of periods kept in a historical table at `frequency`.
    #[must_use]
    pub const fn history_cap(&self, frequency: Frequency) -> usize {
        match frequency {
            Frequency::Annual => self.annual_history,
            Frequency::Quarterly => self.quarterly_history,
        }
    }
}

fn invalid(message: String) -> BilanError {
    BilanError::InvalidConfiguration(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MetricsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history_cap(Frequency::Annual), 5);
        assert_eq!(config.history_cap(Frequency::Quarterly), 4);
    }

    #[test]
    fn test_rejects_zero_window() {
        let config = MetricsConfig {
            rsi_window: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("rsi_window"));
    }

    #[test]
    fn test_rejects_default_above_max() {
        let config = MetricsConfig {
            default_tax_rate: 0.6,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BilanError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rejects_unordered_override() {
        let mut config = MetricsConfig::default();
        config
            .sector_overrides
            .insert("Technology".to_string(), [40.0, 20.0]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let config: MetricsConfig =
            serde_json::from_str(r#"{"sector_overrides": {"Energy": [8.0, 12.0]}}"#).unwrap();
        assert_eq!(config.sector_overrides["Energy"], [8.0, 12.0]);
        assert_eq!(config.ltm_days, 365);
    }
}
