//! Threshold classification and gauge encoding.
//!
//! Every headline value is mapped to a three-tier traffic light according to
//! a `[low, high]` threshold pair and a [`Direction`], and optionally placed
//! on a bounded gauge.

use bilan_traits::{Availability, BilanError, Result};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Traffic-light tier.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Favourable.
    #[display("good")]
    Good,
    /// Acceptable.
    #[display("mid")]
    Mid,
    /// Unfavourable, or no usable value.
    #[display("bad")]
    Bad,
}

impl Tier {
    /// Hex colour used when rendering the tier.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Good => "#37C36C",
            Self::Mid => "#FACF3D",
            Self::Bad => "#EA424B",
        }
    }

    /// Colour name of the tier.
    #[must_use]
    pub const fn color_name(&self) -> &'static str {
        match self {
            Self::Good => "green",
            Self::Mid => "yellow",
            Self::Bad => "red",
        }
    }
}

/// How a value relates to its thresholds.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Margins, returns, growth.
    #[display("higher_is_better")]
    HigherIsBetter,
    /// Multiples, drawdowns, volatility.
    #[display("lower_is_better")]
    LowerIsBetter,
    /// Oscillators and targets with an optimal band.
    #[display("range_optimal")]
    RangeOptimal,
}

impl FromStr for Direction {
    type Err = BilanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "higher_is_better" | "higher" => Ok(Self::HigherIsBetter),
            "lower_is_better" | "lower" => Ok(Self::LowerIsBetter),
            "range_optimal" | "range" => Ok(Self::RangeOptimal),
            other => Err(BilanError::InvalidConfiguration(format!(
                "unknown classification mode '{other}'"
            ))),
        }
    }
}

/// A `[low, high]` threshold pair with a direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdPolicy {
    low: f64,
    high: f64,
    direction: Direction,
}

impl ThresholdPolicy {
    /// Creates a policy.
    ///
    /// # Errors
    ///
    /// Returns [`BilanError::InvalidConfiguration`] if either bound is not
    /// finite or `low > high`.
    pub fn new(low: f64, high: f64, direction: Direction) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() {
            return Err(BilanError::InvalidConfiguration(format!(
                "thresholds must be finite, got [{low}, {high}]"
            )));
        }
        if low > high {
            return Err(BilanError::InvalidConfiguration(format!(
                "low threshold {low} exceeds high threshold {high}"
            )));
        }
        Ok(Self {
            low,
            high,
            direction,
        })
    }

    /// Lower threshold.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Upper threshold.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Tier of `value`. Non-finite values are [`Tier::Bad`].
    ///
    /// | direction | `< low` | `[low, high)` | `≥ high` |
    /// |---|---|---|---|
    /// | higher is better | bad | mid | good |
    /// | lower is better | good | mid | bad |
    ///
    /// Range-optimal is good on `[low, high]` and bad outside.
    #[must_use]
    pub fn classify(&self, value: f64) -> Tier {
        if !value.is_finite() {
            return Tier::Bad;
        }
        match self.direction {
            Direction::HigherIsBetter if value < self.low => Tier::Bad,
            Direction::HigherIsBetter if value < self.high => Tier::Mid,
            Direction::HigherIsBetter => Tier::Good,
            Direction::LowerIsBetter if value < self.low => Tier::Good,
            Direction::LowerIsBetter if value < self.high => Tier::Mid,
            Direction::LowerIsBetter => Tier::Bad,
            Direction::RangeOptimal if (self.low..=self.high).contains(&value) => Tier::Good,
            Direction::RangeOptimal => Tier::Bad,
        }
    }

    /// Classifies `value` and attaches its status text.
    #[must_use]
    pub fn assess(&self, value: f64, labels: &StatusLabels) -> Classification {
        let tier = self.classify(value);
        let status = if value.is_finite() {
            labels.label(tier)
        } else {
            labels.unavailable
        };
        Classification {
            value: Some(value).filter(|v| v.is_finite()),
            tier,
            color: tier.color(),
            status,
        }
    }

    /// Like [`assess`](Self::assess), for a value that may be unavailable.
    #[must_use]
    pub fn assess_availability(
        &self,
        value: &Availability<f64>,
        labels: &StatusLabels,
    ) -> Classification {
        self.assess(value.value().copied().unwrap_or(f64::NAN), labels)
    }
}

/// Status text per tier, plus the text used when no value exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusLabels {
    /// Text for [`Tier::Good`].
    pub good: &'static str,
    /// Text for [`Tier::Mid`].
    pub mid: &'static str,
    /// Text for [`Tier::Bad`].
    pub bad: &'static str,
    /// Text when the value is unavailable.
    pub unavailable: &'static str,
}

impl StatusLabels {
    /// Labels for profitability ratios.
    pub const PROFITABILITY: Self = Self {
        good: "High",
        mid: "Fair",
        bad: "Low",
        unavailable: "Not available",
    };

    /// Labels for price multiples such as the PER.
    pub const VALUATION: Self = Self {
        good: "Cheap",
        mid: "Fair",
        bad: "Expensive",
        unavailable: "Not profitable",
    };

    /// Labels for growth rates.
    pub const GROWTH: Self = Self {
        good: "Strong",
        mid: "Moderate",
        bad: "Weak",
        unavailable: "Not available",
    };

    /// Labels for band indicators such as the RSI.
    pub const RANGE: Self = Self {
        good: "Neutral",
        mid: "Borderline",
        bad: "Stretched",
        unavailable: "Not available",
    };

    /// Text for `tier`.
    #[must_use]
    pub const fn label(&self, tier: Tier) -> &'static str {
        match tier {
            Tier::Good => self.good,
            Tier::Mid => self.mid,
            Tier::Bad => self.bad,
        }
    }
}

/// A classified value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// The value, when finite.
    pub value: Option<f64>,
    /// Tier.
    pub tier: Tier,
    /// Hex colour of the tier.
    pub color: &'static str,
    /// Status text.
    pub status: &'static str,
}

/// A bounded gauge over a threshold policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gauge {
    min: f64,
    max: f64,
    policy: ThresholdPolicy,
}

/// A value placed on a [`Gauge`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeReading {
    /// Position on the gauge in `[0, 1]`, monotonic in the value.
    pub position: f64,
    /// Classification of the value.
    pub classification: Classification,
}

impl Gauge {
    /// Creates a gauge spanning `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`BilanError::InvalidConfiguration`] unless `min < max` and
    /// both are finite.
    pub fn new(min: f64, max: f64, policy: ThresholdPolicy) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(BilanError::InvalidConfiguration(format!(
                "gauge range [{min}, {max}] is empty or not finite"
            )));
        }
        Ok(Self { min, max, policy })
    }

    /// The threshold policy.
    #[must_use]
    pub const fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    /// Places `value` on the gauge. Out-of-range values pin to the ends;
    /// non-finite values sit at zero.
    #[must_use]
    pub fn read(&self, value: f64, labels: &StatusLabels) -> GaugeReading {
        let position = if value.is_finite() {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        GaugeReading {
            position,
            classification: self.policy.assess(value, labels),
        }
    }
}

/// Classifies `value` against `[low, high]` in the given direction.
///
/// # Errors
///
/// Returns [`BilanError::InvalidConfiguration`] for malformed thresholds.
pub fn classify(value: f64, low: f64, high: f64, direction: Direction) -> Result<Tier> {
    Ok(ThresholdPolicy::new(low, high, direction)?.classify(value))
}
