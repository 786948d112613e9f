//! Explicit "computed or unavailable" results.
//!
//! A ratio that could not be computed must never be confused with a ratio
//! that computed to zero. Every engine that may fail on incomplete data
//! returns an [`Availability`] instead of a sentinel.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Why a value could not be produced.
#[derive(Debug, Display, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum UnavailableReason {
    /// A required line item, table, or price was absent.
    #[display("missing data: {_0}")]
    MissingData(String),
    /// The arithmetic has no meaningful answer (zero denominator,
    /// non-positive invested capital, fractional power of a negative base).
    #[display("indeterminate: {_0}")]
    Indeterminate(String),
}

impl UnavailableReason {
    /// Shorthand for [`UnavailableReason::MissingData`].
    pub fn missing(detail: impl Into<String>) -> Self {
        Self::MissingData(detail.into())
    }

    /// Shorthand for [`UnavailableReason::Indeterminate`].
    pub fn indeterminate(detail: impl Into<String>) -> Self {
        Self::Indeterminate(detail.into())
    }
}

/// A value that is either available or explicitly unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Availability<T> {
    /// The value was computed.
    Available(T),
    /// The value could not be computed.
    Unavailable(UnavailableReason),
}

impl<T> Availability<T> {
    /// Wraps an option, using `reason` when it is `None`.
    pub fn from_option(value: Option<T>, reason: UnavailableReason) -> Self {
        match value {
            Some(v) => Self::Available(v),
            None => Self::Unavailable(reason),
        }
    }

    /// Returns `true` if the value was computed.
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Returns a reference to the value, if available.
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Available(v) => Some(v),
            Self::Unavailable(_) => None,
        }
    }

    /// Converts into an option, discarding the reason.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Available(v) => Some(v),
            Self::Unavailable(_) => None,
        }
    }

    /// Returns the reason, if unavailable.
    pub const fn reason(&self) -> Option<&UnavailableReason> {
        match self {
            Self::Available(_) => None,
            Self::Unavailable(r) => Some(r),
        }
    }

    /// Borrows the contents.
    pub fn as_ref(&self) -> Availability<&T> {
        match self {
            Self::Available(v) => Availability::Available(v),
            Self::Unavailable(r) => Availability::Unavailable(r.clone()),
        }
    }

    /// Maps an available value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Availability<U> {
        match self {
            Self::Available(v) => Availability::Available(f(v)),
            Self::Unavailable(r) => Availability::Unavailable(r),
        }
    }

    /// Chains a computation that may itself be unavailable.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Availability<U>) -> Availability<U> {
        match self {
            Self::Available(v) => f(v),
            Self::Unavailable(r) => Availability::Unavailable(r),
        }
    }

    /// Returns the value or `default`.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Available(v) => v,
            Self::Unavailable(_) => default,
        }
    }
}

impl Availability<f64> {
    /// Wraps `value` if it is finite, otherwise reports it as indeterminate.
    pub fn finite(value: f64, context: &str) -> Self {
        if value.is_finite() {
            Self::Available(value)
        } else {
            Self::Unavailable(UnavailableReason::indeterminate(format!(
                "{context} is not finite"
            )))
        }
    }
}

impl<T> From<Availability<T>> for Option<T> {
    fn from(value: Availability<T>) -> Self {
        value.into_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_option() {
        let some = Availability::from_option(Some(1.5), UnavailableReason::missing("x"));
        assert_eq!(some, Availability::Available(1.5));

        let none: Availability<f64> =
            Availability::from_option(None, UnavailableReason::missing("revenue"));
        assert!(!none.is_available());
        assert_eq!(
            none.reason(),
            Some(&UnavailableReason::MissingData("revenue".to_string()))
        );
    }

    #[test]
    fn test_zero_is_not_unavailable() {
        let zero = Availability::Available(0.0);
        assert!(zero.is_available());
        assert_eq!(zero.value(), Some(&0.0));
    }

    #[test]
    fn test_finite_guard() {
        assert!(Availability::finite(0.2, "roic").is_available());
        assert!(!Availability::finite(f64::NAN, "roic").is_available());
        assert!(!Availability::finite(f64::INFINITY, "roic").is_available());
    }

    #[test]
    fn test_combinators() {
        let v = Availability::Available(2.0).map(|x| x * 2.0);
        assert_eq!(v.clone().unwrap_or(0.0), 4.0);

        let chained = v.and_then(|x| {
            if x > 10.0 {
                Availability::Available(x)
            } else {
                Availability::Unavailable(UnavailableReason::indeterminate("too small"))
            }
        });
        assert_eq!(chained.unwrap_or(-1.0), -1.0);
    }

    #[test]
    fn test_reason_display() {
        let reason = UnavailableReason::indeterminate("invested capital <= 0");
        assert_eq!(reason.to_string(), "indeterminate: invested capital <= 0");
    }

    #[test]
    fn test_serialize_tagged() {
        let unavailable: Availability<f64> =
            Availability::Unavailable(UnavailableReason::missing("ebit"));
        let json = serde_json::to_string(&unavailable).unwrap();
        assert_eq!(
            json,
            r#"{"status":"unavailable","value":{"kind":"missing_data","detail":"ebit"}}"#
        );

        let available = Availability::Available(0.25);
        let json = serde_json::to_string(&available).unwrap();
        assert_eq!(json, r#"{"status":"available","value":0.25}"#);
    }
}
