//! Relative strength index.

use bilan_traits::{Availability, BilanError, Date, Result, TimeSeries, UnavailableReason};
use serde::{Deserialize, Serialize};

/// Configuration for the RSI indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsiConfig {
    /// Number of observations averaged (default: 14)
    pub window: usize,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self { window: 14 }
    }
}

/// Relative strength index over daily closes.
///
/// Each close-to-close change is split into a gain and a loss (the first
/// observation has no predecessor and counts as a zero change). Both are
/// averaged with a simple moving average over the window, and
/// `RSI = 100 − 100 / (1 + avg_gain / avg_loss)`.
///
/// A window with no losses reads 100; a window with neither gains nor losses
/// reads 50. Non-finite closes are skipped: changes are taken between
/// neighbouring finite closes and the skipped entries read `None`.
///
/// # Example
///
/// ```
/// use bilan_metrics::momentum::{Rsi, RsiConfig};
///
/// let rsi = Rsi::new(RsiConfig { window: 3 });
/// let values = rsi.compute(&[1.0, 2.0, 3.0, 2.0]).unwrap();
/// assert_eq!(values[..2], [None, None]);
/// assert_eq!(values[2], Some(100.0));
/// ```
#[derive(Debug, Clone)]
pub struct Rsi {
    config: RsiConfig,
}

impl Rsi {
    /// Create a new RSI indicator with the given configuration.
    #[must_use]
    pub const fn new(config: RsiConfig) -> Self {
        Self { config }
    }

    /// Get the averaging window.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.config.window
    }

    /// RSI for every close; the first `window − 1` entries are `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BilanError::InvalidConfiguration`] when the window is zero.
    pub fn compute(&self, closes: &[f64]) -> Result<Vec<Option<f64>>> {
        let window = self.config.window;
        if window == 0 {
            return Err(BilanError::InvalidConfiguration(
                "RSI window must be positive".to_string(),
            ));
        }

        let finite: Vec<(usize, f64)> = closes
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .collect();

        let mut gains = Vec::with_capacity(finite.len());
        let mut losses = Vec::with_capacity(finite.len());
        gains.push(0.0);
        losses.push(0.0);
        for pair in finite.windows(2) {
            let delta = pair[1].1 - pair[0].1;
            gains.push(if delta > 0.0 { delta } else { 0.0 });
            losses.push(if delta < 0.0 { -delta } else { 0.0 });
        }
        gains.truncate(finite.len());
        losses.truncate(finite.len());

        let mut out = vec![None; closes.len()];
        for end in window..=finite.len() {
            let avg_gain = mean(&gains[end - window..end]);
            let avg_loss = mean(&losses[end - window..end]);
            out[finite[end - 1].0] = Some(index_value(avg_gain, avg_loss));
        }
        Ok(out)
    }

    /// RSI paired with the dates of a price series.
    ///
    /// # Errors
    ///
    /// Returns [`BilanError::InvalidConfiguration`] when the window is zero.
    pub fn compute_series(&self, prices: &TimeSeries) -> Result<Vec<(Date, Option<f64>)>> {
        let values = self.compute(&prices.values())?;
        Ok(prices
            .points()
            .iter()
            .map(|(d, _)| *d)
            .zip(values)
            .collect())
    }

    /// RSI at the most recent finite close.
    ///
    /// # Errors
    ///
    /// Returns [`BilanError::InvalidConfiguration`] when the window is zero.
    pub fn latest(&self, prices: &TimeSeries) -> Result<Availability<f64>> {
        let values = self.compute(&prices.values())?;
        Ok(Availability::from_option(
            values.iter().rev().find_map(|v| *v),
            UnavailableReason::missing(format!(
                "RSI needs {} closes, have {}",
                self.config.window,
                prices.len()
            )),
        ))
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(RsiConfig::default())
    }
}

/// [`Rsi::compute`] with an explicit window.
///
/// # Errors
///
/// Returns [`BilanError::InvalidConfiguration`] when `window` is zero.
pub fn rsi(closes: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    Rsi::new(RsiConfig { window }).compute(closes)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn index_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
