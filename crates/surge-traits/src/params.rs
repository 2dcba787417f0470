//! Validated momentum parameters.
//!
//! A [`MomentumParameters`] value can only be obtained through validation, so
//! the score engine never has to re-check it. Deserialization goes through the
//! same validation.

use crate::{Result, SurgeError};
use serde::{Deserialize, Serialize};

/// Default lookback windows in trading days (1, 3, 6, 9 and 12 months).
pub const DEFAULT_WINDOWS: [usize; 5] = [21, 63, 126, 189, 252];

/// Default weights paired with [`DEFAULT_WINDOWS`].
pub const DEFAULT_WEIGHTS: [f64; 5] = [0.1, 0.3, 0.3, 0.2, 0.1];

/// Default minimum number of observed prices an instrument needs to be scored.
pub const DEFAULT_MIN_HISTORY_DAYS: usize = 260;

/// Window lengths, their weights and the minimum-history threshold.
///
/// Weights are used as given: they need not sum to one and are never
/// renormalized by the engine, so scaling them scales the composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMomentumParameters", into = "RawMomentumParameters")]
pub struct MomentumParameters {
    windows: Vec<usize>,
    weights: Vec<f64>,
    min_history_days: usize,
}

impl MomentumParameters {
    /// Build a parameter set, rejecting inconsistent input up front.
    ///
    /// # Errors
    ///
    /// Returns [`SurgeError::InvalidParameters`] if the window and weight lists
    /// differ in length, are empty, contain a zero window or a non-finite weight.
    pub fn new(windows: Vec<usize>, weights: Vec<f64>, min_history_days: usize) -> Result<Self> {
        if windows.len() != weights.len() {
            return Err(SurgeError::InvalidParameters(format!(
                "{} windows but {} weights",
                windows.len(),
                weights.len()
            )));
        }
        if windows.is_empty() {
            return Err(SurgeError::InvalidParameters(
                "at least one window is required".to_string(),
            ));
        }
        if let Some(pos) = windows.iter().position(|&w| w == 0) {
            return Err(SurgeError::InvalidParameters(format!(
                "window at position {pos} is zero"
            )));
        }
        if let Some(pos) = weights.iter().position(|w| !w.is_finite()) {
            return Err(SurgeError::InvalidParameters(format!(
                "weight at position {pos} is not finite"
            )));
        }

        Ok(Self {
            windows,
            weights,
            min_history_days,
        })
    }

    /// Window lengths in trading days, in configuration order.
    #[must_use]
    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    /// Weights, parallel to [`windows`](Self::windows).
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Minimum number of observed prices required by the history filter.
    #[must_use]
    pub const fn min_history_days(&self) -> usize {
        self.min_history_days
    }

    /// `(window, weight)` pairs in configuration order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.windows
            .iter()
            .copied()
            .zip(self.weights.iter().copied())
    }

    /// Longest configured window.
    #[must_use]
    pub fn max_window(&self) -> usize {
        self.windows.iter().copied().max().unwrap_or(0)
    }

    /// Sum of the configured weights.
    #[must_use]
    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Number of rows needed before every window can produce a value.
    #[must_use]
    pub fn full_history_rows(&self) -> usize {
        self.max_window() + 1
    }

    /// Replace the minimum-history threshold.
    #[must_use]
    pub fn with_min_history_days(mut self, min_history_days: usize) -> Self {
        self.min_history_days = min_history_days;
        self
    }
}

impl Default for MomentumParameters {
    fn default() -> Self {
        Self {
            windows: DEFAULT_WINDOWS.to_vec(),
            weights: DEFAULT_WEIGHTS.to_vec(),
            min_history_days: DEFAULT_MIN_HISTORY_DAYS,
        }
    }
}

/// Unvalidated wire form of [`MomentumParameters`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawMomentumParameters {
    windows: Vec<usize>,
    weights: Vec<f64>,
    min_history_days: usize,
}

impl Default for RawMomentumParameters {
    fn default() -> Self {
        MomentumParameters::default().into()
    }
}

impl TryFrom<RawMomentumParameters> for MomentumParameters {
    type Error = SurgeError;

    fn try_from(raw: RawMomentumParameters) -> Result<Self> {
        Self::new(raw.windows, raw.weights, raw.min_history_days)
    }
}

impl From<MomentumParameters> for RawMomentumParameters {
    fn from(params: MomentumParameters) -> Self {
        Self {
            windows: params.windows,
            weights: params.weights,
            min_history_days: params.min_history_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_default_parameters() {
        let params = MomentumParameters::default();
        assert_eq!(params.windows(), &[21, 63, 126, 189, 252]);
        assert_eq!(params.weights(), &[0.1, 0.3, 0.3, 0.2, 0.1]);
        assert_eq!(params.min_history_days(), 260);
        assert_eq!(params.max_window(), 252);
        assert_eq!(params.full_history_rows(), 253);
        assert_relative_eq!(params.weight_sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_weights_are_not_normalized() {
        let params = MomentumParameters::new(vec![5, 10], vec![2.0, 3.0], 0).unwrap();
        assert_relative_eq!(params.weight_sum(), 5.0);
        let pairs: Vec<_> = params.pairs().collect();
        assert_eq!(pairs, vec![(5, 2.0), (10, 3.0)]);
    }

    #[rstest]
    #[case::length_mismatch(vec![21, 63], vec![0.5])]
    #[case::empty(vec![], vec![])]
    #[case::zero_window(vec![0, 63], vec![0.5, 0.5])]
    #[case::nan_weight(vec![21], vec![f64::NAN])]
    #[case::infinite_weight(vec![21], vec![f64::INFINITY])]
    fn test_invalid_parameters_rejected(#[case] windows: Vec<usize>, #[case] weights: Vec<f64>) {
        let result = MomentumParameters::new(windows, weights, 10);
        assert!(matches!(result, Err(SurgeError::InvalidParameters(_))));
    }

    #[test]
    fn test_with_min_history_days() {
        let params = MomentumParameters::default().with_min_history_days(100);
        assert_eq!(params.min_history_days(), 100);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: MomentumParameters =
            serde_json::from_str(r#"{"windows":[10,20],"weights":[1.0,1.0],"min_history_days":30}"#)
                .unwrap();
        assert_eq!(ok.windows(), &[10, 20]);
        assert_eq!(ok.min_history_days(), 30);

        let bad = serde_json::from_str::<MomentumParameters>(
            r#"{"windows":[10,20],"weights":[1.0]}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let params: MomentumParameters = serde_json::from_str(r#"{"min_history_days":120}"#).unwrap();
        assert_eq!(params.windows(), &DEFAULT_WINDOWS);
        assert_eq!(params.min_history_days(), 120);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let params = MomentumParameters::new(vec![3, 7], vec![0.25, 0.75], 9).unwrap();
        let json = serde_json::to_string(&params).unwrap();
        let back: MomentumParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }
}
