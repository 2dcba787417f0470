//! Horizon registry for describing configured lookback windows.
//!
//! Maps window lengths to the calendar horizons they approximate so that
//! reports and the CLI can label windows the way traders talk about them.

use serde::{Deserialize, Serialize};
use surge_traits::MomentumParameters;

/// Trading days in a month, as used for horizon labels.
pub const TRADING_DAYS_PER_MONTH: usize = 21;

/// Metadata about one configured lookback window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonInfo {
    /// Window length in trading days
    pub window: usize,

    /// Short label, e.g. `3m` or `40d`
    pub label: String,

    /// Weight in the composite score
    pub weight: f64,

    /// Share of the total absolute weight
    pub share: f64,
}

/// Short label for a window length.
///
/// Whole months of [`TRADING_DAYS_PER_MONTH`] days are labelled in months,
/// anything else in days.
///
/// ```
/// use surge_signals::registry::horizon_label;
///
/// assert_eq!(horizon_label(63), "3m");
/// assert_eq!(horizon_label(252), "12m");
/// assert_eq!(horizon_label(40), "40d");
/// ```
#[must_use]
pub fn horizon_label(window: usize) -> String {
    if window > 0 && window % TRADING_DAYS_PER_MONTH == 0 {
        format!("{}m", window / TRADING_DAYS_PER_MONTH)
    } else {
        format!("{window}d")
    }
}

/// Describe every configured window, in configured order.
#[must_use]
pub fn horizons(params: &MomentumParameters) -> Vec<HorizonInfo> {
    let total: f64 = params.weights().iter().map(|w| w.abs()).sum();

    params
        .pairs()
        .map(|(window, weight)| HorizonInfo {
            window,
            label: horizon_label(window),
            weight,
            share: if total > 0.0 { weight.abs() / total } else { 0.0 },
        })
        .collect()
}
