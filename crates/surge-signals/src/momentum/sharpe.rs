//! Volatility-adjusted momentum over a single lookback window.

use ndarray::{Array2, Axis, Zip};
use serde::{Deserialize, Serialize};
use surge_traits::{
    PriceMatrix,
    stats::{pct_change, period_return, rolling_std, safe_div, standardize_inplace},
};

/// Configuration for a single-window Sharpe momentum signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharpeMomentumConfig {
    /// Lookback window in trading days (default: 126 days ≈ 6 months)
    pub window: usize,
}

impl Default for SharpeMomentumConfig {
    fn default() -> Self {
        Self { window: 126 }
    }
}

/// Period return divided by the trailing volatility of daily returns.
///
/// For each instrument and date `t`:
///
/// `sharpe[t] = (P_t / P_{t-w} - 1) / std(r_{t-w+1..=t})`
///
/// where `r` are simple daily returns and `std` is the sample standard
/// deviation. The ratio is missing when there is not enough history, when any
/// input in the window is missing, or when the volatility is exactly zero.
/// It is not annualized.
///
/// [`zscores`](Self::zscores) then standardizes the ratio across instruments
/// on every date, rewarding risk-adjusted rather than raw momentum.
#[derive(Debug, Clone, Copy)]
pub struct SharpeMomentum {
    config: SharpeMomentumConfig,
}

impl SharpeMomentum {
    /// Create a new signal with the given configuration.
    #[must_use]
    pub const fn new(config: SharpeMomentumConfig) -> Self {
        Self { config }
    }

    /// Create a new signal for a window length.
    #[must_use]
    pub const fn with_window(window: usize) -> Self {
        Self::new(SharpeMomentumConfig { window })
    }

    /// Get the lookback window in days.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.config.window
    }

    /// Signal name, e.g. `sharpe_momentum_63d`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("sharpe_momentum_{}d", self.config.window)
    }

    /// Per-instrument Sharpe-like ratio for every date.
    #[must_use]
    pub fn sharpe(&self, prices: &PriceMatrix) -> Array2<f64> {
        let window = self.config.window;
        let values = prices.values();
        let mut out = Array2::from_elem(values.dim(), f64::NAN);

        for (column, mut target) in values.axis_iter(Axis(1)).zip(out.axis_iter_mut(Axis(1))) {
            let period = period_return(column, window);
            let vol = rolling_std(pct_change(column).view(), window);

            Zip::from(&mut target)
                .and(&period)
                .and(&vol)
                .for_each(|cell, &ret, &vol| *cell = safe_div(ret, vol));
        }

        out
    }

    /// Cross-sectional z-scores of the Sharpe-like ratio.
    ///
    /// A date with fewer than two defined ratios, or with zero dispersion,
    /// yields `NaN` for every instrument on that date.
    #[must_use]
    pub fn zscores(&self, prices: &PriceMatrix) -> Array2<f64> {
        let mut grid = self.sharpe(prices);
        for row in grid.axis_iter_mut(Axis(0)) {
            standardize_inplace(row);
        }
        grid
    }
}

impl Default for SharpeMomentum {
    fn default() -> Self {
        Self::new(SharpeMomentumConfig::default())
    }
}
