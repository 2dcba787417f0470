//! Core trait definition for window combiners.

use ndarray::Array2;
use surge_traits::{Result, SurgeError};

/// Cross-sectional z-scores of one lookback window.
///
/// `z` is a `dates x symbols` grid; `NaN` marks a cell where the window had
/// no defined z-score (short history, zero volatility, degenerate date).
#[derive(Debug, Clone)]
pub struct WindowScore {
    /// Window length in trading days.
    pub window: usize,

    /// Weight configured for this window.
    pub weight: f64,

    /// Per-date cross-sectional z-scores.
    pub z: Array2<f64>,
}

/// Combines per-window z-score grids into one composite grid.
///
/// All implementations must be thread-safe (Send + Sync).
///
/// # Examples
///
/// ```rust,no_run
/// use surge_combine::{Combiner, WindowScore};
/// use ndarray::Array2;
///
/// struct FirstWindowOnly;
///
/// impl Combiner for FirstWindowOnly {
///     fn combine(&self, windows: &[WindowScore]) -> surge_traits::Result<Array2<f64>> {
///         Ok(windows[0].z.mapv(|z| if z.is_finite() { z } else { 0.0 }))
///     }
///
///     fn name(&self) -> &str {
///         "first_window_only"
///     }
/// }
/// ```
pub trait Combiner: Send + Sync {
    /// Combine window z-scores into a composite score grid.
    ///
    /// # Errors
    ///
    /// Returns an error if no windows are given or the grids differ in shape.
    fn combine(&self, windows: &[WindowScore]) -> Result<Array2<f64>>;

    /// Name of this combination strategy.
    fn name(&self) -> &str;
}

/// Shared shape of all window grids.
pub(crate) fn common_shape(windows: &[WindowScore]) -> Result<(usize, usize)> {
    let first = windows
        .first()
        .ok_or_else(|| SurgeError::InvalidData("cannot combine zero windows".to_string()))?;
    let shape = first.z.dim();

    for window in windows {
        if window.z.dim() != shape {
            return Err(SurgeError::ShapeMismatch {
                expected: format!("{} x {}", shape.0, shape.1),
                actual: format!(
                    "{} x {} for the {}-day window",
                    window.z.nrows(),
                    window.z.ncols(),
                    window.window
                ),
            });
        }
    }

    Ok(shape)
}
