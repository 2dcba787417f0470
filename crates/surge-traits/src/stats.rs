//! Statistical utility functions for momentum scoring.
//!
//! Every helper here is `NaN`-aware: missing inputs produce missing outputs
//! instead of errors, which lets sparse histories flow through the pipeline.
//! Standard deviations use the sample (N-1) denominator throughout.

use ndarray::{Array1, ArrayView1, ArrayViewMut1};

/// Minimum threshold for standard deviation to avoid division by zero.
/// Values at or below this threshold are treated as zero variance.
pub const MIN_STD_THRESHOLD: f64 = 1e-10;

/// Z-score standardization result containing computed statistics.
#[derive(Debug, Clone, Copy)]
pub struct StandardizeResult {
    /// Mean of the finite input values.
    pub mean: f64,
    /// Sample standard deviation (N-1 denominator) of the finite input values.
    pub std: f64,
    /// Number of finite values the statistics were computed from.
    pub valid: usize,
    /// Whether z-scores were produced (false for degenerate cross-sections).
    pub applied: bool,
}

/// Mean and sample standard deviation of the finite values.
///
/// The deviation is `NaN` when fewer than two finite values exist.
fn finite_moments<'a>(values: impl Iterator<Item = &'a f64> + Clone) -> (f64, f64, usize) {
    let finite = values.filter(|x| x.is_finite());
    let n = finite.clone().count();
    if n == 0 {
        return (f64::NAN, f64::NAN, 0);
    }

    let mean = finite.clone().sum::<f64>() / n as f64;
    let std = if n > 1 {
        // Sample variance with N-1 denominator (Bessel's correction)
        (finite.map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    (mean, std, n)
}

/// Standardize a slice of values to cross-sectional z-scores.
///
/// Statistics are computed over the finite values only. Non-finite inputs map
/// to `NaN`. When fewer than two finite values exist or their standard
/// deviation is at most [`MIN_STD_THRESHOLD`], the whole output is `NaN`.
///
/// # Examples
///
/// ```
/// use surge_traits::stats::standardize;
///
/// let (z, result) = standardize(&[1.0, 2.0, f64::NAN, 3.0]);
///
/// assert!(result.applied);
/// assert_eq!(result.valid, 3);
/// assert!((z[0] + 1.0).abs() < 1e-12);
/// assert!(z[2].is_nan());
/// ```
pub fn standardize(values: &[f64]) -> (Vec<f64>, StandardizeResult) {
    let mut out = values.to_vec();
    let result = standardize_inplace(ArrayViewMut1::from(out.as_mut_slice()));
    (out, result)
}

/// Standardize one cross-section in place.
///
/// Same semantics as [`standardize`]; used row by row on score grids.
pub fn standardize_inplace(mut values: ArrayViewMut1<'_, f64>) -> StandardizeResult {
    let (mean, std, valid) = finite_moments(values.iter());
    let applied = valid >= 2 && std > MIN_STD_THRESHOLD;

    if applied {
        values.mapv_inplace(|x| {
            if x.is_finite() {
                (x - mean) / std
            } else {
                f64::NAN
            }
        });
    } else {
        values.fill(f64::NAN);
    }

    StandardizeResult {
        mean,
        std,
        valid,
        applied,
    }
}

/// Divide, treating an exactly-zero divisor as missing.
///
/// # Examples
///
/// ```
/// use surge_traits::stats::safe_div;
///
/// assert_eq!(safe_div(1.0, 4.0), 0.25);
/// assert!(safe_div(1.0, 0.0).is_nan());
/// ```
#[must_use]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Simple daily returns `p[t] / p[t-1] - 1`. The first element is `NaN`.
#[must_use]
pub fn pct_change(prices: ArrayView1<'_, f64>) -> Array1<f64> {
    period_return(prices, 1)
}

/// Period returns `p[t] / p[t-window] - 1`, `NaN` for `t < window`.
#[must_use]
pub fn period_return(prices: ArrayView1<'_, f64>, window: usize) -> Array1<f64> {
    Array1::from_shape_fn(prices.len(), |t| {
        if window == 0 || t < window {
            f64::NAN
        } else {
            prices[t] / prices[t - window] - 1.0
        }
    })
}

/// Trailing sample standard deviation over exactly `window` values.
///
/// The value at `t` covers `t-window+1..=t` and is `NaN` unless all of those
/// values are finite. Windows shorter than two are undefined.
#[must_use]
pub fn rolling_std(values: ArrayView1<'_, f64>, window: usize) -> Array1<f64> {
    let mut out = Array1::from_elem(values.len(), f64::NAN);
    if window < 2 || values.len() < window {
        return out;
    }

    for (start, slice) in values.windows(window).into_iter().enumerate() {
        if slice.iter().all(|x| x.is_finite()) {
            out[start + window - 1] = finite_moments(slice.iter()).1;
        }
    }

    out
}

/// Trailing maximum over exactly `window` values, `NaN` unless all are finite.
#[must_use]
pub fn rolling_max(values: ArrayView1<'_, f64>, window: usize) -> Array1<f64> {
    let mut out = Array1::from_elem(values.len(), f64::NAN);
    if window == 0 || values.len() < window {
        return out;
    }

    for (start, slice) in values.windows(window).into_iter().enumerate() {
        if slice.iter().all(|x| x.is_finite()) {
            out[start + window - 1] = slice.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        }
    }

    out
}

/// Recursive exponential moving average with `alpha = 2 / (span + 1)`.
///
/// Not adjusted for finite-sample bias: the first finite value seeds the
/// average and each later finite value `x` updates it to
/// `alpha * x + (1 - alpha) * ema`. Missing values keep their position: after
/// `k` missing rows the previous average is decayed by `(1 - alpha)^(k + 1)`
/// and the result renormalized, so a gap weighs the new value more heavily.
/// Missing positions repeat the previous average; positions before the first
/// finite value are `NaN`.
#[must_use]
pub fn ema(values: ArrayView1<'_, f64>, span: usize) -> Array1<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut current = f64::NAN;
    let mut gap = 0_i32;

    values
        .iter()
        .map(|&x| {
            if x.is_finite() {
                current = if current.is_nan() {
                    x
                } else {
                    let decay = (1.0 - alpha).powi(gap + 1);
                    (decay * current + alpha * x) / (decay + alpha)
                };
                gap = 0;
            } else if !current.is_nan() {
                gap = gap.saturating_add(1);
            }
            current
        })
        .collect()
}
