//! Weighted-sum window combination, the default strategy.

use ndarray::{Array2, Zip};
use surge_traits::Result;

use crate::combiner::{Combiner, WindowScore, common_shape};

/// Sums `weight * z` over all windows, treating a missing z-score as 0.
///
/// Weights are applied as configured and never renormalized. An instrument
/// missing some windows is therefore scored as "average" on those windows,
/// which puts it on a smaller effective scale than an instrument with full
/// history. This is deliberate: one instrument's gap must not disqualify the
/// rest of the cross-section.
///
/// # Examples
///
/// ```rust
/// use surge_combine::{Combiner, WeightedSumCombiner, WindowScore};
/// use ndarray::array;
///
/// let windows = vec![
///     WindowScore { window: 21, weight: 0.25, z: array![[1.0, -1.0]] },
///     WindowScore { window: 63, weight: 0.75, z: array![[f64::NAN, 2.0]] },
/// ];
///
/// let composite = WeightedSumCombiner.combine(&windows).unwrap();
/// assert_eq!(composite, array![[0.25, 1.25]]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedSumCombiner;

impl Combiner for WeightedSumCombiner {
    fn combine(&self, windows: &[WindowScore]) -> Result<Array2<f64>> {
        let shape = common_shape(windows)?;
        let mut composite = Array2::<f64>::zeros(shape);

        for window in windows {
            let weight = window.weight;
            Zip::from(&mut composite).and(&window.z).for_each(|acc, &z| {
                if z.is_finite() {
                    *acc += weight * z;
                }
            });
        }

        Ok(composite)
    }

    fn name(&self) -> &str {
        "weighted_sum"
    }
}
