//! Renormalized window combination over the windows actually available.

use ndarray::{Array2, Zip};
use surge_traits::Result;

use crate::combiner::{Combiner, WindowScore, common_shape};

/// Weighted average of the windows that produced a z-score for each cell.
///
/// Each cell is `sum(weight * z) / sum(|weight|)` over the windows whose
/// z-score is defined for that cell; a cell with no defined window stays 0.
/// Unlike [`WeightedSumCombiner`](crate::WeightedSumCombiner), an instrument
/// with a partial history is scored on the same scale as one with full
/// history. Opt-in only: the engine defaults to the weighted sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailableWeightCombiner;

impl Combiner for AvailableWeightCombiner {
    fn combine(&self, windows: &[WindowScore]) -> Result<Array2<f64>> {
        let shape = common_shape(windows)?;
        let mut weighted = Array2::<f64>::zeros(shape);
        let mut available = Array2::<f64>::zeros(shape);

        for window in windows {
            let weight = window.weight;
            Zip::from(&mut weighted)
                .and(&mut available)
                .and(&window.z)
                .for_each(|sum, total, &z| {
                    if z.is_finite() {
                        *sum += weight * z;
                        *total += weight.abs();
                    }
                });
        }

        Zip::from(&mut weighted).and(&available).for_each(|sum, &total| {
            *sum = if total > 0.0 { *sum / total } else { 0.0 };
        });

        Ok(weighted)
    }

    fn name(&self) -> &str {
        "available_weight"
    }
}
