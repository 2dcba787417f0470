//! Multi-horizon composite momentum score.

use surge_combine::{Combiner, WeightedSumCombiner, WindowScore};
use surge_traits::{MomentumParameters, PriceMatrix, Result, ScoreMatrix};
use tracing::debug;

use super::sharpe::SharpeMomentum;

/// Computes the composite momentum score over every configured window.
///
/// For each window `w` with weight `w_k` the engine computes the
/// [`SharpeMomentum`] z-scores, then hands all windows to the combiner. With
/// the default [`WeightedSumCombiner`] the score is
/// `sum_k(w_k * z_k)` with a missing z-score contributing 0.
///
/// The output has the same dates and symbols as the input and is finite
/// everywhere.
///
/// # Example
///
/// ```ignore
/// use surge_signals::ScoreEngine;
/// use surge_traits::MomentumParameters;
///
/// let engine = ScoreEngine::new(MomentumParameters::default());
/// let scores = engine.compute(&prices)?;
/// ```
#[derive(Debug, Clone)]
pub struct ScoreEngine<C = WeightedSumCombiner> {
    params: MomentumParameters,
    combiner: C,
}

impl ScoreEngine {
    /// Create an engine using the default weighted-sum combination.
    #[must_use]
    pub const fn new(params: MomentumParameters) -> Self {
        Self {
            params,
            combiner: WeightedSumCombiner,
        }
    }
}

impl<C: Combiner> ScoreEngine<C> {
    /// Replace the window combination strategy.
    #[must_use]
    pub fn with_combiner<D: Combiner>(self, combiner: D) -> ScoreEngine<D> {
        ScoreEngine {
            params: self.params,
            combiner,
        }
    }

    /// Parameters this engine scores with.
    #[must_use]
    pub const fn params(&self) -> &MomentumParameters {
        &self.params
    }

    /// The active combiner.
    #[must_use]
    pub const fn combiner(&self) -> &C {
        &self.combiner
    }

    /// Per-window z-score grids, in configured window order.
    #[must_use]
    pub fn window_scores(&self, prices: &PriceMatrix) -> Vec<WindowScore> {
        self.params
            .pairs()
            .map(|(window, weight)| {
                let z = SharpeMomentum::with_window(window).zscores(prices);
                debug!(
                    window,
                    weight,
                    defined = z.iter().filter(|v| v.is_finite()).count(),
                    "window z-scores computed"
                );
                WindowScore { window, weight, z }
            })
            .collect()
    }

    /// Composite score for every date and instrument.
    ///
    /// An input with no dates or no instruments yields an empty matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the combiner rejects the window grids.
    pub fn compute(&self, prices: &PriceMatrix) -> Result<ScoreMatrix> {
        if prices.is_empty() {
            debug!("empty price matrix, nothing to score");
            return Ok(ScoreMatrix::empty());
        }

        let windows = self.window_scores(prices);
        let composite = self.combiner.combine(&windows)?;

        debug!(
            dates = prices.n_dates(),
            symbols = prices.n_symbols(),
            combiner = self.combiner.name(),
            "composite scores computed"
        );

        ScoreMatrix::aligned_with(prices, composite)
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new(MomentumParameters::default())
    }
}

/// Composite momentum scores with the default combination.
///
/// # Errors
///
/// Returns an error if the score grid cannot be aligned with `prices`.
pub fn compute_scores(prices: &PriceMatrix, params: &MomentumParameters) -> Result<ScoreMatrix> {
    ScoreEngine::new(params.clone()).compute(prices)
}
