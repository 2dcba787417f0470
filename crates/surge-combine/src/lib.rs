//! Window combination strategies for the Surge momentum score.
//!
//! The score engine produces one cross-sectional z-score grid per lookback
//! window. A [`Combiner`] folds those grids into the composite score.
//!
//! - [`WeightedSumCombiner`]: `sum(weight * z)` with missing z-scores as 0,
//!   weights used as configured. This is the engine default.
//! - [`AvailableWeightCombiner`]: renormalizes each cell by the weights of the
//!   windows that were available for it.
//!
//! # Examples
//!
//! ```rust,no_run
//! use surge_combine::{Combiner, WeightedSumCombiner, WindowScore};
//! use ndarray::array;
//!
//! let windows = vec![
//!     WindowScore { window: 21, weight: 0.1, z: array![[0.5, -0.5]] },
//!     WindowScore { window: 63, weight: 0.3, z: array![[1.0, -1.0]] },
//! ];
//!
//! let composite = WeightedSumCombiner.combine(&windows).unwrap();
//! ```

mod available_weight;
mod combiner;
mod weighted_sum;

// Re-export main types
pub use available_weight::AvailableWeightCombiner;
pub use combiner::{Combiner, WindowScore};
pub use weighted_sum::WeightedSumCombiner;
