//! Momentum score engine for the Surge ranking pipeline.
//!
//! For every date and instrument the engine measures how strongly the price
//! has trended over several horizons relative to its own volatility:
//!
//! - per window, `period return / trailing volatility` (a Sharpe-like ratio)
//! - per window and date, a z-score across the instrument universe
//! - a weighted combination of the window z-scores
//!
//! # Example
//!
//! ```ignore
//! use surge_signals::compute_scores;
//! use surge_traits::MomentumParameters;
//!
//! let scores = compute_scores(&prices, &MomentumParameters::default())?;
//! let today = scores.latest();
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod momentum;
pub mod registry;

// Re-export key types
pub use momentum::{ScoreEngine, SharpeMomentum, SharpeMomentumConfig, compute_scores};
pub use registry::{HorizonInfo, horizon_label, horizons};
