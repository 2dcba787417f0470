//! Volatility-adjusted momentum across several lookback horizons.
//!
//! - [`SharpeMomentum`]: period return over one window divided by the
//!   trailing volatility of daily returns, standardized across instruments
//! - [`ScoreEngine`]: folds the per-window z-scores into the composite score
//!
//! Default horizons are 1, 3, 6, 9 and 12 months (21 to 252 trading days)
//! weighted `0.1, 0.3, 0.3, 0.2, 0.1`.

mod engine;
mod sharpe;

pub use engine::{ScoreEngine, compute_scores};
pub use sharpe::{SharpeMomentum, SharpeMomentumConfig};
