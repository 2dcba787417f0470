#![doc(issue_tracker_base_url = "https://github.com/factordynamics/surge/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # surge
//!
//! Volatility-adjusted multi-horizon momentum ranking for equities.
//!
//! surge is an umbrella crate that re-exports the surge sub-crates and adds
//! [`MomentumAnalyzer`], which runs the whole pipeline in one call.
//!
//! ## Quick Start
//!
//! ```ignore
//! use surge::{MomentumAnalyzer, MomentumParameters};
//! use surge::data::{FmpPrices, NseUniverse};
//!
//! # async fn run() -> surge::Result<()> {
//! let universe = NseUniverse::new(["NIFTY 50", "NIFTY NEXT 50"])?;
//! let prices = FmpPrices::from_env()?;
//!
//! let analysis = MomentumAnalyzer::new(MomentumParameters::default())
//!     .analyze_from(&universe, &prices, 400)
//!     .await?;
//!
//! for row in analysis.ranking.passed().take(20) {
//!     println!("{:>4} {:<14} {:+.2}", row.current_rank, row.symbol, row.rank_velocity);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Shared types, parameters, errors, statistics, provider traits
//! - [`combine`] - Window combination strategies
//! - [`signals`] - The momentum score engine
//! - [`rank`] - The ranking builder
//! - [`data`] - NSE universe and FMP price collaborators
//!
//! ## Architecture
//!
//! 1. **Providers** supply the universe and a `dates x symbols` price matrix
//! 2. The **history filter** drops instruments with too few prices
//! 3. The **score engine** turns prices into a composite score per date
//! 4. The **ranking builder** ranks the latest and look-back dates and
//!    applies the EMA and 52-week-high filters

mod pipeline;

/// The version of the surge crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared types and traits.
pub mod traits {
    pub use surge_traits::*;
}

/// Window combination strategies.
///
/// - **WeightedSumCombiner**: `sum(weight * z)`, missing z as 0 (default)
/// - **AvailableWeightCombiner**: renormalizes by the weights actually available
pub mod combine {
    pub use surge_combine::*;
}

/// The momentum score engine.
pub mod signals {
    pub use surge_signals::*;
}

/// The ranking builder.
pub mod rank {
    pub use surge_rank::*;
}

/// NSE index constituents and FMP price history.
///
/// ## Setup
///
/// 1. Get an API key at <https://financialmodelingprep.com/>
/// 2. Set the `FMP_API_KEY` environment variable or add it to a `.env` file
pub mod data {
    pub use surge_data::*;
}

pub use pipeline::{Analysis, MomentumAnalyzer};

// Re-export the everyday API at the top level
pub use surge_combine::{AvailableWeightCombiner, Combiner, WeightedSumCombiner};
pub use surge_rank::{RankingRow, RankingTable, build_ranking};
pub use surge_signals::{ScoreEngine, compute_scores};
pub use surge_traits::{
    Date, MomentumParameters, PriceMatrix, PriceProvider, Result, ScoreMatrix, SurgeError, Symbol,
    UniverseProvider,
};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use surge::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Analysis, Combiner, MomentumAnalyzer, MomentumParameters, PriceMatrix, PriceProvider,
        RankingTable, Result, ScoreMatrix, SurgeError, UniverseProvider, build_ranking,
        compute_scores,
    };
}
