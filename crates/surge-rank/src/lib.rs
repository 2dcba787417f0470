//! Ranking builder for the Surge momentum pipeline.
//!
//! Turns a composite score history plus its price matrix into the latest
//! ranking table:
//! - current score, current rank and the ranks 1, 2 and 3 months ago
//! - rank velocity (`rank 1 month ago - current rank`, positive = improving)
//! - trend filters: close above its 50-period EMA, close within 20% of the
//!   252-day high, and their conjunction
//!
//! # Example
//!
//! ```rust,ignore
//! use surge_rank::build_ranking;
//!
//! let table = build_ranking(&prices, &scores);
//! let leaders: Vec<_> = table.passed().take(20).collect();
//! ```

pub mod builder;
pub mod offsets;
pub mod rank;
pub mod table;

// Re-export main types
pub use builder::{RankingBuilder, RankingConfig, build_ranking};
pub use offsets::LookbackOffsets;
pub use rank::{descending_ranks, ranked_count};
pub use table::{RankingRow, RankingTable};
