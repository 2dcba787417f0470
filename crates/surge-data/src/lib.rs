//! Data collaborators for the Surge momentum pipeline.
//!
//! The scoring core performs no I/O. This crate supplies its inputs:
//!
//! - [`NseUniverse`]: members of NSE indices from the niftyindices.com
//!   constituent files, with placeholder rows removed and `.NS` appended
//! - [`FmpPrices`]: adjusted close history from the
//!   [Financial Modeling Prep](https://financialmodelingprep.com/) API,
//!   aligned into a [`PriceMatrix`](surge_traits::PriceMatrix)
//!
//! # Usage
//!
//! ```rust,ignore
//! use surge_data::{FmpPrices, NseUniverse};
//! use surge_traits::{PriceProvider, UniverseProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let universe = NseUniverse::new(["NIFTY 50"])?;
//!     let symbols = universe.universe().await?;
//!
//!     let prices = FmpPrices::from_env()?.prices(&symbols, 500).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `FMP_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```

mod client;
mod constituents;
mod error;
mod prices;
mod retry;
mod types;

pub use client::FmpClient;
pub use constituents::{NSE_INDICES, NSE_SUFFIX, NseUniverse, index_url, parse_constituents};
pub use error::DataError;
pub use prices::{FmpPrices, calendar_days_for, to_history};
pub use retry::{RetryPolicy, is_transient};
pub use types::{Constituent, HistoricalPrice};

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
