//! Collaborator traits for data acquisition.
//!
//! The scoring core never performs I/O. Whatever supplies the instrument
//! universe and its price history implements these traits, and hands the
//! core an already-normalized [`PriceMatrix`].

use crate::{PriceMatrix, Result, Symbol};
use std::future::Future;

/// Source of the instrument universe.
///
/// Implementations return identifiers deduplicated and sorted ascending, with
/// placeholder rows already removed.
pub trait UniverseProvider: Send + Sync {
    /// Fetches the current universe.
    ///
    /// # Errors
    ///
    /// Returns an error if the universe cannot be obtained at all.
    fn universe(&self) -> impl Future<Output = Result<Vec<Symbol>>> + Send;
}

/// Source of historical adjusted close prices.
pub trait PriceProvider: Send + Sync {
    /// Fetches roughly `lookback_days` trading days of prices ending today.
    ///
    /// Rows of the result are trading dates ascending, columns the requested
    /// symbols that could be fetched, and missing observations `NaN`. When
    /// nothing could be fetched the result is [`PriceMatrix::empty`].
    ///
    /// # Errors
    ///
    /// Returns an error if the provider itself is unusable (for example it
    /// lacks credentials).
    fn prices(
        &self,
        symbols: &[Symbol],
        lookback_days: usize,
    ) -> impl Future<Output = Result<PriceMatrix>> + Send;
}
