//! Price history from FMP assembled into a [`PriceMatrix`].

use crate::{Result, client::FmpClient, types::HistoricalPrice};
use chrono::{Days, NaiveDate, Utc};
use surge_traits::{Date, PriceMatrix, PriceProvider, Symbol};
use tracing::{debug, warn};

/// Calendar days to request for `trading_days` of history.
///
/// Roughly 252 trading days fit in 365 calendar days; the padding covers
/// holidays at the start of the range.
///
/// ```
/// use surge_data::calendar_days_for;
///
/// assert_eq!(calendar_days_for(252), 408);
/// ```
#[must_use]
pub const fn calendar_days_for(trading_days: usize) -> u64 {
    (trading_days as u64 * 3).div_ceil(2) + 30
}

/// Keeps dated, positive adjusted closes in date order.
#[must_use]
pub fn to_history(prices: &[HistoricalPrice]) -> Vec<(Date, f64)> {
    let mut history: Vec<(Date, f64)> = prices
        .iter()
        .filter_map(|p| {
            let close = p.adjusted_close();
            let date = p.parsed_date()?;
            (close.is_finite() && close > 0.0).then_some((date, close))
        })
        .collect();
    history.sort_by_key(|(date, _)| *date);
    history
}

/// [`PriceProvider`] backed by the FMP end-of-day endpoint.
#[derive(Debug, Clone)]
pub struct FmpPrices {
    client: FmpClient,
}

impl FmpPrices {
    /// Wrap an FMP client.
    #[must_use]
    pub const fn new(client: FmpClient) -> Self {
        Self { client }
    }

    /// Provider using the `FMP_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not set.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(FmpClient::from_env()?))
    }

    /// Adjusted close history of one symbol over `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn history(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<(Date, f64)>> {
        let raw = self
            .client
            .historical_prices(symbol, Some(from), Some(to))
            .await?;
        Ok(to_history(&raw))
    }

    /// Fetch every symbol one by one, calling `on_symbol` after each attempt.
    ///
    /// Symbols that fail or return no rows are logged and left out of the
    /// matrix. When nothing is fetched the matrix is empty.
    ///
    /// # Errors
    ///
    /// Returns an error only if the fetched histories cannot be assembled.
    pub async fn fetch_with<F>(
        &self,
        symbols: &[Symbol],
        lookback_days: usize,
        mut on_symbol: F,
    ) -> surge_traits::Result<PriceMatrix>
    where
        F: FnMut(&str) + Send,
    {
        let to = Utc::now().date_naive();
        let from = to
            .checked_sub_days(Days::new(calendar_days_for(lookback_days)))
            .unwrap_or(NaiveDate::MIN);

        let mut histories = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match self.history(symbol, from, to).await {
                Ok(history) if history.is_empty() => warn!(%symbol, "no price history, skipping"),
                Ok(history) => {
                    debug!(%symbol, rows = history.len(), "fetched price history");
                    histories.push((symbol.clone(), history));
                }
                Err(err) => warn!(%symbol, %err, "price fetch failed, skipping"),
            }
            on_symbol(symbol);
        }

        if histories.is_empty() {
            return Ok(PriceMatrix::empty());
        }

        PriceMatrix::from_histories(histories)
    }
}

impl PriceProvider for FmpPrices {
    async fn prices(&self, symbols: &[Symbol], lookback_days: usize) -> surge_traits::Result<PriceMatrix> {
        self.fetch_with(symbols, lookback_days, |_| {}).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64, adj: Option<f64>) -> HistoricalPrice {
        HistoricalPrice {
            date: date.to_string(),
            close,
            adj_close: adj,
            volume: 0.0,
        }
    }

    #[test]
    fn test_calendar_days() {
        assert_eq!(calendar_days_for(0), 30);
        assert_eq!(calendar_days_for(1), 32);
        assert_eq!(calendar_days_for(500), 780);
    }

    #[test]
    fn test_to_history_sorts_and_filters() {
        // FMP returns most recent first
        let raw = vec![
            bar("2024-03-05", 101.0, Some(100.5)),
            bar("not a date", 99.0, None),
            bar("2024-03-04", 0.0, None),
            bar("2024-03-01", 98.0, None),
        ];
        let history = to_history(&raw);
        assert_eq!(
            history,
            vec![
                (NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 98.0),
                (NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), 100.5),
            ]
        );
    }

    #[test]
    fn test_histories_assemble_on_date_union() {
        let a = to_history(&[bar("2024-03-01", 10.0, None), bar("2024-03-04", 11.0, None)]);
        let b = to_history(&[bar("2024-03-04", 20.0, None), bar("2024-03-05", 21.0, None)]);
        let matrix =
            PriceMatrix::from_histories(vec![("A.NS".to_string(), a), ("B.NS".to_string(), b)]).unwrap();

        assert_eq!(matrix.n_dates(), 3);
        assert_eq!(matrix.symbols(), ["A.NS", "B.NS"]);
        assert!(matrix.values()[[2, 0]].is_nan());
        assert!(matrix.values()[[0, 1]].is_nan());
        assert_eq!(matrix.latest_price("B.NS"), Some(21.0));
    }

    #[tokio::test]
    async fn test_fetch_nothing_is_empty_without_requests() {
        let provider = FmpPrices::new(FmpClient::new("test-key").unwrap());
        let mut seen = Vec::new();
        let matrix = provider
            .fetch_with(&[], 300, |symbol| seen.push(symbol.to_string()))
            .await
            .unwrap();

        assert!(matrix.is_empty());
        assert!(seen.is_empty());
        assert!(provider.prices(&[], 300).await.unwrap().is_empty());
    }
}
