//! FMP API client implementation.

use crate::{Result, error::DataError, types::HistoricalPrice};
use chrono::NaiveDate;
use reqwest::Client;
use std::{env, time::Duration};

/// Base URL for the FMP stable API.
const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Request timeout for API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Financial Modeling Prep API client.
#[derive(Debug, Clone)]
pub struct FmpClient {
    client: Client,
    api_key: String,
}

impl FmpClient {
    /// Create a new FMP client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }

    /// Create a new FMP client from the `FMP_API_KEY` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let api_key = env::var("FMP_API_KEY").map_err(|_| DataError::MissingApiKey)?;

        Self::new(api_key)
    }

    /// Build a URL with the API key.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.contains('?') {
            format!("{FMP_BASE_URL}/{endpoint}&apikey={}", self.api_key)
        } else {
            format!("{FMP_BASE_URL}/{endpoint}?apikey={}", self.api_key)
        }
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DataError::Api(format!("HTTP {status}: {text}")));
        }

        let text = response.text().await?;

        if text.contains("\"Error Message\"") || text.contains("\"error\"") {
            return Err(DataError::Api(text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Get historical daily prices for a symbol, most recent first.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Exchange-qualified ticker, e.g. `INFY.NS`
    /// * `from` - First date to include
    /// * `to` - Last date to include
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn historical_prices(
        &self,
        symbol: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<HistoricalPrice>> {
        let endpoint = historical_endpoint(symbol, from, to);
        // The stable API returns a flat array, not a wrapped response
        self.get(&endpoint).await
    }
}

/// Endpoint path and query for the end-of-day history of one symbol.
fn historical_endpoint(symbol: &str, from: Option<NaiveDate>, to: Option<NaiveDate>) -> String {
    let mut endpoint = format!("historical-price-eod/full?symbol={}", symbol.to_uppercase());
    if let Some(f) = from {
        endpoint.push_str(&format!("&from={}", f.format("%Y-%m-%d")));
    }
    if let Some(t) = to {
        endpoint.push_str(&format!("&to={}", t.format("%Y-%m-%d")));
    }
    endpoint
}
