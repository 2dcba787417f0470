//! NSE index membership from niftyindices.com constituent files.

use crate::{
    Result,
    error::DataError,
    retry::{RetryPolicy, is_transient},
    types::Constituent,
};
use reqwest::{Client, header};
use std::{collections::BTreeMap, time::Duration};
use surge_traits::{Symbol, UniverseProvider};
use tracing::{info, warn};

/// Index names and their constituent CSV URLs.
pub const NSE_INDICES: [(&str, &str); 6] = [
    (
        "NIFTY 50",
        "https://niftyindices.com/IndexConstituent/ind_nifty50list.csv",
    ),
    (
        "NIFTY NEXT 50",
        "https://niftyindices.com/IndexConstituent/ind_niftynext50list.csv",
    ),
    (
        "NIFTY MIDCAP 150",
        "https://niftyindices.com/IndexConstituent/ind_niftymidcap150list.csv",
    ),
    (
        "NIFTY SMALLCAP 250",
        "https://niftyindices.com/IndexConstituent/ind_niftysmallcap250list.csv",
    ),
    (
        "NIFTY MICROCAP 250",
        "https://niftyindices.com/IndexConstituent/ind_niftymicrocap250_list.csv",
    ),
    (
        "NIFTY TOTAL MARKET",
        "https://niftyindices.com/IndexConstituent/ind_niftytotalmarket_list.csv",
    ),
];

/// Exchange suffix appended to NSE symbols.
pub const NSE_SUFFIX: &str = ".NS";

/// niftyindices.com rejects requests without a browser User-Agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const SYMBOL_HEADERS: [&str; 5] = ["Symbol", "SYMBOL", "symbol", "Ticker", "TICKER"];
const NAME_HEADERS: [&str; 3] = ["company name", "security name", "companyname"];

/// Look up the constituent CSV URL of an index.
///
/// ```
/// use surge_data::index_url;
///
/// assert!(index_url("NIFTY 50").unwrap().ends_with("ind_nifty50list.csv"));
/// assert!(index_url("nifty 50").is_none());
/// ```
#[must_use]
pub fn index_url(name: &str) -> Option<&'static str> {
    NSE_INDICES
        .iter()
        .find(|(index, _)| *index == name)
        .map(|(_, url)| *url)
}

/// Parse a constituent CSV into exchange-qualified constituents.
///
/// The symbol column is the first header named like a symbol or ticker,
/// otherwise the third column. The name column is the first header naming
/// the company, otherwise the first column. Blank and `DUMMY*` placeholder
/// symbols are dropped; rows keep file order.
///
/// # Errors
///
/// Returns [`DataError::NoSymbolColumn`] if no symbol column can be found,
/// or a CSV error if the header row is malformed.
pub fn parse_constituents(csv_text: &str) -> Result<Vec<Constituent>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let symbol_col = headers
        .iter()
        .position(|h| SYMBOL_HEADERS.contains(&h.as_str()))
        .or_else(|| (headers.len() > 2).then_some(2))
        .ok_or(DataError::NoSymbolColumn)?;
    let name_col = headers
        .iter()
        .position(|h| NAME_HEADERS.contains(&h.to_lowercase().as_str()))
        .unwrap_or(0);

    let mut constituents = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!(line = line + 2, %err, "skipping unreadable constituent row");
                continue;
            }
        };

        let symbol = record.get(symbol_col).unwrap_or_default();
        if symbol.is_empty() || symbol.to_uppercase().starts_with("DUMMY") {
            continue;
        }

        constituents.push(Constituent {
            symbol: format!("{symbol}{NSE_SUFFIX}"),
            name: record.get(name_col).unwrap_or_default().to_string(),
        });
    }

    Ok(constituents)
}

/// Universe made of the members of one or more NSE indices.
#[derive(Debug, Clone)]
pub struct NseUniverse {
    client: Client,
    indices: Vec<String>,
    retry: RetryPolicy,
}

impl NseUniverse {
    /// Universe over the given index names.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnknownIndex`] for a name missing from
    /// [`NSE_INDICES`], or an error if the HTTP client cannot be built.
    pub fn new<I, S>(indices: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let indices: Vec<String> = indices.into_iter().map(Into::into).collect();
        if let Some(unknown) = indices.iter().find(|name| index_url(name).is_none()) {
            return Err(DataError::UnknownIndex(unknown.clone()));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(header::HeaderMap::from_iter([(
                header::USER_AGENT,
                header::HeaderValue::from_static(USER_AGENT),
            )]))
            .build()?;

        Ok(Self {
            client,
            indices,
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy for connection failures (default: 3 retries,
    /// 300ms doubling backoff).
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Selected index names.
    #[must_use]
    pub fn indices(&self) -> &[String] {
        &self.indices
    }

    /// Retry policy in use.
    #[must_use]
    pub const fn retry(&self) -> RetryPolicy {
        self.retry
    }

    async fn fetch_index(&self, name: &str) -> Result<Vec<Constituent>> {
        let url = index_url(name).ok_or_else(|| DataError::UnknownIndex(name.to_string()))?;
        let text = self
            .retry
            .run(is_transient, || async move {
                let response = self.client.get(url).send().await?.error_for_status()?;
                Ok::<_, DataError>(response.text().await?)
            })
            .await?;
        parse_constituents(&text)
    }

    /// Members of every selected index, deduplicated and sorted by symbol.
    ///
    /// An index that fails to download or parse is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NoData`] if no index produced any member.
    pub async fn constituents(&self) -> Result<Vec<Constituent>> {
        let mut by_symbol = BTreeMap::new();

        for name in &self.indices {
            match self.fetch_index(name).await {
                Ok(members) => {
                    info!(index = %name, members = members.len(), "fetched index constituents");
                    for member in members {
                        by_symbol.entry(member.symbol.clone()).or_insert(member);
                    }
                }
                Err(err) => warn!(index = %name, %err, "skipping index"),
            }
        }

        if by_symbol.is_empty() {
            return Err(DataError::NoData(self.indices.join(", ")));
        }

        Ok(by_symbol.into_values().collect())
    }
}

impl UniverseProvider for NseUniverse {
    async fn universe(&self) -> surge_traits::Result<Vec<Symbol>> {
        let members = self.constituents().await?;
        Ok(members.into_iter().map(|c| c.symbol).collect())
    }
}
