//! Wire types for the data sources.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Historical price data point from the FMP end-of-day endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPrice {
    /// Date.
    pub date: String,
    /// Close price.
    pub close: f64,
    /// Adjusted close.
    #[serde(default)]
    pub adj_close: Option<f64>,
    /// Volume.
    #[serde(default)]
    pub volume: f64,
}

impl HistoricalPrice {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// Adjusted close, falling back to the raw close when it is absent.
    #[must_use]
    pub fn adjusted_close(&self) -> f64 {
        self.adj_close
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or(self.close)
    }
}

/// One member of an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Constituent {
    /// Exchange-qualified symbol, e.g. `RELIANCE.NS`.
    pub symbol: String,
    /// Company name as published in the constituent file.
    pub name: String,
}
