//! Common types used throughout the Surge framework.
//!
//! Both matrices are dense `dates x symbols` grids backed by
//! [`ndarray::Array2`]. Missing observations are `NaN`.

use crate::{Result, SurgeError};
use ndarray::{Array2, ArrayView1, Axis};
use polars::prelude::*;
use std::collections::{BTreeMap, HashSet};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// An instrument identifier such as `"RELIANCE.NS"`.
pub type Symbol = String;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Checks shared by every `dates x symbols` matrix.
fn validate_index(dates: &[Date], symbols: &[Symbol], shape: (usize, usize)) -> Result<()> {
    if shape != (dates.len(), symbols.len()) {
        return Err(SurgeError::ShapeMismatch {
            expected: format!("{} x {}", dates.len(), symbols.len()),
            actual: format!("{} x {}", shape.0, shape.1),
        });
    }

    if let Some(pair) = dates.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(SurgeError::InvalidData(format!(
            "dates must be strictly increasing, found {} before {}",
            pair[0], pair[1]
        )));
    }

    let mut seen = HashSet::with_capacity(symbols.len());
    for symbol in symbols {
        if !seen.insert(symbol.as_str()) {
            return Err(SurgeError::InvalidData(format!("duplicate symbol: {symbol}")));
        }
    }

    Ok(())
}

/// Historical adjusted close prices, one row per trading date.
///
/// The last row is "today" for every current-state computation. Columns may
/// contain `NaN` where an instrument was not yet listed, halted or delisted.
///
/// # Example
///
/// ```
/// use surge_traits::{Date, PriceMatrix};
///
/// let dates = vec![
///     Date::from_ymd_opt(2024, 1, 1).unwrap(),
///     Date::from_ymd_opt(2024, 1, 2).unwrap(),
/// ];
/// let prices = PriceMatrix::from_columns(
///     dates,
///     vec![("AAA".to_string(), vec![10.0, 11.0])],
/// )
/// .unwrap();
///
/// assert_eq!(prices.n_dates(), 2);
/// assert_eq!(prices.latest_price("AAA"), Some(11.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMatrix {
    dates: Vec<Date>,
    symbols: Vec<Symbol>,
    values: Array2<f64>,
}

impl PriceMatrix {
    /// Creates a price matrix from its index and values.
    ///
    /// # Errors
    ///
    /// Returns an error if the value grid does not match the index, the dates
    /// are not strictly increasing, or a symbol appears twice.
    pub fn new(dates: Vec<Date>, symbols: Vec<Symbol>, values: Array2<f64>) -> Result<Self> {
        validate_index(&dates, &symbols, values.dim())?;
        Ok(Self {
            dates,
            symbols,
            values,
        })
    }

    /// A matrix with no dates and no symbols, the "no data" value.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            symbols: Vec::new(),
            values: Array2::zeros((0, 0)),
        }
    }

    /// Creates a price matrix from per-symbol columns sharing one date index.
    ///
    /// # Errors
    ///
    /// Returns an error if a column length differs from the number of dates,
    /// or if [`PriceMatrix::new`] rejects the result.
    pub fn from_columns(dates: Vec<Date>, columns: Vec<(Symbol, Vec<f64>)>) -> Result<Self> {
        let n_dates = dates.len();
        let mut values = Array2::from_elem((n_dates, columns.len()), f64::NAN);
        let mut symbols = Vec::with_capacity(columns.len());

        for (j, (symbol, column)) in columns.into_iter().enumerate() {
            if column.len() != n_dates {
                return Err(SurgeError::ShapeMismatch {
                    expected: format!("{n_dates} prices for {symbol}"),
                    actual: format!("{}", column.len()),
                });
            }
            values
                .column_mut(j)
                .iter_mut()
                .zip(column)
                .for_each(|(cell, price)| *cell = price);
            symbols.push(symbol);
        }

        Self::new(dates, symbols, values)
    }

    /// Aligns independent per-symbol histories onto the union of their dates.
    ///
    /// Dates missing for a symbol become `NaN`. If a history repeats a date,
    /// the last observation wins. Symbols without any observation are kept as
    /// all-`NaN` columns.
    ///
    /// # Errors
    ///
    /// Returns an error if a symbol appears twice.
    pub fn from_histories<I>(histories: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Symbol, Vec<(Date, f64)>)>,
    {
        let histories: Vec<(Symbol, BTreeMap<Date, f64>)> = histories
            .into_iter()
            .map(|(symbol, rows)| (symbol, rows.into_iter().collect()))
            .collect();

        let mut dates: Vec<Date> = histories
            .iter()
            .flat_map(|(_, rows)| rows.keys().copied())
            .collect();
        dates.sort_unstable();
        dates.dedup();

        let columns = histories
            .into_iter()
            .map(|(symbol, rows)| {
                let column = dates
                    .iter()
                    .map(|date| rows.get(date).copied().unwrap_or(f64::NAN))
                    .collect();
                (symbol, column)
            })
            .collect();

        Self::from_columns(dates, columns)
    }

    /// Creates a price matrix from a long-format frame.
    ///
    /// The frame needs `symbol`, `date` and `close` columns. `date` may be a
    /// `Date` column or `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing, has the wrong type or a date
    /// does not parse.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let symbols = df.column("symbol")?.as_materialized_series().str()?;
        let dates = df
            .column("date")?
            .as_materialized_series()
            .cast(&DataType::String)?;
        let dates = dates.str()?;
        let closes = df
            .column("close")?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let closes = closes.f64()?;

        let mut histories: BTreeMap<Symbol, Vec<(Date, f64)>> = BTreeMap::new();
        for ((symbol, date), close) in symbols.into_iter().zip(dates).zip(closes) {
            let (Some(symbol), Some(date)) = (symbol, date) else {
                continue;
            };
            let date = Date::parse_from_str(date, DATE_FORMAT)
                .map_err(|e| SurgeError::InvalidData(format!("bad date {date:?}: {e}")))?;
            histories
                .entry(symbol.to_string())
                .or_default()
                .push((date, close.unwrap_or(f64::NAN)));
        }

        Self::from_histories(histories)
    }

    /// Trading dates, ascending.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Instrument identifiers in column order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The underlying `dates x symbols` grid.
    #[must_use]
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of trading dates (rows).
    #[must_use]
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// Number of instruments (columns).
    #[must_use]
    pub fn n_symbols(&self) -> usize {
        self.symbols.len()
    }

    /// True when there is no date or no instrument.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.symbols.is_empty()
    }

    /// The most recent trading date.
    #[must_use]
    pub fn last_date(&self) -> Option<Date> {
        self.dates.last().copied()
    }

    /// Column position of a symbol.
    #[must_use]
    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Price history of one instrument.
    #[must_use]
    pub fn column(&self, symbol: &str) -> Option<ArrayView1<'_, f64>> {
        self.symbol_index(symbol).map(|j| self.values.column(j))
    }

    /// Last row of prices, if any.
    #[must_use]
    pub fn latest(&self) -> Option<ArrayView1<'_, f64>> {
        self.n_dates()
            .checked_sub(1)
            .map(|last| self.values.row(last))
    }

    /// Last price of one instrument (may be `NaN`).
    #[must_use]
    pub fn latest_price(&self, symbol: &str) -> Option<f64> {
        let j = self.symbol_index(symbol)?;
        self.latest().map(|row| row[j])
    }

    /// Number of finite prices per column.
    #[must_use]
    pub fn observation_counts(&self) -> Vec<usize> {
        self.values
            .columns()
            .into_iter()
            .map(|column| column.iter().filter(|p| p.is_finite()).count())
            .collect()
    }

    /// Keeps only instruments with more than `min_days` finite prices.
    #[must_use]
    pub fn retain_min_history(&self, min_days: usize) -> Self {
        let keep: Vec<usize> = self
            .observation_counts()
            .into_iter()
            .enumerate()
            .filter(|&(_, count)| count > min_days)
            .map(|(j, _)| j)
            .collect();

        Self {
            dates: self.dates.clone(),
            symbols: keep.iter().map(|&j| self.symbols[j].clone()).collect(),
            values: self.values.select(Axis(1), &keep),
        }
    }
}

/// Composite momentum scores aligned with the [`PriceMatrix`] they came from.
///
/// Scores are centered on each day's universe, so values are comparable
/// within a row rather than across absolute magnitudes over time.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    dates: Vec<Date>,
    symbols: Vec<Symbol>,
    values: Array2<f64>,
}

impl ScoreMatrix {
    /// Creates a score matrix from its index and values.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`PriceMatrix::new`].
    pub fn new(dates: Vec<Date>, symbols: Vec<Symbol>, values: Array2<f64>) -> Result<Self> {
        validate_index(&dates, &symbols, values.dim())?;
        Ok(Self {
            dates,
            symbols,
            values,
        })
    }

    /// Wraps a score grid computed from `prices`, reusing its index.
    ///
    /// # Errors
    ///
    /// Returns [`SurgeError::ShapeMismatch`] if the grid shape differs.
    pub fn aligned_with(prices: &PriceMatrix, values: Array2<f64>) -> Result<Self> {
        Self::new(prices.dates.clone(), prices.symbols.clone(), values)
    }

    /// A matrix with no dates and no symbols.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            symbols: Vec::new(),
            values: Array2::zeros((0, 0)),
        }
    }

    /// Trading dates, ascending.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Instrument identifiers in column order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The underlying `dates x symbols` grid.
    #[must_use]
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of trading dates (rows).
    #[must_use]
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// True when there is no date or no instrument.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.symbols.is_empty()
    }

    /// Column position of a symbol.
    #[must_use]
    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Scores of every instrument on one date.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.n_dates()).then(|| self.values.row(index))
    }

    /// Score history of one instrument.
    #[must_use]
    pub fn column(&self, symbol: &str) -> Option<ArrayView1<'_, f64>> {
        self.symbol_index(symbol).map(|j| self.values.column(j))
    }

    /// Scores on the most recent date.
    #[must_use]
    pub fn latest(&self) -> Option<ArrayView1<'_, f64>> {
        self.n_dates().checked_sub(1).and_then(|last| self.row(last))
    }

    /// Exports the matrix as a wide frame: a `date` column plus one column
    /// per symbol. Missing scores become nulls.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be assembled.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.symbols.len() + 1);

        let dates: Vec<String> = self
            .dates
            .iter()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect();
        columns.push(Column::new("date".into(), dates));

        for (j, symbol) in self.symbols.iter().enumerate() {
            let scores: Vec<Option<f64>> = self
                .values
                .column(j)
                .iter()
                .map(|&v| v.is_finite().then_some(v))
                .collect();
            columns.push(Column::new(symbol.as_str().into(), scores));
        }

        Ok(DataFrame::new(columns)?)
    }
}
