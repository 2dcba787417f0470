//! The ranking table produced for the latest date.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use surge_traits::{Date, Result, Symbol};

/// One instrument's row in the ranking table.
///
/// Ranks and the scores derived from them are `NaN` when undefined (missing
/// score, or a look-back beyond the available history).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    /// Instrument identifier
    pub symbol: Symbol,

    /// Composite momentum score on the last date
    pub momentum_score: f64,

    /// Last close
    pub price: f64,

    /// 50-period exponential moving average of the close
    pub ema_50: f64,

    /// Highest close over the trailing 252 rows
    pub high_52w: f64,

    /// Rank on the last date (1 = best)
    pub current_rank: f64,

    /// Rank one month ago
    pub rank_1m_ago: f64,

    /// Rank two months ago
    pub rank_2m_ago: f64,

    /// Rank three months ago
    pub rank_3m_ago: f64,

    /// `rank_1m_ago - current_rank`; positive means the rank improved
    pub rank_velocity: f64,

    /// Close above its 50-period EMA
    pub above_ema_50: bool,

    /// Close at or above 80% of the 52-week high
    pub near_52w_high: bool,

    /// Both filters hold
    pub filters_passed: bool,
}

impl RankingRow {
    /// Whether the instrument has a defined current rank.
    #[must_use]
    pub const fn is_ranked(&self) -> bool {
        self.current_rank.is_finite()
    }
}

/// Orders rows by current rank, undefined ranks last, then by symbol.
pub(crate) fn by_current_rank(a: &RankingRow, b: &RankingRow) -> Ordering {
    let key = |rank: f64| if rank.is_nan() { f64::INFINITY } else { rank };
    key(a.current_rank)
        .total_cmp(&key(b.current_rank))
        .then_with(|| a.symbol.cmp(&b.symbol))
}

/// Ranking of every instrument on the last date, sorted by current rank.
///
/// Built once from a score and price snapshot; immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingTable {
    as_of: Option<Date>,
    rows: Vec<RankingRow>,
}

impl RankingTable {
    /// Sorts `rows` into table order.
    #[must_use]
    pub fn new(as_of: Option<Date>, mut rows: Vec<RankingRow>) -> Self {
        rows.sort_by(by_current_rank);
        Self { as_of, rows }
    }

    /// The "no data" table.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            as_of: None,
            rows: Vec::new(),
        }
    }

    /// Date the ranking describes.
    #[must_use]
    pub const fn as_of(&self) -> Option<Date> {
        self.as_of
    }

    /// Rows in rank order.
    #[must_use]
    pub fn rows(&self) -> &[RankingRow] {
        &self.rows
    }

    /// Number of instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, RankingRow> {
        self.rows.iter()
    }

    /// Row for a symbol.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&RankingRow> {
        self.rows.iter().find(|row| row.symbol == symbol)
    }

    /// Rows that pass both filters, in rank order.
    pub fn passed(&self) -> impl Iterator<Item = &RankingRow> + '_ {
        self.rows.iter().filter(|row| row.filters_passed)
    }

    /// Keeps only the first `n` rows.
    #[must_use]
    pub fn top(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Keeps only rows that pass both filters.
    #[must_use]
    pub fn passed_only(mut self) -> Self {
        self.rows.retain(|row| row.filters_passed);
        self
    }

    /// Exports the table as a frame, one row per instrument in rank order.
    /// Undefined numbers become nulls.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be assembled.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let float = |name: &str, get: fn(&RankingRow) -> f64| {
            let values: Vec<Option<f64>> = self
                .rows
                .iter()
                .map(|row| {
                    let v = get(row);
                    v.is_finite().then_some(v)
                })
                .collect();
            Column::new(name.into(), values)
        };
        let flag = |name: &str, get: fn(&RankingRow) -> bool| {
            let values: Vec<bool> = self.rows.iter().map(get).collect();
            Column::new(name.into(), values)
        };

        let symbols: Vec<&str> = self.rows.iter().map(|row| row.symbol.as_str()).collect();

        let columns = vec![
            Column::new("symbol".into(), symbols),
            float("momentum_score", |r| r.momentum_score),
            float("price", |r| r.price),
            float("ema_50", |r| r.ema_50),
            float("high_52w", |r| r.high_52w),
            float("current_rank", |r| r.current_rank),
            float("rank_1m_ago", |r| r.rank_1m_ago),
            float("rank_2m_ago", |r| r.rank_2m_ago),
            float("rank_3m_ago", |r| r.rank_3m_ago),
            float("rank_velocity", |r| r.rank_velocity),
            flag("above_ema_50", |r| r.above_ema_50),
            flag("near_52w_high", |r| r.near_52w_high),
            flag("filters_passed", |r| r.filters_passed),
        ];

        Ok(DataFrame::new(columns)?)
    }
}

impl<'a> IntoIterator for &'a RankingTable {
    type Item = &'a RankingRow;
    type IntoIter = std::slice::Iter<'a, RankingRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(symbol: &str, rank: f64, passed: bool) -> RankingRow {
        RankingRow {
            symbol: symbol.to_string(),
            momentum_score: if rank.is_nan() { f64::NAN } else { -rank },
            price: 100.0,
            ema_50: 95.0,
            high_52w: 110.0,
            current_rank: rank,
            rank_1m_ago: f64::NAN,
            rank_2m_ago: f64::NAN,
            rank_3m_ago: f64::NAN,
            rank_velocity: f64::NAN,
            above_ema_50: passed,
            near_52w_high: passed,
            filters_passed: passed,
        }
    }

    #[test]
    fn test_sorted_by_rank_missing_last() {
        let table = RankingTable::new(
            None,
            vec![
                row("ZED", f64::NAN, false),
                row("B", 2.0, true),
                row("AAA", f64::NAN, false),
                row("A", 1.0, false),
            ],
        );

        let symbols: Vec<_> = table.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["A", "B", "AAA", "ZED"]);
        assert!(table.rows()[0].is_ranked());
        assert!(!table.rows()[3].is_ranked());
    }

    #[test]
    fn test_ties_broken_by_symbol() {
        let table = RankingTable::new(None, vec![row("Y", 1.5, true), row("X", 1.5, true)]);
        assert_eq!(table.rows()[0].symbol, "X");
    }

    #[test]
    fn test_filters_and_truncation() {
        let table = RankingTable::new(
            None,
            vec![row("A", 1.0, false), row("B", 2.0, true), row("C", 3.0, true)],
        );

        assert_eq!(table.passed().count(), 2);
        assert_eq!(table.get("C").map(|r| r.current_rank), Some(3.0));
        assert!(table.get("D").is_none());

        let passed = table.clone().passed_only();
        assert_eq!(passed.len(), 2);
        assert_eq!(passed.rows()[0].symbol, "B");

        let top = table.top(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top.rows()[0].symbol, "A");
    }

    #[test]
    fn test_to_dataframe_columns() {
        let table = RankingTable::new(None, vec![row("A", 1.0, true), row("B", f64::NAN, false)]);
        let df = table.to_dataframe().unwrap();

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            [
                "symbol",
                "momentum_score",
                "price",
                "ema_50",
                "high_52w",
                "current_rank",
                "rank_1m_ago",
                "rank_2m_ago",
                "rank_3m_ago",
                "rank_velocity",
                "above_ema_50",
                "near_52w_high",
                "filters_passed",
            ]
        );
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("current_rank").unwrap().null_count(), 1);
    }

    #[test]
    fn test_empty() {
        let table = RankingTable::empty();
        assert!(table.is_empty());
        assert!(table.as_of().is_none());
        assert_eq!(table.to_dataframe().unwrap().height(), 0);
    }
}
