//! Builds the ranking table from scores and prices.

use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};
use surge_traits::{
    PriceMatrix, ScoreMatrix,
    stats::{ema, rolling_max},
};
use tracing::debug;

use crate::{
    offsets::LookbackOffsets,
    rank::{descending_ranks, ranked_count},
    table::{RankingRow, RankingTable},
};

/// Configuration for the ranking builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Look-back offsets for historical ranks
    pub offsets: LookbackOffsets,

    /// EMA span for the trend filter (default: 50)
    pub ema_span: usize,

    /// Rolling window for the 52-week high (default: 252)
    pub high_window: usize,

    /// Fraction of the 52-week high the close must reach (default: 0.8)
    pub near_high_ratio: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            offsets: LookbackOffsets::default(),
            ema_span: 50,
            high_window: 252,
            near_high_ratio: 0.8,
        }
    }
}

/// Turns a score history and its prices into the latest ranking table.
///
/// # Example
///
/// ```ignore
/// use surge_rank::RankingBuilder;
///
/// let table = RankingBuilder::default().build(&prices, &scores);
/// for row in table.passed().take(10) {
///     println!("{} {}", row.current_rank, row.symbol);
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingBuilder {
    config: RankingConfig,
}

impl RankingBuilder {
    /// Create a builder with the given configuration.
    #[must_use]
    pub const fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    /// Replace the look-back offsets.
    #[must_use]
    pub const fn with_offsets(mut self, offsets: LookbackOffsets) -> Self {
        self.config.offsets = offsets;
        self
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Ranks at `offset` rows before the last score row, in price-column order.
    fn ranks_at(&self, scores: &ScoreMatrix, columns: &[Option<usize>], offset: usize) -> Array1<f64> {
        let Some(row) = LookbackOffsets::row_for(offset, scores.n_dates()).and_then(|r| scores.row(r))
        else {
            debug!(offset, rows = scores.n_dates(), "look-back beyond score history");
            return Array1::from_elem(columns.len(), f64::NAN);
        };

        let aligned: Array1<f64> = columns
            .iter()
            .map(|col| col.map_or(f64::NAN, |j| row[j]))
            .collect();
        let ranks = descending_ranks(aligned.view());
        debug!(offset, ranked = ranked_count(ranks.view()), "ranked score row");
        ranks
    }

    /// Build the table.
    ///
    /// Every instrument in the price matrix gets a row, in rank order with
    /// unranked instruments last. Empty prices or scores give an empty table.
    #[must_use]
    pub fn build(&self, prices: &PriceMatrix, scores: &ScoreMatrix) -> RankingTable {
        if prices.is_empty() || scores.is_empty() {
            return RankingTable::empty();
        }

        let columns: Vec<Option<usize>> = prices
            .symbols()
            .iter()
            .map(|symbol| scores.symbol_index(symbol))
            .collect();

        let offsets = self.config.offsets;
        let current = self.ranks_at(scores, &columns, 0);
        let one_month = self.ranks_at(scores, &columns, offsets.one_month);
        let two_months = self.ranks_at(scores, &columns, offsets.two_months);
        let three_months = self.ranks_at(scores, &columns, offsets.three_months);
        let latest_scores = scores.latest();

        let last = prices.n_dates() - 1;
        let rows = prices
            .values()
            .axis_iter(Axis(1))
            .enumerate()
            .map(|(j, history)| {
                let price = history[last];
                let ema_50 = ema(history, self.config.ema_span)[last];
                let high_52w = rolling_max(history, self.config.high_window)[last];

                // Comparisons against NaN are false, so missing inputs fail the filters
                let above_ema_50 = price > ema_50;
                let near_52w_high = price >= self.config.near_high_ratio * high_52w;

                let momentum_score = match (columns[j], latest_scores) {
                    (Some(col), Some(row)) => row[col],
                    _ => f64::NAN,
                };

                RankingRow {
                    symbol: prices.symbols()[j].clone(),
                    momentum_score,
                    price,
                    ema_50,
                    high_52w,
                    current_rank: current[j],
                    rank_1m_ago: one_month[j],
                    rank_2m_ago: two_months[j],
                    rank_3m_ago: three_months[j],
                    rank_velocity: one_month[j] - current[j],
                    above_ema_50,
                    near_52w_high,
                    filters_passed: above_ema_50 && near_52w_high,
                }
            })
            .collect();

        RankingTable::new(prices.last_date(), rows)
    }
}

/// Latest ranking table with the default configuration.
#[must_use]
pub fn build_ranking(prices: &PriceMatrix, scores: &ScoreMatrix) -> RankingTable {
    RankingBuilder::default().build(prices, scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;
    use rstest::rstest;
    use surge_traits::Date;

    fn trading_days(n: usize) -> Vec<Date> {
        let start = Date::from_ymd_opt(2022, 3, 1).unwrap();
        (0..n as u64)
            .map(|i| start.checked_add_days(chrono::Days::new(i)).unwrap())
            .collect()
    }

    fn prices(columns: Vec<(&str, Vec<f64>)>) -> PriceMatrix {
        let n = columns[0].1.len();
        PriceMatrix::from_columns(
            trading_days(n),
            columns
                .into_iter()
                .map(|(s, v)| (s.to_string(), v))
                .collect(),
        )
        .unwrap()
    }

    fn scores_for(prices: &PriceMatrix, columns: Vec<Vec<f64>>) -> ScoreMatrix {
        let n = prices.n_dates();
        let mut values = Array2::from_elem((n, columns.len()), f64::NAN);
        for (j, column) in columns.into_iter().enumerate() {
            for (t, v) in column.into_iter().enumerate() {
                values[[t, j]] = v;
            }
        }
        ScoreMatrix::aligned_with(prices, values).unwrap()
    }

    #[test]
    fn test_empty_inputs_give_empty_table() {
        let table = build_ranking(&PriceMatrix::empty(), &ScoreMatrix::empty());
        assert!(table.is_empty());

        let p = prices(vec![("A", vec![1.0; 5])]);
        assert!(build_ranking(&p, &ScoreMatrix::empty()).is_empty());
    }

    #[test]
    fn test_current_rank_and_score() {
        let p = prices(vec![
            ("A", vec![10.0; 5]),
            ("B", vec![20.0; 5]),
            ("C", vec![30.0; 5]),
        ]);
        let s = scores_for(
            &p,
            vec![vec![0.0, 0.0, 0.0, 0.0, -1.0], vec![0.0; 5], vec![0.0, 0.0, 0.0, 0.0, 2.0]],
        );
        let table = build_ranking(&p, &s);

        let symbols: Vec<_> = table.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["C", "B", "A"]);
        assert_relative_eq!(table.get("C").unwrap().momentum_score, 2.0);
        assert_relative_eq!(table.get("A").unwrap().price, 10.0);
        assert_eq!(table.as_of(), p.last_date());
    }

    #[test]
    fn test_short_history_lags_are_missing() {
        let p = prices(vec![("A", vec![10.0; 30]), ("B", vec![11.0; 30])]);
        let s = scores_for(&p, vec![vec![1.0; 30], vec![-1.0; 30]]);
        let table = build_ranking(&p, &s);

        for row in &table {
            assert!(row.current_rank.is_finite());
            // 30 rows cover the 1-month lag only
            assert!(row.rank_1m_ago.is_finite());
            assert!(row.rank_2m_ago.is_nan());
            assert!(row.rank_3m_ago.is_nan());
            assert_relative_eq!(row.rank_velocity, 0.0);
        }

        let p = prices(vec![("A", vec![10.0; 21]), ("B", vec![11.0; 21])]);
        let s = scores_for(&p, vec![vec![1.0; 21], vec![-1.0; 21]]);
        let table = build_ranking(&p, &s);
        assert!(table.iter().all(|r| r.rank_1m_ago.is_nan() && r.rank_velocity.is_nan()));
    }

    #[test]
    fn test_lags_read_expected_rows() {
        let n = 70;
        let p = prices(vec![("A", vec![10.0; n]), ("B", vec![10.0; n])]);
        // A leads only on the rows the look-backs should read
        let mut a = vec![0.0; n];
        a[n - 1 - 21] = 1.0;
        a[n - 1 - 42] = 1.0;
        a[n - 1 - 63] = 1.0;
        let s = scores_for(&p, vec![a, vec![0.5; n]]);

        let table = build_ranking(&p, &s);
        let row = table.get("A").unwrap();
        assert_relative_eq!(row.current_rank, 2.0);
        assert_relative_eq!(row.rank_1m_ago, 1.0);
        assert_relative_eq!(row.rank_2m_ago, 1.0);
        assert_relative_eq!(row.rank_3m_ago, 1.0);
        assert_relative_eq!(row.rank_velocity, -1.0);
    }

    #[test]
    fn test_velocity_positive_for_improving_instrument() {
        let n = 40;
        let p = prices(vec![("RISER", vec![10.0; n]), ("STILL", vec![10.0; n])]);
        let riser: Vec<f64> = (0..n).map(|t| -1.0 + 0.05 * t as f64).collect();
        let s = scores_for(&p, vec![riser, vec![0.0; n]]);

        let table = build_ranking(&p, &s);
        let riser = table.get("RISER").unwrap();
        let still = table.get("STILL").unwrap();

        assert!(riser.rank_velocity >= 0.0);
        assert_relative_eq!(riser.rank_velocity, 1.0);
        assert_relative_eq!(still.rank_velocity, -1.0);
    }

    #[test]
    fn test_missing_score_keeps_row() {
        let n = 25;
        let p = prices(vec![
            ("A", vec![10.0; n]),
            ("B", vec![10.0; n]),
            ("NEW", vec![10.0; n]),
        ]);
        let s = scores_for(&p, vec![vec![1.0; n], vec![-1.0; n], vec![f64::NAN; n]]);
        let table = build_ranking(&p, &s);

        assert_eq!(table.len(), 3);
        let new = table.rows().last().unwrap();
        assert_eq!(new.symbol, "NEW");
        assert!(new.current_rank.is_nan());
        assert!(new.rank_velocity.is_nan());
        assert_relative_eq!(table.get("B").unwrap().current_rank, 2.0);
    }

    #[test]
    fn test_symbols_absent_from_scores_are_unranked() {
        let p = prices(vec![("A", vec![10.0; 5]), ("B", vec![10.0; 5])]);
        let only_a = PriceMatrix::from_columns(p.dates().to_vec(), vec![("A".to_string(), vec![10.0; 5])])
            .unwrap();
        let s = ScoreMatrix::aligned_with(&only_a, Array2::from_elem((5, 1), 0.3)).unwrap();

        let table = build_ranking(&p, &s);
        assert_relative_eq!(table.get("A").unwrap().current_rank, 1.0);
        assert!(table.get("B").unwrap().current_rank.is_nan());
    }

    #[test]
    fn test_ema_and_high() {
        let n = 260;
        let rising: Vec<f64> = (0..n).map(|t| 100.0 + t as f64).collect();
        let p = prices(vec![("UP", rising.clone())]);
        let s = scores_for(&p, vec![vec![0.0; n]]);
        let row = build_ranking(&p, &s).rows()[0].clone();

        assert_relative_eq!(row.high_52w, rising[n - 1]);
        assert!(row.ema_50 < row.price);
        assert!(row.above_ema_50 && row.near_52w_high && row.filters_passed);
    }

    #[test]
    fn test_short_history_fails_high_filter() {
        let p = prices(vec![("YOUNG", (0..100).map(|t| 50.0 + t as f64).collect())]);
        let s = scores_for(&p, vec![vec![0.0; 100]]);
        let row = build_ranking(&p, &s).rows()[0].clone();

        assert!(row.high_52w.is_nan());
        assert!(row.above_ema_50);
        assert!(!row.near_52w_high);
        assert!(!row.filters_passed);
    }

    /// Last price relative to a history built so the EMA and the 252-day high
    /// land on known sides of it.
    #[rstest]
    #[case::both(true, true)]
    #[case::above_only(true, false)]
    #[case::near_only(false, true)]
    #[case::neither(false, false)]
    fn test_filter_truth_table(#[case] above: bool, #[case] near: bool) {
        let n = 300;
        // Flat at 100 with an old spike: high is 200 when far, 110 when near
        let spike = if near { 110.0 } else { 200.0 };
        let mut history = vec![100.0; n];
        history[n - 200] = spike;
        history[n - 1] = if above { 105.0 } else { 95.0 };

        let p = prices(vec![("X", history)]);
        let s = scores_for(&p, vec![vec![0.0; n]]);
        let row = build_ranking(&p, &s).rows()[0].clone();

        assert_eq!(row.above_ema_50, above, "ema {} price {}", row.ema_50, row.price);
        assert_eq!(row.near_52w_high, near, "high {} price {}", row.high_52w, row.price);
        assert_eq!(row.filters_passed, above && near);
    }

    #[test]
    fn test_deterministic() {
        let n = 80;
        let p = prices(vec![
            ("A", (0..n).map(|t| 10.0 + 0.1 * t as f64).collect()),
            ("B", (0..n).map(|t| 20.0 - 0.1 * t as f64).collect()),
        ]);
        let s = scores_for(
            &p,
            vec![
                (0..n).map(|t| (t as f64 * 0.3).sin()).collect(),
                (0..n).map(|t| (t as f64 * 0.2).cos()).collect(),
            ],
        );
        // Too short for a 52-week high, so compare frames where NaN is null
        let first = build_ranking(&p, &s).to_dataframe().unwrap();
        let second = build_ranking(&p, &s).to_dataframe().unwrap();
        assert!(first.equals_missing(&second));
    }
}
