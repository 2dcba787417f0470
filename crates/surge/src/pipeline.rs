//! One-call pipeline: history filter, scores, ranking.

use surge_combine::{Combiner, WeightedSumCombiner};
use surge_rank::{RankingBuilder, RankingTable};
use surge_signals::ScoreEngine;
use surge_traits::{
    MomentumParameters, PriceMatrix, PriceProvider, Result, ScoreMatrix, Symbol, UniverseProvider,
};
use tracing::info;

/// Everything produced by one run of the pipeline.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Prices of the instruments that passed the history filter
    pub prices: PriceMatrix,

    /// Composite score history over those instruments
    pub scores: ScoreMatrix,

    /// Latest ranking table
    pub ranking: RankingTable,

    /// Instruments dropped for too short a history
    pub dropped: Vec<Symbol>,
}

impl Analysis {
    fn empty(dropped: Vec<Symbol>) -> Self {
        Self {
            prices: PriceMatrix::empty(),
            scores: ScoreMatrix::empty(),
            ranking: RankingTable::empty(),
            dropped,
        }
    }

    /// Whether the run produced no ranking ("no data").
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }
}

/// Runs the momentum pipeline over a price matrix.
///
/// Instruments with no more than `min_history_days` prices are dropped
/// first; the rest are scored and ranked. The score engine never drops
/// instruments itself.
///
/// # Example
///
/// ```ignore
/// use surge::{MomentumAnalyzer, MomentumParameters};
///
/// let analysis = MomentumAnalyzer::new(MomentumParameters::default()).analyze(&prices)?;
/// for row in analysis.ranking.passed().take(10) {
///     println!("{:>4} {}", row.current_rank, row.symbol);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MomentumAnalyzer<C = WeightedSumCombiner> {
    engine: ScoreEngine<C>,
    ranking: RankingBuilder,
}

impl MomentumAnalyzer {
    /// Analyzer with the default combination and ranking configuration.
    #[must_use]
    pub fn new(params: MomentumParameters) -> Self {
        Self {
            engine: ScoreEngine::new(params),
            ranking: RankingBuilder::default(),
        }
    }
}

impl<C: Combiner> MomentumAnalyzer<C> {
    /// Replace the window combination strategy.
    #[must_use]
    pub fn with_combiner<D: Combiner>(self, combiner: D) -> MomentumAnalyzer<D> {
        MomentumAnalyzer {
            engine: self.engine.with_combiner(combiner),
            ranking: self.ranking,
        }
    }

    /// Replace the ranking builder.
    #[must_use]
    pub fn with_ranking(mut self, ranking: RankingBuilder) -> Self {
        self.ranking = ranking;
        self
    }

    /// Parameters in use.
    #[must_use]
    pub const fn params(&self) -> &MomentumParameters {
        self.engine.params()
    }

    /// Filter, score and rank `prices`.
    ///
    /// # Errors
    ///
    /// Returns an error if the combiner rejects the window grids.
    pub fn analyze(&self, prices: &PriceMatrix) -> Result<Analysis> {
        let min_days = self.params().min_history_days();
        let eligible = prices.retain_min_history(min_days);

        let dropped: Vec<Symbol> = prices
            .symbols()
            .iter()
            .filter(|s| eligible.symbol_index(s).is_none())
            .cloned()
            .collect();

        if eligible.is_empty() {
            info!(dropped = dropped.len(), min_days, "no instrument has enough history");
            return Ok(Analysis::empty(dropped));
        }

        let scores = self.engine.compute(&eligible)?;
        let ranking = self.ranking.build(&eligible, &scores);

        info!(
            ranked = ranking.len(),
            passed = ranking.passed().count(),
            dropped = dropped.len(),
            "momentum ranking built"
        );

        Ok(Analysis {
            prices: eligible,
            scores,
            ranking,
            dropped,
        })
    }

    /// Fetch the universe and its prices, then [`analyze`](Self::analyze).
    ///
    /// # Errors
    ///
    /// Returns an error if either provider fails outright.
    pub async fn analyze_from<U, P>(&self, universe: &U, provider: &P, lookback_days: usize) -> Result<Analysis>
    where
        U: UniverseProvider,
        P: PriceProvider,
    {
        let symbols = universe.universe().await?;
        info!(symbols = symbols.len(), "universe fetched");

        if symbols.is_empty() {
            return Ok(Analysis::empty(Vec::new()));
        }

        let prices = provider.prices(&symbols, lookback_days).await?;
        self.analyze(&prices)
    }
}

impl Default for MomentumAnalyzer {
    fn default() -> Self {
        Self::new(MomentumParameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surge_combine::AvailableWeightCombiner;
    use surge_traits::Date;

    /// Business days (Mon-Fri) starting 2023-01-02.
    fn business_days(n: usize) -> Vec<Date> {
        let mut day = Date::from_ymd_opt(2023, 1, 2).unwrap();
        let mut out = Vec::with_capacity(n);
        while out.len() < n {
            use chrono::Datelike;
            if day.weekday().number_from_monday() <= 5 {
                out.push(day);
            }
            day = day.succ_opt().unwrap();
        }
        out
    }

    /// A rising 100 -> 200, B falling 200 -> 100, C flat at 150 with small noise.
    fn three_instruments(n: usize) -> PriceMatrix {
        let step = |i: usize| i as f64 / (n - 1) as f64;
        // Deterministic wiggle so no series has zero volatility
        let noise = |i: usize, phase: f64| 0.5 * (i as f64 * 0.9 + phase).sin();

        let a = (0..n).map(|i| 100.0 + 100.0 * step(i) + noise(i, 0.0)).collect();
        let b = (0..n).map(|i| 200.0 - 100.0 * step(i) + noise(i, 1.7)).collect();
        let c = (0..n).map(|i| 150.0 + noise(i, 3.1)).collect();

        PriceMatrix::from_columns(
            business_days(n),
            vec![
                ("A".to_string(), a),
                ("B".to_string(), b),
                ("C".to_string(), c),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_end_to_end_three_instruments() {
        let prices = three_instruments(300);
        let analysis = MomentumAnalyzer::default().analyze(&prices).unwrap();
        let ranking = &analysis.ranking;

        let a = ranking.get("A").unwrap();
        let b = ranking.get("B").unwrap();
        let c = ranking.get("C").unwrap();

        assert!(a.momentum_score > c.momentum_score, "A {} C {}", a.momentum_score, c.momentum_score);
        assert!(c.momentum_score > b.momentum_score, "C {} B {}", c.momentum_score, b.momentum_score);
        assert_eq!(a.current_rank, 1.0);
        assert_eq!(b.current_rank, 3.0);
        assert!(a.filters_passed);
        assert!(!b.filters_passed);

        let order: Vec<_> = ranking.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, ["A", "C", "B"]);
        assert!(analysis.dropped.is_empty());
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let prices = three_instruments(300);
        let analyzer = MomentumAnalyzer::default();

        let first = analyzer.analyze(&prices).unwrap();
        let second = analyzer.analyze(&prices).unwrap();

        assert_eq!(first.scores, second.scores);
        assert!(
            first
                .ranking
                .to_dataframe()
                .unwrap()
                .equals_missing(&second.ranking.to_dataframe().unwrap())
        );
    }

    #[test]
    fn test_short_history_is_dropped() {
        // 260 rows: exactly min_history_days, which is not enough
        let prices = three_instruments(260);
        let analysis = MomentumAnalyzer::default().analyze(&prices).unwrap();

        assert!(analysis.is_empty());
        assert_eq!(analysis.dropped, ["A", "B", "C"]);
    }

    #[test]
    fn test_renormalizing_combiner_keeps_order() {
        let prices = three_instruments(300);
        let analysis = MomentumAnalyzer::default()
            .with_combiner(AvailableWeightCombiner)
            .analyze(&prices)
            .unwrap();

        let order: Vec<_> = analysis.ranking.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, ["A", "C", "B"]);
    }

    struct Fixed(PriceMatrix);

    impl UniverseProvider for Fixed {
        async fn universe(&self) -> Result<Vec<Symbol>> {
            Ok(self.0.symbols().to_vec())
        }
    }

    impl PriceProvider for Fixed {
        async fn prices(&self, _symbols: &[Symbol], _lookback_days: usize) -> Result<PriceMatrix> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_analyze_from_providers() {
        let source = Fixed(three_instruments(300));
        let analysis = MomentumAnalyzer::default()
            .analyze_from(&source, &source, 300)
            .await
            .unwrap();
        assert_eq!(analysis.ranking.len(), 3);
        assert_eq!(analysis.ranking.rows()[0].symbol, "A");

        let empty = Fixed(PriceMatrix::empty());
        let analysis = MomentumAnalyzer::default()
            .analyze_from(&empty, &empty, 300)
            .await
            .unwrap();
        assert!(analysis.is_empty());
    }
}
