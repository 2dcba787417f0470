//! Rank command implementation.

use crate::{
    config::{ParamArgs, default_lookback},
    report::{self, Names},
};
use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::{fs::File, path::PathBuf};
use surge::{
    MomentumAnalyzer,
    data::{FmpPrices, NseUniverse},
};
use tracing::info;

/// Arguments of `surge rank`.
#[derive(Debug, Clone, Args)]
pub(crate) struct RankArgs {
    /// Index to take constituents from (repeatable)
    #[arg(short, long = "index", default_value = "NIFTY 50")]
    pub(crate) indices: Vec<String>,

    /// Only fetch the first N constituents
    #[arg(long)]
    pub(crate) limit: Option<usize>,

    /// Only show the top N rows
    #[arg(long)]
    pub(crate) top: Option<usize>,

    /// Only show instruments passing both filters
    #[arg(long)]
    pub(crate) passed_only: bool,

    /// Export the ranking to a CSV file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,

    /// Trading days of history to fetch
    #[arg(long)]
    pub(crate) lookback_days: Option<usize>,

    #[command(flatten)]
    pub(crate) params: ParamArgs,
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

/// Fetch, score and rank an index universe.
pub(crate) async fn run_rank(args: RankArgs) -> Result<()> {
    let params = args.params.resolve()?;
    let lookback = args
        .lookback_days
        .unwrap_or_else(|| default_lookback(&params));

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                     Momentum Ranking                         ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Indices:  {}", args.indices.join(", "));
    println!("Windows:  {:?}", params.windows());
    println!("Weights:  {:?}", params.weights());
    println!("Lookback: {lookback} trading days");
    println!();

    let universe = NseUniverse::new(&args.indices)?;
    let mut constituents = universe.constituents().await?;
    if let Some(limit) = args.limit {
        constituents.truncate(limit);
    }

    let names: Names = constituents
        .iter()
        .map(|c| (c.symbol.clone(), c.name.clone()))
        .collect();
    let symbols: Vec<String> = constituents.into_iter().map(|c| c.symbol).collect();
    info!(symbols = symbols.len(), "universe ready");

    let provider = FmpPrices::from_env()?;
    let bar = progress_bar(symbols.len());
    let prices = provider
        .fetch_with(&symbols, lookback, |symbol| {
            bar.set_message(symbol.to_string());
            bar.inc(1);
        })
        .await?;
    bar.finish_and_clear();

    println!(
        "Loaded {} dates for {} of {} symbols",
        prices.n_dates(),
        prices.n_symbols(),
        symbols.len()
    );

    let analysis = MomentumAnalyzer::new(params).analyze(&prices)?;
    if !analysis.dropped.is_empty() {
        println!(
            "Dropped {} symbols with too little history",
            analysis.dropped.len()
        );
    }

    if analysis.is_empty() {
        println!("\nno data");
        return Ok(());
    }

    let mut table = analysis.ranking;
    if args.passed_only {
        table = table.passed_only();
    }
    if let Some(n) = args.top {
        table = table.top(n);
    }

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let as_of = table
        .as_of()
        .map_or_else(String::new, |date| format!(" (as of {date})"));
    println!("RANKING{as_of}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    report::print_table(&table, &names);
    println!("\n{}", report::summary(&table));

    if let Some(path) = args.csv {
        let file =
            File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        report::write_csv(file, &table, &names)?;
        println!("Saved ranking to {}", path.display());
    }

    Ok(())
}
