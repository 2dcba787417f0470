//! Surge CLI binary.
//!
//! Ranks NSE index constituents by volatility-adjusted momentum.

mod cmd;
mod config;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cmd::{indices::list_indices, params::show_params, rank::RankArgs, rank::run_rank};
use config::ParamArgs;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "surge")]
#[command(about = "Volatility-adjusted momentum ranking for NSE equities", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported indices
    Indices,

    /// Show the effective momentum parameters
    Params {
        #[command(flatten)]
        params: ParamArgs,
    },

    /// Rank index constituents by momentum
    Rank(RankArgs),
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "surge=info,warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Indices => list_indices(),
        Commands::Params { params } => show_params(&params)?,
        Commands::Rank(args) => run_rank(args).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rank_flags() {
        let cli = Cli::try_parse_from([
            "surge",
            "rank",
            "--index",
            "NIFTY 50",
            "--index",
            "NIFTY NEXT 50",
            "--top",
            "10",
            "--passed-only",
            "--weights",
            "0.5,-0.5",
            "--windows",
            "21,63",
        ])
        .unwrap();

        let Commands::Rank(args) = cli.command else {
            panic!("expected rank");
        };
        assert_eq!(args.indices, ["NIFTY 50", "NIFTY NEXT 50"]);
        assert_eq!(args.top, Some(10));
        assert!(args.passed_only);
        let params = args.params.resolve().unwrap();
        assert_eq!(params.windows(), [21, 63]);
        assert_eq!(params.weights(), [0.5, -0.5]);
    }

    #[test]
    fn test_rank_default_index() {
        let cli = Cli::try_parse_from(["surge", "rank"]).unwrap();
        let Commands::Rank(args) = cli.command else {
            panic!("expected rank");
        };
        assert_eq!(args.indices, ["NIFTY 50"]);
        assert!(!cli.verbose);
    }
}
