//! Params command implementation.

use crate::config::{ParamArgs, default_lookback};
use anyhow::Result;
use surge::signals::horizons;

/// Print the effective momentum parameters.
pub(crate) fn show_params(args: &ParamArgs) -> Result<()> {
    let params = args.resolve()?;

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Momentum Parameters                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let source = args
        .config
        .as_ref()
        .map_or_else(|| "defaults".to_string(), |path| path.display().to_string());
    println!("Source:       {source}");
    println!("Min history:  {} prices", params.min_history_days());
    println!("Lookback:     {} trading days", default_lookback(&params));
    println!("Weight sum:   {:.3}", params.weight_sum());
    println!();

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{:<8} {:>8} {:>10} {:>10}", "Horizon", "Days", "Weight", "Share");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for info in horizons(&params) {
        println!(
            "{:<8} {:>8} {:>10.3} {:>9.1}%",
            info.label,
            info.window,
            info.weight,
            info.share * 100.0
        );
    }

    println!();
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}
