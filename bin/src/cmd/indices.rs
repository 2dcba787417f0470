//! Indices command implementation.

use surge::data::NSE_INDICES;

/// Print the index catalogue.
pub(crate) fn list_indices() {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                      Available Indices                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    for (name, url) in NSE_INDICES {
        println!("  {name:<22} {}", console::style(url).dim());
    }

    println!("\nTotal: {} indices", NSE_INDICES.len());
}
