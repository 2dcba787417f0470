//! Terminal table and CSV export of a ranking.

use anyhow::Result;
use console::{Style, style};
use serde::Serialize;
use std::{collections::HashMap, io::Write};
use surge::{RankingRow, RankingTable};

/// Company names keyed by symbol.
pub(crate) type Names = HashMap<String, String>;

/// Rank for display: whole ranks without decimals, ties with one, `-` if undefined.
pub(crate) fn fmt_rank(rank: f64) -> String {
    if !rank.is_finite() {
        "-".to_string()
    } else if rank.fract() == 0.0 {
        format!("{rank:.0}")
    } else {
        format!("{rank:.1}")
    }
}

/// Signed rank change, `-` if undefined.
pub(crate) fn fmt_velocity(velocity: f64) -> String {
    if !velocity.is_finite() {
        "-".to_string()
    } else if velocity > 0.0 {
        format!("+{}", fmt_rank(velocity))
    } else {
        fmt_rank(velocity)
    }
}

/// Green for an improving rank, red for a falling one.
pub(crate) fn velocity_style(velocity: f64) -> Style {
    if velocity > 0.0 {
        Style::new().green()
    } else if velocity < 0.0 {
        Style::new().red()
    } else {
        Style::new()
    }
}

fn fmt_number(value: f64, precision: usize) -> String {
    if value.is_finite() {
        format!("{value:.precision$}")
    } else {
        "-".to_string()
    }
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Print the ranking as an aligned table.
pub(crate) fn print_table(table: &RankingTable, names: &Names) {
    println!(
        "{:>6} {:<16} {:<28} {:>8} {:>6} {:>10} {:>10} {:>10} {:>6} {:>6} {:>6}",
        "Rank", "Symbol", "Name", "Score", "Vel", "Price", "50 EMA", "52W High", "1M", "2M", "3M"
    );
    println!("{}", "─".repeat(124));

    for row in table {
        let name = names.get(&row.symbol).map_or("", String::as_str);
        let velocity = format!("{:>6}", fmt_velocity(row.rank_velocity));
        let marker = if row.filters_passed {
            style("✓").green().to_string()
        } else {
            " ".to_string()
        };

        println!(
            "{:>6} {:<16} {:<28} {:>8} {} {:>10} {:>10} {:>10} {:>6} {:>6} {:>6} {}",
            fmt_rank(row.current_rank),
            row.symbol,
            truncate(name, 28),
            fmt_number(row.momentum_score, 3),
            velocity_style(row.rank_velocity).apply_to(velocity),
            fmt_number(row.price, 2),
            fmt_number(row.ema_50, 2),
            fmt_number(row.high_52w, 2),
            fmt_rank(row.rank_1m_ago),
            fmt_rank(row.rank_2m_ago),
            fmt_rank(row.rank_3m_ago),
            marker,
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

/// One CSV line of the exported ranking.
#[derive(Debug, Serialize)]
pub(crate) struct CsvRecord<'a> {
    current_rank: Option<f64>,
    symbol: &'a str,
    name: &'a str,
    momentum_score: Option<f64>,
    rank_velocity: Option<f64>,
    price: Option<f64>,
    filters_passed: bool,
    above_ema_50: bool,
    near_52w_high: bool,
    rank_1m_ago: Option<f64>,
    rank_2m_ago: Option<f64>,
    rank_3m_ago: Option<f64>,
    ema_50: Option<f64>,
    high_52w: Option<f64>,
}

fn defined(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

impl<'a> CsvRecord<'a> {
    pub(crate) fn new(row: &'a RankingRow, names: &'a Names) -> Self {
        Self {
            current_rank: defined(row.current_rank),
            symbol: &row.symbol,
            name: names.get(&row.symbol).map_or("", String::as_str),
            momentum_score: defined(row.momentum_score),
            rank_velocity: defined(row.rank_velocity),
            price: defined(row.price),
            filters_passed: row.filters_passed,
            above_ema_50: row.above_ema_50,
            near_52w_high: row.near_52w_high,
            rank_1m_ago: defined(row.rank_1m_ago),
            rank_2m_ago: defined(row.rank_2m_ago),
            rank_3m_ago: defined(row.rank_3m_ago),
            ema_50: defined(row.ema_50),
            high_52w: defined(row.high_52w),
        }
    }
}

/// Write the ranking as CSV; undefined numbers are left empty.
pub(crate) fn write_csv<W: Write>(writer: W, table: &RankingTable, names: &Names) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in table {
        csv.serialize(CsvRecord::new(row, names))?;
    }
    csv.flush()?;
    Ok(())
}

/// Summary line under the table.
pub(crate) fn summary(table: &RankingTable) -> String {
    let passed = table.passed().count();
    let ranked = table.iter().filter(|r| r.is_ranked()).count();
    format!(
        "{} instruments, {} ranked, {} passing filters ({})",
        table.len(),
        ranked,
        passed,
        yes_no(passed > 0)
    )
}
