//! Plain-text table output

use ca_console::screens::ScreenView;
use chrono::{DateTime, Utc};

pub fn date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn money(amount: f64, currency: &str) -> String {
    if currency.is_empty() {
        format!("{:.2}", amount)
    } else {
        format!("{:.2} {}", amount, currency)
    }
}

/// Print one page of a listing with a footer line
pub fn table<R>(view: &ScreenView<R>, headers: &[&str], cells: impl Fn(&R) -> Vec<String>) {
    let rows: Vec<Vec<String>> = view.rows.iter().map(&cells).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let header: Vec<String> = headers.iter().map(|h| h.to_uppercase()).collect();
    println!("{}", line(&header));
    if rows.is_empty() {
        println!("(no matching records)");
    }
    for row in &rows {
        println!("{}", line(row));
    }
    // Dense tables skip the padding rows
    if !view.dense {
        for _ in 0..view.empty_rows {
            println!();
        }
    }
    println!(
        "-- page {}/{} · {} of {} records · sorted by {} {}",
        view.page + 1,
        view.page_count,
        view.filtered_total,
        view.total,
        view.order_by,
        view.order,
    );
}
