//! Plain-terminal rendering of a [`MemorySurface`].

use std::fmt::Write;

use colored::Colorize;

use super::{MemorySurface, Region, RegionContent};
use crate::insights::chart::ChartSpec;
use crate::insights::{format_thousands, to_fixed};
use crate::insights::hourly::HourlyView;
use crate::insights::passengers::PassengerView;
use crate::insights::summary::SummaryView;
use crate::insights::trips::{TRIP_COLUMNS, TableRow, TripTableView};

/// Widest bar drawn for the largest value.
const BAR_WIDTH: usize = 40;

/// Render every present region in display order.
pub fn render_text(surface: &MemorySurface) -> String {
    let mut out = String::new();
    for region in surface.present_regions() {
        let _ = writeln!(out, "{}", heading(region).bold().cyan());
        let _ = writeln!(out, "{}", "=".repeat(60));
        match surface.get(region) {
            Some(content) => render_content(&mut out, content),
            None => {
                let _ = writeln!(out, "  {}", "Loading...".dimmed());
            }
        }
        out.push('\n');
    }
    out
}

fn heading(region: Region) -> &'static str {
    match region {
        Region::Summary => "Trip Insights",
        Region::TripTable => "Trip Records",
        Region::HourlyChart => "Trips per Hour",
        Region::PassengerChart => "Trip Distribution by Passenger Count",
    }
}

fn render_content(out: &mut String, content: &RegionContent) {
    match content {
        RegionContent::Notice { text, error } => {
            let line = if *error {
                text.red().to_string()
            } else {
                text.yellow().to_string()
            };
            let _ = writeln!(out, "  {line}");
        }
        RegionContent::Summary(view) => render_summary(out, view),
        RegionContent::Trips(view) => render_trips(out, view),
        RegionContent::Hourly(view) => render_hourly(out, view),
        RegionContent::Passengers(view) => render_passengers(out, view),
    }
}

fn render_summary(out: &mut String, view: &SummaryView) {
    for card in &view.cards {
        let label = format!("{}:", card.label);
        let _ = writeln!(out, "  {:<18} {}", label.bold(), card.value);
    }
}

fn render_trips(out: &mut String, view: &TripTableView) {
    let _ = writeln!(
        out,
        "  {:<14} {:<24} {:<24} {:>13} {:>10}",
        TRIP_COLUMNS[0], TRIP_COLUMNS[1], TRIP_COLUMNS[2], TRIP_COLUMNS[3], TRIP_COLUMNS[4]
    );
    let _ = writeln!(out, "  {}", "-".repeat(89));

    for (i, row) in view.rows.iter().enumerate() {
        match row {
            TableRow::Trip { cells } => {
                let line = format!(
                    "  {:<14} {:<24} {:<24} {:>13} {:>10}",
                    truncate(&cells[0], 14),
                    cells[1],
                    cells[2],
                    cells[3],
                    cells[4]
                );
                if i % 2 == 0 {
                    let _ = writeln!(out, "{line}");
                } else {
                    let _ = writeln!(out, "{}", line.dimmed());
                }
            }
            TableRow::Notice { text, error } => {
                let text = if *error {
                    text.red().to_string()
                } else {
                    text.yellow().to_string()
                };
                let _ = writeln!(out, "  {text}");
            }
        }
    }
}

fn render_hourly(out: &mut String, view: &HourlyView) {
    let _ = writeln!(out, "  {} {}", "Insight:".bold(), view.sentence);
    out.push('\n');
    render_bars(out, &view.chart);
}

fn render_passengers(out: &mut String, view: &PassengerView) {
    let _ = writeln!(out, "  {} {}", "Insight:".bold(), view.sentence);
    out.push('\n');

    let total = view.chart.total();
    for (label, count) in view.chart.labels.iter().zip(view.chart.values()) {
        let pct = if total == 0 {
            0.0
        } else {
            *count as f64 / total as f64 * 100.0
        };
        let _ = writeln!(
            out,
            "  {:<20} {:>12} {:>6}%",
            truncate(label, 20),
            format_thousands(*count),
            to_fixed(pct, 1)
        );
    }
}

/// Horizontal ASCII bars scaled to the largest value.
fn render_bars(out: &mut String, chart: &ChartSpec) {
    let values = chart.values();
    let max = values.iter().copied().max().unwrap_or(0);

    if let Some(y_title) = &chart.y_axis_title {
        let x_title = chart.x_axis_title.as_deref().unwrap_or("");
        let _ = writeln!(out, "  {}", format!("{x_title} vs {y_title}").dimmed());
    }

    for (label, value) in chart.labels.iter().zip(values) {
        let width = if max == 0 {
            0
        } else {
            ((*value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
        };
        let _ = writeln!(
            out,
            "  {:>4} │{:<bar$} {}",
            label,
            "█".repeat(width),
            format_thousands(*value),
            bar = BAR_WIDTH
        );
    }
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
