//! Self-contained HTML dashboard page.
//!
//! The page embeds its own CSS and draws both charts as inline SVG, so it
//! works offline and needs no charting library. The trip filter is a plain
//! GET form that submits `min_speed` / `max_speed` back to `/`.

use std::f64::consts::PI;
use std::fmt::Write;

use super::{MemorySurface, Region, RegionContent, escape_html};
use crate::api::TripQuery;
use crate::insights::chart::{ChartSpec, LegendPosition};
use crate::insights::format_thousands;
use crate::insights::summary::SummaryView;
use crate::insights::trips::{TRIP_COLUMNS, TableRow, TripTableView};

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_BOTTOM: f64 = 48.0;
const MARGIN_TOP: f64 = 32.0;

/// Render the full dashboard page for `surface`.
///
/// `query` pre-fills the speed filter inputs.
pub fn render_page(surface: &MemorySurface, query: &TripQuery) -> String {
    let mut sections = String::new();
    for region in surface.present_regions() {
        sections.push_str(&render_region(region, surface.get(region), query));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>NYC Mobility Dashboard</title>
<style>{css}</style>
</head>
<body>
<div class="app">
<header><h1>NYC Mobility Dashboard</h1></header>
{sections}
</div>
</body>
</html>
"#,
        css = CSS,
        sections = sections,
    )
}

fn render_region(region: Region, content: Option<&RegionContent>, query: &TripQuery) -> String {
    match region {
        Region::Summary => format!(
            r#"<section class="card"><h2>Trip Insights</h2><div id="insights-container">{}</div></section>
"#,
            content.map(render_summary_content).unwrap_or_else(loading)
        ),
        Region::TripTable => format!(
            r#"<section class="card"><h2>Trip Records</h2>{filter}<table id="trips-table"><thead><tr>{head}</tr></thead><tbody>{body}</tbody></table></section>
"#,
            filter = render_filter_form(query),
            head = TRIP_COLUMNS
                .iter()
                .map(|c| format!("<th>{}</th>", escape_html(c)))
                .collect::<String>(),
            body = match content {
                Some(RegionContent::Trips(view)) => render_trip_rows(view),
                Some(RegionContent::Notice { text, error }) => notice_row(text, *error),
                _ => notice_row("Loading...", false),
            },
        ),
        Region::HourlyChart => chart_section(
            "Trips per Hour",
            "hourlyChart",
            "hourly-insight",
            content,
        ),
        Region::PassengerChart => chart_section(
            "Passenger Distribution",
            "passengerChart",
            "passenger-insight",
            content,
        ),
    }
}

fn loading() -> String {
    "<p>Loading...</p>".to_string()
}

fn notice_paragraph(text: &str, error: bool) -> String {
    let class = if error { " class=\"error\"" } else { "" };
    format!("<p{class}>{}</p>", escape_html(text))
}

fn render_summary_content(content: &RegionContent) -> String {
    match content {
        RegionContent::Summary(view) => render_summary(view),
        RegionContent::Notice { text, error } => notice_paragraph(text, *error),
        _ => String::new(),
    }
}

fn render_summary(view: &SummaryView) -> String {
    view.cards
        .iter()
        .map(|card| {
            format!(
                r#"<div class="insight-card"><h3>{}:</h3><p>{}</p></div>"#,
                escape_html(card.label),
                escape_html(&card.value)
            )
        })
        .collect()
}

fn render_filter_form(query: &TripQuery) -> String {
    let min = if query.min_speed > 0.0 {
        query.min_speed.to_string()
    } else {
        String::new()
    };
    let max = query.max_speed.map(|v| v.to_string()).unwrap_or_default();
    format!(
        r#"<form class="filters" method="get" action="/"><label>Min speed (km/h) <input id="min-speed" name="min_speed" type="number" step="any" min="0" value="{min}"></label><label>Max speed (km/h) <input id="max-speed" name="max_speed" type="number" step="any" min="0" value="{max}"></label><button id="filter-btn" type="submit">Filter</button></form>"#
    )
}

fn render_trip_rows(view: &TripTableView) -> String {
    let mut out = String::new();
    for row in &view.rows {
        match row {
            TableRow::Trip { cells } => {
                out.push_str("<tr>");
                for cell in cells {
                    let _ = write!(out, "<td>{}</td>", escape_html(cell));
                }
                out.push_str("</tr>");
            }
            TableRow::Notice { text, error } => out.push_str(&notice_row(text, *error)),
        }
    }
    out
}

fn notice_row(text: &str, error: bool) -> String {
    let class = if error { r#" class="error""# } else { "" };
    format!(
        r#"<tr><td colspan="{}"{class}>{}</td></tr>"#,
        TRIP_COLUMNS.len(),
        escape_html(text)
    )
}

fn chart_section(
    title: &str,
    chart_id: &str,
    insight_id: &str,
    content: Option<&RegionContent>,
) -> String {
    let body = match content {
        Some(RegionContent::Hourly(view)) => format!(
            r#"<p id="{insight_id}" class="insight"><strong>Insight:</strong> {}</p>{}"#,
            escape_html(&view.sentence),
            render_bar_svg(&view.chart, chart_id)
        ),
        Some(RegionContent::Passengers(view)) => format!(
            r#"<p id="{insight_id}" class="insight"><strong>Insight:</strong> {}</p>{}"#,
            escape_html(&view.sentence),
            render_pie_svg(&view.chart, chart_id)
        ),
        Some(RegionContent::Notice { text, error }) => {
            let class = if *error { "insight error" } else { "insight" };
            format!(
                r#"<p id="{insight_id}" class="{class}">{}</p>"#,
                escape_html(text)
            )
        }
        _ => loading(),
    };
    format!(
        r#"<section class="card"><h2>{}</h2>{body}</section>
"#,
        escape_html(title)
    )
}

// ---------------------------------------------------------------------------
// SVG charts
// ---------------------------------------------------------------------------

/// Vertical bar chart with axis titles.
pub fn render_bar_svg(chart: &ChartSpec, id: &str) -> String {
    let values = chart.values();
    let max = values.iter().copied().max().unwrap_or(0).max(1);
    let plot_w = CHART_WIDTH - MARGIN_LEFT - 16.0;
    let plot_h = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let slot = plot_w / values.len().max(1) as f64;
    let bar_w = (slot * 0.8).max(1.0);
    let color = chart
        .datasets
        .first()
        .map(|d| d.color_at(0).to_string())
        .unwrap_or_default();

    let mut svg = format!(
        r#"<svg id="{id}" class="chart" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" role="img" aria-label="{title}">"#,
        title = escape_html(&chart.title)
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="20" text-anchor="middle" class="chart-title">{}</text>"#,
        CHART_WIDTH / 2.0,
        escape_html(&chart.title)
    );

    let baseline = MARGIN_TOP + plot_h;
    let _ = write!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{baseline}" x2="{}" y2="{baseline}" class="axis"/>"#,
        MARGIN_LEFT + plot_w
    );
    let _ = write!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{baseline}" class="axis"/>"#
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="end" class="tick">{}</text>"#,
        MARGIN_LEFT - 6.0,
        MARGIN_TOP + 4.0,
        format_thousands(max)
    );

    for (i, (label, value)) in chart.labels.iter().zip(values).enumerate() {
        let h = *value as f64 / max as f64 * plot_h;
        let x = MARGIN_LEFT + i as f64 * slot + (slot - bar_w) / 2.0;
        let _ = write!(
            svg,
            r#"<rect x="{x:.1}" y="{:.1}" width="{bar_w:.1}" height="{h:.1}" fill="{color}"><title>{}: {}</title></rect>"#,
            baseline - h,
            escape_html(label),
            format_thousands(*value)
        );
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{}" text-anchor="middle" class="tick">{}</text>"#,
            x + bar_w / 2.0,
            baseline + 14.0,
            escape_html(label)
        );
    }

    if let Some(x_title) = &chart.x_axis_title {
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" class="axis-title">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            CHART_HEIGHT - 8.0,
            escape_html(x_title)
        );
    }
    if let Some(y_title) = &chart.y_axis_title {
        let cy = MARGIN_TOP + plot_h / 2.0;
        let _ = write!(
            svg,
            r#"<text x="16" y="{cy}" text-anchor="middle" transform="rotate(-90 16 {cy})" class="axis-title">{}</text>"#,
            escape_html(y_title)
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Pie chart with the legend to the right.
pub fn render_pie_svg(chart: &ChartSpec, id: &str) -> String {
    let values = chart.values();
    let total = chart.total();
    let radius = (CHART_HEIGHT - MARGIN_TOP - 24.0) / 2.0;
    let cx = MARGIN_LEFT + radius;
    let cy = MARGIN_TOP + radius + 8.0;

    let mut svg = format!(
        r#"<svg id="{id}" class="chart" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" role="img" aria-label="{title}">"#,
        title = escape_html(&chart.title)
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="20" text-anchor="middle" class="chart-title">{}</text>"#,
        CHART_WIDTH / 2.0,
        escape_html(&chart.title)
    );

    let dataset = chart.datasets.first();
    let color = |i: usize| dataset.map(|d| d.color_at(i)).unwrap_or("gray");

    let mut start = -PI / 2.0;
    for (i, value) in values.iter().enumerate() {
        if total == 0 || *value == 0 {
            continue;
        }
        let fraction = *value as f64 / total as f64;
        if fraction >= 1.0 {
            let _ = write!(
                svg,
                r#"<circle cx="{cx}" cy="{cy}" r="{radius}" fill="{}"/>"#,
                color(i)
            );
            continue;
        }
        let end = start + fraction * 2.0 * PI;
        let (x1, y1) = (cx + radius * start.cos(), cy + radius * start.sin());
        let (x2, y2) = (cx + radius * end.cos(), cy + radius * end.sin());
        let large_arc = u8::from(fraction > 0.5);
        let _ = write!(
            svg,
            r#"<path d="M {cx:.1} {cy:.1} L {x1:.2} {y1:.2} A {radius:.1} {radius:.1} 0 {large_arc} 1 {x2:.2} {y2:.2} Z" fill="{}"/>"#,
            color(i)
        );
        start = end;
    }

    if chart.legend == LegendPosition::Right {
        let legend_x = cx + radius + 48.0;
        for (i, (label, value)) in chart.labels.iter().zip(values).enumerate() {
            let y = MARGIN_TOP + 16.0 + i as f64 * 22.0;
            let _ = write!(
                svg,
                r#"<rect x="{legend_x}" y="{}" width="14" height="14" fill="{}"/><text x="{}" y="{y}" class="legend">{} ({})</text>"#,
                y - 11.0,
                color(i),
                legend_x + 22.0,
                escape_html(label),
                format_thousands(*value)
            );
        }
    }

    svg.push_str("</svg>");
    svg
}

const CSS: &str = r#"
:root { --bg: #0d1117; --surface: #161b22; --border: #30363d; --text: #e6edf3;
  --muted: #8b949e; --accent: #58a6ff; --red: #f85149; --radius: 8px; }
* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: var(--bg); color: var(--text); font: 14px/1.5 -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; }
.app { max-width: 1100px; margin: 0 auto; padding: 24px; }
header { margin-bottom: 24px; padding-bottom: 16px; border-bottom: 1px solid var(--border); }
.card { background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius); padding: 20px; margin-bottom: 16px; }
.card h2 { font-size: 16px; margin-bottom: 16px; }
#insights-container { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 16px; }
.insight-card { border: 1px solid var(--border); border-radius: var(--radius); padding: 16px; text-align: center; }
.insight-card h3 { font-size: 12px; color: var(--muted); text-transform: uppercase; }
.insight-card p { font-size: 24px; font-weight: 700; color: var(--accent); }
.filters { display: flex; gap: 12px; margin-bottom: 12px; align-items: center; }
.filters input { width: 100px; background: var(--bg); color: var(--text); border: 1px solid var(--border); padding: 4px; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid var(--border); }
.error { color: var(--red); }
.insight { margin-bottom: 12px; }
.chart { width: 100%; height: auto; }
.chart text { fill: var(--text); font-size: 11px; }
.chart .chart-title { font-size: 14px; font-weight: 600; }
.chart .axis { stroke: var(--muted); }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HourlyPattern, PassengerDistribution, TripPage};
    use crate::insights::{hourly, passengers, trips};
    use crate::render::DisplaySurface;

    #[test]
    fn empty_table_has_single_full_width_row() {
        let mut surface = MemorySurface::new([Region::TripTable]);
        surface.replace(
            Region::TripTable,
            RegionContent::Trips(trips::tabulate(&TripPage::default())),
        );
        let page = render_page(&surface, &TripQuery::default());
        assert_eq!(page.matches("<tr><td colspan=\"5\">").count(), 1);
        assert!(page.contains("No trip data found."));
    }

    #[test]
    fn error_notice_row_carries_error_class() {
        let view = TripTableView::error("Failed to load trip data.");
        let rows = render_trip_rows(&view);
        assert!(rows.contains(r#"colspan="5" class="error""#));
    }

    #[test]
    fn filter_form_prefills_speeds() {
        let query = TripQuery::default().with_speeds(Some(5.0), Some(30.5));
        let form = render_filter_form(&query);
        assert!(form.contains(r#"name="min_speed" type="number" step="any" min="0" value="5""#));
        assert!(form.contains(r#"value="30.5""#));
        assert!(form.contains("filter-btn"));
    }

    #[test]
    fn bar_svg_draws_one_rect_per_hour() {
        let pattern = HourlyPattern {
            hours: vec![0, 1, 2],
            counts: vec![4, 8, 2],
        };
        let svg = render_bar_svg(&hourly::bar_chart(&pattern), "hourlyChart");
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains("Hour of Day"));
        assert!(svg.contains("Number of Trips"));
    }

    #[test]
    fn pie_svg_has_slice_and_legend_entry_per_label() {
        let dist = PassengerDistribution {
            labels: vec!["1".into(), "2".into(), "3".into()],
            counts: vec![50, 30, 20],
        };
        let svg = render_pie_svg(&passengers::pie_chart(&dist), "passengerChart");
        assert_eq!(svg.matches("<path").count(), 3);
        assert_eq!(svg.matches("class=\"legend\"").count(), 3);
    }

    #[test]
    fn single_slice_pie_is_a_circle() {
        let dist = PassengerDistribution {
            labels: vec!["1".into()],
            counts: vec![9],
        };
        let svg = render_pie_svg(&passengers::pie_chart(&dist), "p");
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn pie_svg_handles_counts_near_u64_max() {
        let dist = PassengerDistribution {
            labels: vec!["1".into(), "2".into()],
            counts: vec![u64::MAX, 1],
        };
        let svg = render_pie_svg(&passengers::pie_chart(&dist), "p");
        assert!(svg.contains("<circle"));
        assert_eq!(svg.matches("class=\"legend\"").count(), 2);
    }

    #[test]
    fn insight_text_is_escaped() {
        let dist = PassengerDistribution {
            labels: vec!["<b>Solo</b>".into()],
            counts: vec![1],
        };
        let mut surface = MemorySurface::new([Region::PassengerChart]);
        surface.replace(
            Region::PassengerChart,
            RegionContent::Passengers(passengers::view(&dist).unwrap()),
        );
        let page = render_page(&surface, &TripQuery::default());
        assert!(page.contains("&lt;b&gt;solo&lt;/b&gt;"));
        assert!(!page.contains("<b>solo</b>"));
    }
}
