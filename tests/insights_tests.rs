/// Derivation and rendering tests.
///
/// Exercise the pure insight functions end to end: backend payload in,
/// region content out, then through both renderers.
use taxidash::api::{HourlyPattern, InsightsSummary, PassengerDistribution, Trip, TripId, TripPage, TripQuery};
use taxidash::insights::chart::{ChartKind, LegendPosition};
use taxidash::insights::trips::{TRIP_COLUMNS, TableRow};
use taxidash::insights::{InsightError, hourly, passengers, summary, trips};
use taxidash::render::{DisplaySurface, MemorySurface, Region, RegionContent, html, terminal};

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[test]
fn summary_values_use_two_decimals_and_units() {
    let view = summary::summarize(&InsightsSummary {
        total_trips: Some(1000),
        avg_duration_min: Some(12.0),
        avg_speed_kmh: Some(14.456),
        avg_distance_km: Some(3.1),
    });
    assert_eq!(view.value_of("Average Duration"), Some("12.00 min"));
    assert_eq!(view.value_of("Average Speed"), Some("14.46 km/h"));
    assert_eq!(view.value_of("Average Distance"), Some("3.10 km"));
}

#[test]
fn summary_missing_null_or_zero_is_not_available() {
    let stats: InsightsSummary =
        serde_json::from_str(r#"{"avg_duration_min": null, "avg_speed_kmh": 0}"#).unwrap();
    let view = summary::summarize(&stats);
    for card in &view.cards {
        assert_eq!(card.value, "N/A", "{} should be N/A", card.label);
    }
}

// ---------------------------------------------------------------------------
// Trip table
// ---------------------------------------------------------------------------

#[test]
fn empty_trip_page_is_one_full_width_row() {
    let view = trips::tabulate(&TripPage::default());
    assert_eq!(view.rows.len(), 1);
    assert!(view.rows[0].is_notice());
    assert_eq!(view.trip_count(), 0);
}

#[test]
fn trip_cells_follow_column_order() {
    let page = TripPage {
        trips: vec![Trip {
            trip_id: Some(TripId::Text("id0001".into())),
            pickup_datetime: None,
            dropoff_datetime: Some("not a date".into()),
            trip_distance_km: Some(2.5),
            fare_amount: Some(11.0),
            ..Trip::default()
        }],
    };
    let view = trips::tabulate(&page);
    assert_eq!(TRIP_COLUMNS.len(), 5);
    match &view.rows[0] {
        TableRow::Trip { cells } => {
            assert_eq!(cells[0], "id0001");
            assert_eq!(cells[1], "N/A");
            assert_eq!(cells[2], "N/A");
            assert_eq!(cells[3], "2.50");
            assert_eq!(cells[4], "$11.00");
        }
        other => panic!("expected trip row, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Hourly pattern
// ---------------------------------------------------------------------------

#[test]
fn hourly_peak_ties_are_all_reported_in_order() {
    let pattern = HourlyPattern {
        hours: vec![0, 1, 2, 3],
        counts: vec![3, 5, 5, 1],
    };
    let insight = hourly::analyze(&pattern).unwrap();
    assert_eq!(insight.peak.count, 5);
    assert_eq!(insight.peak.hours, vec![1, 2]);
    assert_eq!(insight.low.count, 1);
    assert_eq!(insight.low.hours, vec![3]);
    assert_eq!(
        insight.sentence(),
        "Peak taxi demand occurs at hour 1, 2 (5 trips). Lowest demand is at hour 3 (1 trips). \
         This pattern suggests strong commuter usage during evening hours."
    );
}

#[test]
fn hourly_empty_is_an_error_not_a_panic() {
    assert_eq!(
        hourly::analyze(&HourlyPattern::default()),
        Err(InsightError::Empty)
    );
}

#[test]
fn hourly_chart_is_a_bar_chart_without_legend() {
    let pattern = HourlyPattern {
        hours: vec![8, 9],
        counts: vec![10, 20],
    };
    let chart = hourly::bar_chart(&pattern);
    assert_eq!(chart.kind, ChartKind::Bar);
    assert_eq!(chart.legend, LegendPosition::Hidden);
    assert_eq!(chart.labels, vec!["8", "9"]);
    assert_eq!(chart.values(), &[10, 20]);
}

// ---------------------------------------------------------------------------
// Passenger distribution
// ---------------------------------------------------------------------------

#[test]
fn passenger_majority_and_percentage() {
    let dist = PassengerDistribution {
        labels: vec!["1".into(), "2".into(), "3".into()],
        counts: vec![50, 30, 20],
    };
    let share = passengers::analyze(&dist).unwrap();
    assert_eq!(share.label, "1");
    assert_eq!(share.percentage, "50.0");

    let chart = passengers::pie_chart(&dist);
    assert_eq!(chart.kind, ChartKind::Pie);
    assert_eq!(chart.legend, LegendPosition::Right);
}

#[test]
fn passenger_zero_total_is_rejected() {
    let dist = PassengerDistribution {
        labels: vec!["1".into(), "2".into()],
        counts: vec![0, 0],
    };
    assert_eq!(passengers::analyze(&dist), Err(InsightError::ZeroTotal));
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn populated_surface() -> MemorySurface {
    let mut surface = MemorySurface::with_all_regions();
    surface.replace(
        Region::Summary,
        RegionContent::Summary(summary::summarize(&InsightsSummary {
            total_trips: Some(42),
            ..InsightsSummary::default()
        })),
    );
    surface.replace(
        Region::TripTable,
        RegionContent::Trips(trips::tabulate(&TripPage::default())),
    );
    let pattern = HourlyPattern {
        hours: vec![0, 1],
        counts: vec![4, 2],
    };
    surface.replace(
        Region::HourlyChart,
        RegionContent::Hourly(hourly::view(&pattern).unwrap()),
    );
    surface.replace(
        Region::PassengerChart,
        RegionContent::no_data("No passenger data available."),
    );
    surface
}

#[test]
fn html_page_contains_every_region_and_filter_form() {
    let query = TripQuery::new(20).with_speeds(Some(5.0), Some(30.0));
    let page = html::render_page(&populated_surface(), &query);

    assert!(page.contains("id=\"insights-container\""));
    assert!(page.contains("id=\"trips-table\""));
    assert!(page.contains("id=\"hourly-insight\""));
    assert!(page.contains("id=\"passenger-insight\""));
    assert!(page.contains("name=\"min_speed\""));
    assert!(page.contains("name=\"max_speed\""));
    assert!(page.contains("No trip data found."));
    assert!(page.contains("No passenger data available."));
    assert!(page.contains("<svg"));
}

#[test]
fn terminal_output_lists_regions_in_order() {
    colored::control::set_override(false);
    let text = terminal::render_text(&populated_surface());

    let summary_at = text.find("Trip Insights").unwrap();
    let trips_at = text.find("Trip Records").unwrap();
    let hourly_at = text.find("Trips per Hour").unwrap();
    assert!(summary_at < trips_at && trips_at < hourly_at);
    assert!(text.contains("No trip data found."));
    assert!(text.contains("Peak taxi demand occurs at hour 0"));
}
