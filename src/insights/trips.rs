/// Trip table rows.
///
/// The table always has the same five columns. A page with no trips, or a
/// failed fetch, is rendered as a single notice row spanning every column.
use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;

use super::{NOT_AVAILABLE, displayable, to_fixed};
use crate::api::{Trip, TripPage};

/// Column headers, in display order.
pub const TRIP_COLUMNS: [&str; 5] = ["Trip ID", "Pickup", "Dropoff", "Distance (km)", "Fare"];

pub const NO_TRIPS_MESSAGE: &str = "No trip data found.";

/// One row of the trip table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableRow {
    Trip { cells: [String; 5] },
    /// Full-width message row. `error` marks failures as opposed to "no data".
    Notice { text: String, error: bool },
}

impl TableRow {
    pub fn is_notice(&self) -> bool {
        matches!(self, Self::Notice { .. })
    }
}

/// The table body. Replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripTableView {
    pub rows: Vec<TableRow>,
}

impl TripTableView {
    /// A body consisting of a single full-width error row.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            rows: vec![TableRow::Notice {
                text: message.into(),
                error: true,
            }],
        }
    }

    /// Number of actual trip rows, excluding notices.
    pub fn trip_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_notice()).count()
    }
}

/// Build the table body for a page of trips.
pub fn tabulate(page: &TripPage) -> TripTableView {
    if page.trips.is_empty() {
        return TripTableView {
            rows: vec![TableRow::Notice {
                text: NO_TRIPS_MESSAGE.to_string(),
                error: false,
            }],
        };
    }

    TripTableView {
        rows: page
            .trips
            .iter()
            .map(|trip| TableRow::Trip {
                cells: trip_cells(trip),
            })
            .collect(),
    }
}

/// Cells for one trip: id, pickup, dropoff, distance, fare.
pub fn trip_cells(trip: &Trip) -> [String; 5] {
    let or_na = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.to_string());

    [
        or_na(
            trip.trip_id
                .as_ref()
                .filter(|id| !id.is_blank())
                .map(|id| id.to_string()),
        ),
        or_na(trip.pickup_datetime.as_deref().and_then(format_timestamp)),
        or_na(trip.dropoff_datetime.as_deref().and_then(format_timestamp)),
        or_na(displayable(trip.trip_distance_km).map(|d| to_fixed(d, 2))),
        or_na(displayable(trip.fare_amount).map(|f| format!("${}", to_fixed(f, 2)))),
    ]
}

/// Naive layouts the backend has been seen to emit.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Format an ISO timestamp as `M/D/YYYY, h:mm:ss AM`.
///
/// Timestamps carrying an offset are shown in local time; naive ones are
/// shown as-is. Returns `None` for anything unparseable.
pub fn format_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let naive = match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.with_timezone(&Local).naive_local(),
        Err(_) => NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())?,
    };

    Some(naive.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TripId;

    fn sample_trip() -> Trip {
        Trip {
            trip_id: Some(TripId::Text("id2875421".to_string())),
            pickup_datetime: Some("2016-03-14 17:24:55".to_string()),
            dropoff_datetime: Some("2016-03-14T17:32:30".to_string()),
            trip_distance_km: Some(1.4985),
            fare_amount: Some(7.5),
            ..Trip::default()
        }
    }

    #[test]
    fn trip_cells_follow_column_order() {
        let cells = trip_cells(&sample_trip());
        assert_eq!(cells[0], "id2875421");
        assert_eq!(cells[1], "3/14/2016, 5:24:55 PM");
        assert_eq!(cells[2], "3/14/2016, 5:32:30 PM");
        assert_eq!(cells[3], "1.50");
        assert_eq!(cells[4], "$7.50");
    }

    #[test]
    fn missing_fields_render_as_na() {
        let cells = trip_cells(&Trip::default());
        assert!(cells.iter().all(|c| c == NOT_AVAILABLE));
    }

    #[test]
    fn zero_distance_and_fare_render_as_na() {
        let trip = Trip {
            trip_distance_km: Some(0.0),
            fare_amount: Some(0.0),
            ..Trip::default()
        };
        let cells = trip_cells(&trip);
        assert_eq!(cells[3], "N/A");
        assert_eq!(cells[4], "N/A");
    }

    #[test]
    fn distance_and_fare_ties_round_up() {
        let trip = Trip {
            trip_distance_km: Some(2.345),
            fare_amount: Some(7.125),
            ..Trip::default()
        };
        let cells = trip_cells(&trip);
        assert_eq!(cells[3], "2.35");
        assert_eq!(cells[4], "$7.13");
    }

    #[test]
    fn zero_and_blank_trip_ids_render_as_na() {
        for id in [
            TripId::Number(0),
            TripId::Text(String::new()),
        ] {
            let trip = Trip {
                trip_id: Some(id),
                ..Trip::default()
            };
            assert_eq!(trip_cells(&trip)[0], NOT_AVAILABLE);
        }

        let trip = Trip {
            trip_id: Some(TripId::Number(17)),
            ..Trip::default()
        };
        assert_eq!(trip_cells(&trip)[0], "17");
    }

    #[test]
    fn empty_page_is_a_single_notice_row() {
        let view = tabulate(&TripPage::default());
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.trip_count(), 0);
        assert_eq!(
            view.rows[0],
            TableRow::Notice {
                text: NO_TRIPS_MESSAGE.to_string(),
                error: false
            }
        );
    }

    #[test]
    fn one_row_per_trip() {
        let page = TripPage {
            trips: vec![sample_trip(), sample_trip(), Trip::default()],
        };
        let view = tabulate(&page);
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.trip_count(), 3);
    }

    #[test]
    fn timestamps_with_fractional_seconds_parse() {
        assert_eq!(
            format_timestamp("2016-03-14T07:05:09.250").as_deref(),
            Some("3/14/2016, 7:05:09 AM")
        );
    }

    #[test]
    fn rfc3339_timestamps_parse() {
        assert!(format_timestamp("2016-03-14T17:24:55Z").is_some());
        assert!(format_timestamp("2016-03-14T17:24:55+02:00").is_some());
    }

    #[test]
    fn garbage_timestamps_are_rejected() {
        assert_eq!(format_timestamp("yesterday"), None);
        assert_eq!(format_timestamp(""), None);
    }
}
