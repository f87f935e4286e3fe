/// Wire types for the analytics backend.
///
/// Every response body is deserialized into one of these structs. Numeric
/// fields the backend may omit are `Option`s; `null` and a missing key are
/// treated the same way. Only the canonical (second) backend schema is
/// supported: `trip_id`, `trip_distance_km`, and the `{ "trips": [...] }`
/// page wrapper.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// /insights/stats
// ---------------------------------------------------------------------------

/// Aggregate trip statistics returned by `GET /insights/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsSummary {
    pub total_trips: Option<u64>,
    pub avg_duration_min: Option<f64>,
    pub avg_speed_kmh: Option<f64>,
    pub avg_distance_km: Option<f64>,
}

// ---------------------------------------------------------------------------
// /trips/
// ---------------------------------------------------------------------------

/// Trip identifier. The backend sends either a numeric primary key or a
/// string id depending on how the table was loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TripId {
    Number(i64),
    Text(String),
}

impl TripId {
    /// `0` and `""` carry no identity and display as absent.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Number(n) => *n == 0,
            Self::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A single trip record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trip {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<TripId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropoff_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passenger_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_duration_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_kmh: Option<f64>,
}

/// One page of trips as returned by `GET /trips/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripPage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub trips: Vec<Trip>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Query parameters for the trip list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripQuery {
    /// Page size requested from the server.
    pub limit: u32,
    /// Lower speed bound in km/h. Non-finite or negative values collapse to 0.
    pub min_speed: f64,
    /// Upper speed bound in km/h. `None` (or zero) means unbounded.
    pub max_speed: Option<f64>,
}

/// Page size the backend enforces when no limit is given.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

impl Default for TripQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            min_speed: 0.0,
            max_speed: None,
        }
    }
}

impl TripQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Apply speed filters as entered by the user.
    pub fn with_speeds(mut self, min_speed: Option<f64>, max_speed: Option<f64>) -> Self {
        self.min_speed = min_speed
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(0.0);
        self.max_speed = max_speed.filter(|v| v.is_finite() && *v != 0.0);
        self
    }

    /// Query-string pairs in the order the backend documents them.
    ///
    /// `max_speed` is only sent when set and non-zero.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("min_speed", self.min_speed.to_string()),
        ];
        if let Some(max) = self.max_speed.filter(|v| *v != 0.0) {
            pairs.push(("max_speed", max.to_string()));
        }
        pairs
    }
}

// ---------------------------------------------------------------------------
// /insights/hourly-pattern
// ---------------------------------------------------------------------------

/// Trip volume per hour of day, paired by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyPattern {
    pub hours: Vec<u32>,
    pub counts: Vec<u64>,
}

impl HourlyPattern {
    /// Shape check applied right after decoding.
    pub fn validate(&self) -> Result<(), String> {
        if self.hours.len() != self.counts.len() {
            return Err(format!(
                "hours and counts differ in length ({} vs {})",
                self.hours.len(),
                self.counts.len()
            ));
        }
        if let Some(bad) = self.hours.iter().find(|h| **h > 23) {
            return Err(format!("hour {bad} is outside 0-23"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// /insights/passenger-distribution
// ---------------------------------------------------------------------------

/// Trip counts per passenger category, paired by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassengerDistribution {
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
}

impl PassengerDistribution {
    pub fn validate(&self) -> Result<(), String> {
        if self.labels.len() != self.counts.len() {
            return Err(format!(
                "labels and counts differ in length ({} vs {})",
                self.labels.len(),
                self.counts.len()
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// API root
// ---------------------------------------------------------------------------

/// Response of `GET {base_url}`: a greeting plus an endpoint directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_treats_null_and_missing_alike() {
        let json = r#"{"total_trips": 1200, "avg_duration_min": null}"#;
        let summary: InsightsSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total_trips, Some(1200));
        assert_eq!(summary.avg_duration_min, None);
        assert_eq!(summary.avg_speed_kmh, None);
    }

    #[test]
    fn trip_id_accepts_numbers_and_strings() {
        let page: TripPage =
            serde_json::from_str(r#"{"trips": [{"trip_id": 7}, {"trip_id": "id2875421"}]}"#)
                .unwrap();
        assert_eq!(page.trips[0].trip_id.as_ref().unwrap().to_string(), "7");
        assert_eq!(
            page.trips[1].trip_id.as_ref().unwrap().to_string(),
            "id2875421"
        );
    }

    #[test]
    fn trip_page_defaults_to_empty() {
        let missing: TripPage = serde_json::from_str("{}").unwrap();
        assert!(missing.trips.is_empty());
        let null: TripPage = serde_json::from_str(r#"{"trips": null}"#).unwrap();
        assert!(null.trips.is_empty());
    }

    #[test]
    fn query_pairs_omit_absent_max_speed() {
        let query = TripQuery::default();
        assert_eq!(
            query.query_pairs(),
            vec![("limit", "20".to_string()), ("min_speed", "0".to_string())]
        );
    }

    #[test]
    fn query_pairs_include_max_speed() {
        let query = TripQuery::new(20).with_speeds(Some(12.5), Some(40.0));
        let pairs = query.query_pairs();
        assert_eq!(pairs[1], ("min_speed", "12.5".to_string()));
        assert_eq!(pairs[2], ("max_speed", "40".to_string()));
    }

    #[test]
    fn zero_max_speed_means_unbounded() {
        let query = TripQuery::new(20).with_speeds(None, Some(0.0));
        assert_eq!(query.max_speed, None);
        assert_eq!(query.query_pairs().len(), 2);
    }

    #[test]
    fn hourly_validate_rejects_misaligned() {
        let pattern = HourlyPattern {
            hours: vec![0, 1],
            counts: vec![3],
        };
        assert!(pattern.validate().is_err());
    }

    #[test]
    fn hourly_validate_rejects_out_of_range_hour() {
        let pattern = HourlyPattern {
            hours: vec![24],
            counts: vec![3],
        };
        assert!(pattern.validate().unwrap_err().contains("24"));
    }
}
