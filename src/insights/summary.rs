use serde::Serialize;

use super::{NOT_AVAILABLE, format_measure, format_thousands};
use crate::api::InsightsSummary;

/// One labeled metric on the summary panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

/// The rendered summary panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub cards: Vec<MetricCard>,
}

impl SummaryView {
    /// Value of the card labeled `label`, if any.
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.cards
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.value.as_str())
    }
}

/// Turn the stats payload into four cards.
///
/// Zero counts as "no data" for every field, the same as absent or null.
pub fn summarize(summary: &InsightsSummary) -> SummaryView {
    let total_trips = match summary.total_trips {
        Some(n) if n > 0 => format_thousands(n),
        _ => NOT_AVAILABLE.to_string(),
    };

    SummaryView {
        cards: vec![
            MetricCard {
                label: "Total Trips",
                value: total_trips,
            },
            MetricCard {
                label: "Average Duration",
                value: format_measure(summary.avg_duration_min, "min"),
            },
            MetricCard {
                label: "Average Speed",
                value: format_measure(summary.avg_speed_kmh, "km/h"),
            },
            MetricCard {
                label: "Average Distance",
                value: format_measure(summary.avg_distance_km, "km"),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_summary_formats_every_card() {
        let view = summarize(&InsightsSummary {
            total_trips: Some(1_458_644),
            avg_duration_min: Some(15.99),
            avg_speed_kmh: Some(14.4235),
            avg_distance_km: Some(3.4),
        });
        assert_eq!(view.value_of("Total Trips"), Some("1,458,644"));
        assert_eq!(view.value_of("Average Duration"), Some("15.99 min"));
        assert_eq!(view.value_of("Average Speed"), Some("14.42 km/h"));
        assert_eq!(view.value_of("Average Distance"), Some("3.40 km"));
    }

    #[test]
    fn halfway_averages_round_up() {
        let view = summarize(&InsightsSummary {
            avg_duration_min: Some(1.125),
            avg_distance_km: Some(2.5),
            ..InsightsSummary::default()
        });
        assert_eq!(view.value_of("Average Duration"), Some("1.13 min"));
        assert_eq!(view.value_of("Average Distance"), Some("2.50 km"));
    }

    #[test]
    fn empty_summary_is_all_fallbacks() {
        let view = summarize(&InsightsSummary::default());
        assert_eq!(view.cards.len(), 4);
        assert!(view.cards.iter().all(|c| c.value == NOT_AVAILABLE));
    }

    #[test]
    fn zero_values_render_as_fallback() {
        let view = summarize(&InsightsSummary {
            total_trips: Some(0),
            avg_duration_min: Some(0.0),
            avg_speed_kmh: Some(10.0),
            avg_distance_km: None,
        });
        assert_eq!(view.value_of("Total Trips"), Some("N/A"));
        assert_eq!(view.value_of("Average Duration"), Some("N/A"));
        assert_eq!(view.value_of("Average Speed"), Some("10.00 km/h"));
    }
}
