/// Hourly demand analysis: peak and low hours, plus the per-hour bar chart.
use serde::Serialize;

use super::chart::{ChartKind, ChartSpec, Dataset, LegendPosition};
use super::{InsightError, format_thousands};
use crate::api::HourlyPattern;

const BAR_COLOR: &str = "rgba(54, 162, 235, 0.6)";

/// A count together with every hour that reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extreme {
    pub count: u64,
    /// Hours in their original sequence order.
    pub hours: Vec<u32>,
}

impl Extreme {
    fn collect(pattern: &HourlyPattern, count: u64) -> Self {
        let hours = pattern
            .hours
            .iter()
            .zip(&pattern.counts)
            .filter(|(_, c)| **c == count)
            .map(|(h, _)| *h)
            .collect();
        Self { count, hours }
    }

    fn hours_joined(&self) -> String {
        self.hours
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyInsight {
    pub peak: Extreme,
    pub low: Extreme,
}

impl HourlyInsight {
    pub fn sentence(&self) -> String {
        format!(
            "Peak taxi demand occurs at hour {} ({} trips). Lowest demand is at hour {} ({} trips). \
             This pattern suggests strong commuter usage during evening hours.",
            self.peak.hours_joined(),
            format_thousands(self.peak.count),
            self.low.hours_joined(),
            format_thousands(self.low.count),
        )
    }
}

/// What the hourly chart region shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyView {
    pub insight: HourlyInsight,
    pub sentence: String,
    pub chart: ChartSpec,
}

/// Find the peak and low hours. Ties are all reported.
pub fn analyze(pattern: &HourlyPattern) -> Result<HourlyInsight, InsightError> {
    if pattern.hours.len() != pattern.counts.len() {
        return Err(InsightError::Misaligned {
            left: pattern.hours.len(),
            right: pattern.counts.len(),
        });
    }

    let max = pattern.counts.iter().copied().max().ok_or(InsightError::Empty)?;
    let min = pattern.counts.iter().copied().min().ok_or(InsightError::Empty)?;

    Ok(HourlyInsight {
        peak: Extreme::collect(pattern, max),
        low: Extreme::collect(pattern, min),
    })
}

/// Single-series bar chart: hours on x, trip counts on y, no legend.
pub fn bar_chart(pattern: &HourlyPattern) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: "NYC Trips per Hour".to_string(),
        labels: pattern.hours.iter().map(u32::to_string).collect(),
        datasets: vec![Dataset {
            label: Some("Trips per Hour".to_string()),
            data: pattern.counts.clone(),
            background_color: vec![BAR_COLOR.to_string()],
        }],
        legend: LegendPosition::Hidden,
        x_axis_title: Some("Hour of Day".to_string()),
        y_axis_title: Some("Number of Trips".to_string()),
        stacked: false,
    }
}

/// Analysis, sentence, and chart in one go.
pub fn view(pattern: &HourlyPattern) -> Result<HourlyView, InsightError> {
    let insight = analyze(pattern)?;
    Ok(HourlyView {
        sentence: insight.sentence(),
        chart: bar_chart(pattern),
        insight,
    })
}
