/// Passenger-count distribution: majority category and pie chart.
use serde::Serialize;

use super::{InsightError, to_fixed};
use super::chart::{ChartKind, ChartSpec, Dataset, LegendPosition};
use crate::api::PassengerDistribution;

/// Slice colors, cycled by index.
pub const PALETTE: [&str; 6] = [
    "rgba(255, 99, 132, 0.7)",
    "rgba(54, 162, 235, 0.7)",
    "rgba(255, 206, 86, 0.7)",
    "rgba(75, 192, 192, 0.7)",
    "rgba(153, 102, 255, 0.7)",
    "rgba(255, 159, 64, 0.7)",
];

/// The most common category and its share of all trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MajorityShare {
    pub label: String,
    pub count: u64,
    /// Sum of all counts. Wider than `count` so large categories cannot overflow it.
    pub total: u128,
    /// Share of `total`, one decimal place, no percent sign.
    pub percentage: String,
}

impl MajorityShare {
    pub fn sentence(&self) -> String {
        format!(
            "Most trips ({}%) are taken by {}. This indicates that NYC taxis \
             primarily serve individual commuters rather than groups.",
            self.percentage,
            self.label.to_lowercase()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassengerView {
    pub majority: MajorityShare,
    pub sentence: String,
    pub chart: ChartSpec,
}

/// Find the largest category. On ties the first one wins.
pub fn analyze(dist: &PassengerDistribution) -> Result<MajorityShare, InsightError> {
    if dist.labels.len() != dist.counts.len() {
        return Err(InsightError::Misaligned {
            left: dist.labels.len(),
            right: dist.counts.len(),
        });
    }

    let max = dist.counts.iter().copied().max().ok_or(InsightError::Empty)?;
    let index = dist
        .counts
        .iter()
        .position(|c| *c == max)
        .ok_or(InsightError::Empty)?;

    let total: u128 = dist.counts.iter().map(|c| u128::from(*c)).sum();
    if total == 0 {
        return Err(InsightError::ZeroTotal);
    }

    let share = max as f64 / total as f64 * 100.0;

    Ok(MajorityShare {
        label: dist.labels[index].clone(),
        count: max,
        total,
        percentage: to_fixed(share, 1),
    })
}

/// One slice per label, palette cycled, legend on the right.
pub fn pie_chart(dist: &PassengerDistribution) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Pie,
        title: "Trip Distribution by Passenger Count".to_string(),
        labels: dist.labels.clone(),
        datasets: vec![Dataset {
            label: None,
            data: dist.counts.clone(),
            background_color: (0..dist.counts.len())
                .map(|i| PALETTE[i % PALETTE.len()].to_string())
                .collect(),
        }],
        legend: LegendPosition::Right,
        x_axis_title: None,
        y_axis_title: None,
        stacked: false,
    }
}

pub fn view(dist: &PassengerDistribution) -> Result<PassengerView, InsightError> {
    let majority = analyze(dist)?;
    Ok(PassengerView {
        sentence: majority.sentence(),
        chart: pie_chart(dist),
        majority,
    })
}
