/// Renderer-agnostic chart description.
///
/// Shaped after the usual `{type, data: {labels, datasets}, options}` chart
/// config so the JSON output can be handed to a browser charting library
/// as-is. The HTML renderer draws it as inline SVG instead.
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Hidden,
    Right,
}

/// One data series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<u64>,
    /// One color for the whole series, or one per data point.
    pub background_color: Vec<String>,
}

impl Dataset {
    /// Color for the data point at `index`, cycling if fewer colors than
    /// points were given.
    pub fn color_at(&self, index: usize) -> &str {
        if self.background_color.is_empty() {
            return "gray";
        }
        &self.background_color[index % self.background_color.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub legend: LegendPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_title: Option<String>,
    pub stacked: bool,
}

impl ChartSpec {
    /// Values of the first series, or an empty slice.
    pub fn values(&self) -> &[u64] {
        self.datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or(&[])
    }

    /// Sum of [`values`](Self::values), widened so it cannot overflow.
    pub fn total(&self) -> u128 {
        self.values().iter().map(|v| u128::from(*v)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_at_cycles() {
        let ds = Dataset {
            label: None,
            data: vec![1, 2, 3],
            background_color: vec!["red".into(), "blue".into()],
        };
        assert_eq!(ds.color_at(0), "red");
        assert_eq!(ds.color_at(1), "blue");
        assert_eq!(ds.color_at(2), "red");
    }

    #[test]
    fn total_widens_past_u64() {
        let chart = ChartSpec {
            kind: ChartKind::Pie,
            title: "t".into(),
            labels: vec!["a".into(), "b".into()],
            datasets: vec![Dataset {
                label: None,
                data: vec![u64::MAX, u64::MAX],
                background_color: vec![],
            }],
            legend: LegendPosition::Right,
            x_axis_title: None,
            y_axis_title: None,
            stacked: false,
        };
        assert_eq!(chart.total(), u128::from(u64::MAX) * 2);
    }

    #[test]
    fn spec_serializes_with_type_key() {
        let chart = ChartSpec {
            kind: ChartKind::Bar,
            title: "t".into(),
            labels: vec!["0".into()],
            datasets: vec![],
            legend: LegendPosition::Hidden,
            x_axis_title: None,
            y_axis_title: None,
            stacked: false,
        };
        let json = serde_json::to_string(&chart).unwrap();
        assert!(json.contains("\"type\":\"bar\""));
        assert!(json.contains("\"legend\":\"hidden\""));
        assert!(!json.contains("xAxisTitle"));
    }
}
