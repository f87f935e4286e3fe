//! Pure derivations from analytics data to display-ready values.
//!
//! Nothing in here performs I/O. Each submodule turns one backend payload
//! into a view struct:
//! - **summary**: four labeled metric cards
//! - **trips**: fixed five-column table rows
//! - **hourly**: peak/low hours, insight sentence, bar chart
//! - **passengers**: majority category, insight sentence, pie chart

pub mod chart;
pub mod hourly;
pub mod passengers;
pub mod summary;
pub mod trips;

use thiserror::Error;

/// Literal shown wherever a value is absent or zero.
pub const NOT_AVAILABLE: &str = "N/A";

/// Empty-data conditions that make an insight impossible to compute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsightError {
    #[error("no data points to analyze")]
    Empty,
    #[error("counts sum to zero")]
    ZeroTotal,
    #[error("sequences differ in length ({left} vs {right})")]
    Misaligned { left: usize, right: usize },
}

/// Keep a float only if it is worth displaying: present, finite, non-zero.
pub fn displayable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

/// Format `value` with a fixed number of decimals, rounding ties away from zero.
///
/// `format!("{:.2}")` rounds an exact tie such as `1.125` to even ("1.12");
/// dashboard figures round it up ("1.13").
pub fn to_fixed(value: f64, digits: usize) -> String {
    let scale = 10f64.powi(digits as i32);
    let scaled = (value * scale).round() / scale;
    let rounded = if scaled.is_finite() { scaled } else { value };
    format!("{rounded:.digits$}")
}

/// Format `value` with two decimals and a unit suffix, or [`NOT_AVAILABLE`].
pub fn format_measure(value: Option<f64>, unit: &str) -> String {
    match displayable(value) {
        Some(v) => format!("{} {unit}", to_fixed(v, 2)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format a number with comma separators for readability.
pub fn format_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
