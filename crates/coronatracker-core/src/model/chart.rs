// ── Pie-chart data ──
//
// Slices derived from a summary. Rendering and colours belong to the UI;
// slice order is fixed (Active, Recovered, Deaths) so a UI can pair it with
// a palette by index.

use serde::{Deserialize, Serialize};

use super::summary::Summary;

/// One slice of the summary pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieEntry {
    pub label: String,
    pub value: f64,
}

impl PieEntry {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
        let value = value as f64;
        Self {
            label: label.into(),
            value,
        }
    }

    /// Build the Active / Recovered / Deaths slices for a summary.
    ///
    /// Returns an empty list when there is no summary or no confirmed count.
    pub fn from_summary(summary: Option<&Summary>) -> Vec<Self> {
        let Some(summary) = summary else {
            return Vec::new();
        };
        let Some(active) = summary.active() else {
            return Vec::new();
        };

        vec![
            Self::new("Active", active),
            Self::new("Recovered", summary.recovered.unwrap_or(0)),
            Self::new("Deaths", summary.deaths.unwrap_or(0)),
        ]
    }
}
