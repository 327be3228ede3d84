use crate::shared::types::Reading;

pub const MISSING_LABEL: &str = "N/A";

/// Chart-ready view of a history window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
}

impl ChartSeries {
    pub fn from_history(history: &[Reading]) -> Self {
        let sorted = sorted_by_timestamp(history);
        Self {
            labels: sorted.iter().map(|r| time_label(&r.timestamp)).collect(),
            temperature: sorted.iter().map(|r| r.temperature).collect(),
            humidity: sorted.iter().map(|r| r.humidity).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Stable sort on the raw timestamp string. Only chronological when every
/// timestamp shares one zero-padded format.
pub fn sorted_by_timestamp(history: &[Reading]) -> Vec<Reading> {
    let mut out = history.to_vec();
    out.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    out
}

/// `HH:MM` from either `"<date>, <time>"` or an ISO-8601 timestamp.
pub fn time_label(ts: &str) -> String {
    let label: String = if ts.contains(',') {
        ts.split(", ")
            .nth(1)
            .map(|time| time.chars().take(5).collect())
            .unwrap_or_default()
    } else {
        ts.chars().skip(11).take(5).collect()
    };
    if label.is_empty() {
        MISSING_LABEL.to_string()
    } else {
        label
    }
}
