//! Line-chart configuration for the history view.
//!
//! The structures mirror a Chart.js line configuration and serialize to it, so a
//! web surface can hand them to the library as-is. Native surfaces read the same
//! fields to draw their own SVG.

pub mod surface;

use serde::{Deserialize, Serialize};

use crate::history::series::ChartSeries;

pub use surface::{ChannelSurface, ChartSurface, LogSurface, RenderedChart};

pub const TEMPERATURE_COLOR: &str = "#ff6b6b";
pub const HUMIDITY_COLOR: &str = "#4ecdc4";
pub const GRID_COLOR: &str = "rgba(255, 255, 255, 0.1)";
pub const TEXT_COLOR: &str = "#fff";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChartConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: String,
    pub background_color: String,
    pub tension: f64,
    pub fill: bool,
    pub point_radius: u32,
    pub point_hover_radius: u32,
    pub point_background_color: String,
    pub point_border_color: String,
    pub point_border_width: u32,
}

impl Dataset {
    fn line(label: &str, data: Vec<f64>, color: &str, fill: &str) -> Self {
        Self {
            label: label.to_string(),
            data,
            border_color: color.to_string(),
            background_color: fill.to_string(),
            tension: 0.4,
            fill: true,
            point_radius: 5,
            point_hover_radius: 7,
            point_background_color: color.to_string(),
            point_border_color: TEXT_COLOR.to_string(),
            point_border_width: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: Plugins,
    pub scales: Scales,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugins {
    pub legend: Legend,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub position: String,
    pub labels: LegendLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendLabels {
    pub color: String,
    pub font: Font,
    pub padding: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size: u32,
    pub weight: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub mode: String,
    pub intersect: bool,
    pub background_color: String,
    pub title_color: String,
    pub body_color: String,
    pub border_color: String,
    pub border_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub begin_at_zero: bool,
    pub grid: Grid,
    pub ticks: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticks {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rotation: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rotation: Option<u32>,
}

impl LineChartConfig {
    pub fn from_series(series: ChartSeries) -> Self {
        let ChartSeries {
            labels,
            temperature,
            humidity,
        } = series;
        Self {
            kind: "line".to_string(),
            data: ChartData {
                labels,
                datasets: vec![
                    Dataset::line(
                        "🌡️ Temperatura (°C)",
                        temperature,
                        TEMPERATURE_COLOR,
                        "rgba(255, 107, 107, 0.1)",
                    ),
                    Dataset::line(
                        "💧 Umidade (%)",
                        humidity,
                        HUMIDITY_COLOR,
                        "rgba(78, 205, 196, 0.1)",
                    ),
                ],
            },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: false,
                plugins: Plugins {
                    legend: Legend {
                        position: "top".to_string(),
                        labels: LegendLabels {
                            color: TEXT_COLOR.to_string(),
                            font: Font {
                                size: 13,
                                weight: "bold".to_string(),
                            },
                            padding: 15,
                        },
                    },
                    tooltip: Tooltip {
                        mode: "index".to_string(),
                        intersect: false,
                        background_color: "rgba(0, 0, 0, 0.8)".to_string(),
                        title_color: TEXT_COLOR.to_string(),
                        body_color: TEXT_COLOR.to_string(),
                        border_color: "rgba(255, 255, 255, 0.3)".to_string(),
                        border_width: 1,
                    },
                },
                scales: Scales {
                    y: Axis {
                        begin_at_zero: true,
                        grid: Grid {
                            color: GRID_COLOR.to_string(),
                        },
                        ticks: Ticks {
                            color: TEXT_COLOR.to_string(),
                            max_rotation: None,
                            min_rotation: None,
                        },
                    },
                    x: Axis {
                        begin_at_zero: false,
                        grid: Grid {
                            color: GRID_COLOR.to_string(),
                        },
                        ticks: Ticks {
                            color: TEXT_COLOR.to_string(),
                            max_rotation: Some(45),
                            min_rotation: Some(0),
                        },
                    },
                },
            },
        }
    }

    /// Number of points per series.
    pub fn points(&self) -> usize {
        self.data.labels.len()
    }

    /// Largest value across all datasets, for scaling a zero-based Y axis.
    pub fn max_value(&self) -> f64 {
        self.data
            .datasets
            .iter()
            .flat_map(|d| d.data.iter().copied())
            .fold(0.0, f64::max)
    }
}
