use serde::{Deserialize, Serialize};

use crate::models::PricePoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Line,
    Bar,
}

impl ChartKind {
    /// "Bar" selects a bar chart; anything else, including no value, is a line chart.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("Bar") => ChartKind::Bar,
            _ => ChartKind::Line,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
        }
    }
}

/// Everything a charting backend needs to draw one closing-price chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartFigure {
    pub kind: ChartKind,
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub template: Option<String>,
    pub points: Vec<PricePoint>,
}

/// A rendered chart: the figure plus the markup fragment produced for it.
#[derive(Debug, Clone, Serialize)]
pub struct ChartArtifact {
    pub figure: ChartFigure,
    pub markup: String,
}
