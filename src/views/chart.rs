//! Chart configuration objects
//!
//! Renderer-agnostic: the browser draws these on a canvas, the CLI prints
//! them as text.

use serde::Serialize;

pub const NEON_CYAN: &str = "#00d4ff";
pub const NEON_MAGENTA: &str = "#ff006e";
pub const NEON_GREEN: &str = "#00ff88";
pub const NEON_AMBER: &str = "#ffb703";
pub const NEON_PURPLE: &str = "#7b2cbf";

/// Fixed palette, in series order
pub const NEON_PALETTE: [&str; 5] = [NEON_CYAN, NEON_MAGENTA, NEON_GREEN, NEON_AMBER, NEON_PURPLE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Donut of shares
    Pie,
    /// Values over ordered labels
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: u64,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub points: Vec<ChartPoint>,
    pub colors: Vec<&'static str>,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, kind: ChartKind, points: Vec<ChartPoint>) -> Self {
        Self {
            title: title.into(),
            kind,
            points,
            colors: NEON_PALETTE.to_vec(),
        }
    }

    pub fn with_colors(mut self, colors: &[&'static str]) -> Self {
        self.colors = colors.to_vec();
        self
    }

    /// Colour for the point or series at `idx`, cycling through the palette
    pub fn color_for(&self, idx: usize) -> &'static str {
        if self.colors.is_empty() {
            return NEON_CYAN;
        }
        self.colors[idx % self.colors.len()]
    }

    pub fn total(&self) -> u64 {
        self.points.iter().map(|p| p.value).sum()
    }

    pub fn max_value(&self) -> u64 {
        self.points.iter().map(|p| p.value).max().unwrap_or(0)
    }

    /// True when there is nothing worth drawing
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Fraction of the total held by each point; all zero for an empty chart
    pub fn shares(&self) -> Vec<f64> {
        let total = self.total();
        self.points
            .iter()
            .map(|p| {
                if total == 0 {
                    0.0
                } else {
                    p.value as f64 / total as f64
                }
            })
            .collect()
    }
}
