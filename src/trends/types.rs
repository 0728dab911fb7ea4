use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendDirection {
    Improving,
    Worsening,
    Stable,
    InsufficientData,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Improving => write!(f, "improving"),
            TrendDirection::Worsening => write!(f, "worsening"),
            TrendDirection::Stable => write!(f, "stable"),
            TrendDirection::InsufficientData => write!(f, "insufficient data"),
        }
    }
}

/// One period's reading in a series. No-data periods stay in the series
/// with `has_data: false` so downstream charts can render the gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub period: String,
    pub value: f64,
    pub has_data: bool,
}

/// Summary over the data-bearing points only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub first_value: f64,
    pub last_value: f64,
    pub percent_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    pub metric_id: String,
    pub subject: String,
    pub points: Vec<TrendPoint>,
    pub direction: TrendDirection,
    pub stats: TrendStats,
}

impl TrendResult {
    pub fn data_point_count(&self) -> usize {
        self.points.iter().filter(|point| point.has_data).count()
    }
}
