use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Average,
    Count,
    Percentage,
    Ratio,
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Sum => write!(f, "sum"),
            Aggregation::Average => write!(f, "average"),
            Aggregation::Count => write!(f, "count"),
            Aggregation::Percentage => write!(f, "percentage"),
            Aggregation::Ratio => write!(f, "ratio"),
        }
    }
}

/// One classification band. `min` is inclusive, `max` exclusive; an unset
/// bound is open. Bands match in declaration order, first hit wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBand {
    pub label: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    pub color: String,
}

impl ThresholdBand {
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value < max)
    }

    fn is_open_both_ends(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// A declaratively configured metric. Immutable once the registry accepts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub id: String,
    pub required_sources: IndexSet<String>,
    pub aggregation: Aggregation,
    #[serde(default)]
    pub value_field: Option<String>,
    #[serde(default)]
    pub numerator_field: Option<String>,
    #[serde(default)]
    pub denominator_field: Option<String>,
    #[serde(default)]
    pub thresholds: Vec<ThresholdBand>,
    pub higher_is_better: bool,
    #[serde(default)]
    pub trend_eligible: bool,
}

impl MetricDefinition {
    /// The dataset a subject filter and aggregation read from.
    pub fn primary_source(&self) -> &str {
        self.required_sources
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Config("Metric id must not be empty".to_string()));
        }
        if self.required_sources.is_empty() {
            return Err(Error::Config(format!(
                "Metric '{}' declares no required sources",
                self.id
            )));
        }

        match self.aggregation {
            Aggregation::Sum | Aggregation::Average => {
                if self.value_field.is_none() {
                    return Err(Error::Config(format!(
                        "Metric '{}' uses {} but has no value_field",
                        self.id, self.aggregation
                    )));
                }
            }
            Aggregation::Percentage | Aggregation::Ratio => {
                if self.numerator_field.is_none() || self.denominator_field.is_none() {
                    return Err(Error::Config(format!(
                        "Metric '{}' uses {} but is missing numerator_field or denominator_field",
                        self.id, self.aggregation
                    )));
                }
            }
            Aggregation::Count => {}
        }

        // More than one catch-all band can never be reached past the first.
        let open_bands = self
            .thresholds
            .iter()
            .filter(|band| band.is_open_both_ends())
            .count();
        if open_bands > 1 {
            return Err(Error::Config(format!(
                "Metric '{}' has {} threshold bands open on both ends",
                self.id, open_bands
            )));
        }

        if self.trend_eligible && self.thresholds.is_empty() {
            return Err(Error::Config(format!(
                "Metric '{}' is trend eligible but declares no thresholds",
                self.id
            )));
        }

        Ok(())
    }
}
