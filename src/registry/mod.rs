mod definition;

pub use definition::{Aggregation, MetricDefinition, ThresholdBand};

use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Validated, declaration-ordered collection of metric definitions.
/// Built once at startup and passed by reference into the engine and the
/// trend analyzer.
#[derive(Debug, Clone)]
pub struct Registry {
    metrics: IndexMap<String, MetricDefinition>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default, rename = "metric")]
    metrics: Vec<MetricDefinition>,
}

impl Registry {
    /// Validate every definition eagerly. A broken definition must fail
    /// here, at startup, not when a calculation first touches it.
    pub fn load(definitions: Vec<MetricDefinition>) -> Result<Self> {
        let mut metrics = IndexMap::with_capacity(definitions.len());

        for definition in definitions {
            definition.validate()?;
            if metrics.contains_key(&definition.id) {
                return Err(Error::Config(format!(
                    "Duplicate metric id: {}",
                    definition.id
                )));
            }
            metrics.insert(definition.id.clone(), definition);
        }

        log::debug!("Loaded {} metric definitions", metrics.len());
        Ok(Self { metrics })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse metric definitions: {}", e)))?;
        Self::load(file.metrics)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn get(&self, metric_id: &str) -> Result<&MetricDefinition> {
        self.metrics
            .get(metric_id)
            .ok_or_else(|| Error::NotFound(metric_id.to_string()))
    }

    pub fn contains(&self, metric_id: &str) -> bool {
        self.metrics.contains_key(metric_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.metrics.values()
    }

    /// Definitions flagged for trend display. Advisory: `analyze` still
    /// honors an explicit request for any known metric.
    pub fn trend_eligible(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.metrics.values().filter(|def| def.trend_eligible)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
        [[metric]]
        id = "attendance_rate"
        required_sources = ["attendance"]
        aggregation = "percentage"
        numerator_field = "actual_days"
        denominator_field = "total_days"
        higher_is_better = true
        trend_eligible = true

        [[metric.thresholds]]
        label = "excellent"
        min = 95.0
        color = "green"

        [[metric.thresholds]]
        label = "acceptable"
        min = 85.0
        max = 95.0
        color = "amber"

        [[metric.thresholds]]
        label = "critical"
        max = 85.0
        color = "red"

        [[metric]]
        id = "headcount"
        required_sources = ["roster"]
        aggregation = "count"
        higher_is_better = true
    "#;

    #[test]
    fn test_load_from_toml() {
        let registry = Registry::from_toml_str(SAMPLE).unwrap();
        assert_eq!(registry.len(), 2);

        let def = registry.get("attendance_rate").unwrap();
        assert_eq!(def.aggregation, Aggregation::Percentage);
        assert_eq!(def.thresholds.len(), 3);
        assert_eq!(def.primary_source(), "attendance");
    }

    #[test]
    fn test_declaration_order_preserved() {
        let registry = Registry::from_toml_str(SAMPLE).unwrap();
        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, vec!["attendance_rate", "headcount"]);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let registry = Registry::from_toml_str(SAMPLE).unwrap();
        assert!(matches!(
            registry.get("resignation_rate"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_unknown_aggregation_is_a_config_error() {
        let toml = r#"
            [[metric]]
            id = "broken"
            required_sources = ["roster"]
            aggregation = "median"
            higher_is_better = true
        "#;
        assert!(matches!(
            Registry::from_toml_str(toml),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_missing_polarity_is_a_config_error() {
        let toml = r#"
            [[metric]]
            id = "no_polarity"
            required_sources = ["roster"]
            aggregation = "count"
        "#;
        assert!(matches!(
            Registry::from_toml_str(toml),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let toml = r#"
            [[metric]]
            id = "headcount"
            required_sources = ["roster"]
            aggregation = "count"
            higher_is_better = true

            [[metric]]
            id = "headcount"
            required_sources = ["roster"]
            aggregation = "count"
            higher_is_better = true
        "#;
        assert!(matches!(
            Registry::from_toml_str(toml),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_trend_eligible_listing() {
        let registry = Registry::from_toml_str(SAMPLE).unwrap();
        let eligible: Vec<&str> = registry
            .trend_eligible()
            .map(|def| def.id.as_str())
            .collect();
        assert_eq!(eligible, vec!["attendance_rate"]);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let registry = Registry::from_path(file.path()).unwrap();
        assert_eq!(registry.len(), 2);
    }
}
