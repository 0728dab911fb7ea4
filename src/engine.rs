use serde::Serialize;

use crate::classify::{classify, NEUTRAL_COLOR, UNKNOWN_LABEL};
use crate::config::EngineSettings;
use crate::dataset::{Dataset, Record, SourceMap, SubjectFilter};
use crate::error::Result;
use crate::registry::{Aggregation, MetricDefinition, Registry};

/// One classified metric reading for one subject. Produced fresh on every
/// `calculate` call; `has_data: false` is the only representation of
/// "nothing to compute from", distinct from a genuine zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    pub metric_id: String,
    pub subject: String,
    pub raw_value: f64,
    pub rounded_value: f64,
    pub threshold_label: String,
    pub color: String,
    pub has_data: bool,
}

impl MetricValue {
    fn no_data(metric_id: &str, subject: &str) -> Self {
        Self {
            metric_id: metric_id.to_string(),
            subject: subject.to_string(),
            raw_value: 0.0,
            rounded_value: 0.0,
            threshold_label: UNKNOWN_LABEL.to_string(),
            color: NEUTRAL_COLOR.to_string(),
            has_data: false,
        }
    }
}

/// Evaluates metric definitions against in-memory datasets. Stateless
/// beyond its settings: the same inputs always produce the same value, so
/// calls are safe to fan out across threads without coordination.
pub struct CalculationEngine<'r> {
    registry: &'r Registry,
    settings: EngineSettings,
}

impl<'r> CalculationEngine<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            settings: EngineSettings::default(),
        }
    }

    pub fn with_settings(registry: &'r Registry, settings: EngineSettings) -> Self {
        Self { registry, settings }
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Compute one classified metric value. The only error path is an
    /// unknown metric id; every data-absence case comes back as a normal
    /// value with `has_data: false`, never as a fabricated number.
    pub fn calculate(
        &self,
        metric_id: &str,
        sources: &SourceMap,
        subject: &str,
        filter: &SubjectFilter,
    ) -> Result<MetricValue> {
        let definition = self.registry.get(metric_id)?;

        let mut primary: Option<&Dataset> = None;
        for source in &definition.required_sources {
            match sources.get(source.as_str()) {
                Some(dataset) if !dataset.is_empty() => {
                    if primary.is_none() {
                        primary = Some(dataset);
                    }
                }
                _ => {
                    log::debug!(
                        "Metric '{}': source '{}' absent or empty, reporting no data",
                        metric_id,
                        source
                    );
                    return Ok(MetricValue::no_data(metric_id, subject));
                }
            }
        }

        let primary = match primary {
            Some(dataset) => dataset,
            None => return Ok(MetricValue::no_data(metric_id, subject)),
        };

        let rows: Vec<&Record> = primary
            .rows()
            .iter()
            .filter(|record| filter.matches(record))
            .collect();

        let raw_value = aggregate(definition, &rows);
        let (label, color) = classify(raw_value, &definition.thresholds);

        Ok(MetricValue {
            metric_id: metric_id.to_string(),
            subject: subject.to_string(),
            raw_value,
            // Classification above used the unrounded value; rounding is
            // display-only and must not flip a band at its boundary.
            rounded_value: self.settings.round(raw_value),
            threshold_label: label.to_string(),
            color: color.to_string(),
            has_data: true,
        })
    }
}

fn aggregate(definition: &MetricDefinition, rows: &[&Record]) -> f64 {
    match definition.aggregation {
        Aggregation::Sum => sum_field(rows, definition.value_field.as_deref()),
        Aggregation::Average => {
            if rows.is_empty() {
                return 0.0;
            }
            sum_field(rows, definition.value_field.as_deref()) / rows.len() as f64
        }
        Aggregation::Count => rows.len() as f64,
        Aggregation::Percentage => {
            ratio_of(
                rows,
                definition.numerator_field.as_deref(),
                definition.denominator_field.as_deref(),
            ) * 100.0
        }
        Aggregation::Ratio => ratio_of(
            rows,
            definition.numerator_field.as_deref(),
            definition.denominator_field.as_deref(),
        ),
    }
}

fn sum_field(rows: &[&Record], field: Option<&str>) -> f64 {
    let field = match field {
        Some(field) => field,
        None => return 0.0,
    };
    rows.iter()
        .map(|record| record.number(field).unwrap_or(0.0))
        .sum()
}

fn ratio_of(rows: &[&Record], numerator: Option<&str>, denominator: Option<&str>) -> f64 {
    let total = sum_field(rows, denominator);
    if total == 0.0 {
        return 0.0;
    }
    sum_field(rows, numerator) / total
}
