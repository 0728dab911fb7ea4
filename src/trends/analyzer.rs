use super::series::{PeriodFrame, PeriodWindow};
use super::types::{TrendDirection, TrendPoint, TrendResult, TrendStats};
use crate::config::EngineSettings;
use crate::dataset::SubjectFilter;
use crate::engine::CalculationEngine;
use crate::error::Result;
use crate::registry::Registry;

/// Tracks how one metric evolves for one subject across reporting periods.
/// Runs the calculation engine once per period with identical parameters;
/// no per-subject or per-metric branch exists here.
pub struct TrendAnalyzer<'r> {
    engine: CalculationEngine<'r>,
}

impl<'r> TrendAnalyzer<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            engine: CalculationEngine::new(registry),
        }
    }

    pub fn with_settings(registry: &'r Registry, settings: EngineSettings) -> Self {
        Self {
            engine: CalculationEngine::with_settings(registry, settings),
        }
    }

    /// Build the time series for `metric_id`, preserving period order.
    /// Periods without data stay in the series as zero-valued gap points;
    /// only data-bearing points feed the stats and the direction call.
    pub fn analyze(
        &self,
        metric_id: &str,
        subject: &str,
        periods: &[PeriodFrame],
        filter: &SubjectFilter,
    ) -> Result<TrendResult> {
        let definition = self.engine.registry().get(metric_id)?;

        let mut points = Vec::with_capacity(periods.len());
        for frame in periods {
            let value = self
                .engine
                .calculate(metric_id, frame.sources(), subject, filter)?;
            points.push(TrendPoint {
                period: frame.label().to_string(),
                value: value.raw_value,
                has_data: value.has_data,
            });
        }

        let stats = summarize(&points);
        let direction = direction_of(
            &stats,
            points.iter().filter(|point| point.has_data).count(),
            definition.higher_is_better,
            self.engine.settings(),
        );

        Ok(TrendResult {
            metric_id: metric_id.to_string(),
            subject: subject.to_string(),
            points,
            direction,
            stats,
        })
    }

    pub fn analyze_window(
        &self,
        metric_id: &str,
        subject: &str,
        window: &PeriodWindow,
        filter: &SubjectFilter,
    ) -> Result<TrendResult> {
        self.analyze(metric_id, subject, window.frames(), filter)
    }
}

fn summarize(points: &[TrendPoint]) -> TrendStats {
    let data: Vec<f64> = points
        .iter()
        .filter(|point| point.has_data)
        .map(|point| point.value)
        .collect();

    if data.is_empty() {
        return TrendStats::default();
    }

    let mut min = data[0];
    let mut max = data[0];
    let mut sum = 0.0;
    for &value in &data {
        min = min.min(value);
        max = max.max(value);
        sum += value;
    }

    let first_value = data[0];
    let last_value = data[data.len() - 1];
    let percent_change = if first_value == 0.0 {
        0.0
    } else {
        (last_value - first_value) / first_value * 100.0
    };

    TrendStats {
        min,
        max,
        mean: sum / data.len() as f64,
        first_value,
        last_value,
        percent_change,
    }
}

fn direction_of(
    stats: &TrendStats,
    data_points: usize,
    higher_is_better: bool,
    settings: &EngineSettings,
) -> TrendDirection {
    if data_points < 2 {
        return TrendDirection::InsufficientData;
    }

    // Tolerance is relative to the first value; a zero baseline falls back
    // to an absolute epsilon because a percentage of zero is no band at all.
    let band = if stats.first_value == 0.0 {
        settings.zero_baseline_epsilon
    } else {
        stats.first_value.abs() * settings.stability_tolerance_pct / 100.0
    };

    let delta = stats.last_value - stats.first_value;
    if delta.abs() <= band {
        return TrendDirection::Stable;
    }

    if (delta > 0.0) == higher_is_better {
        TrendDirection::Improving
    } else {
        TrendDirection::Worsening
    }
}
