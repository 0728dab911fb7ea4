pub mod classify;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod export;
pub mod registry;
pub mod trends;

pub use config::EngineSettings;
pub use dataset::{Dataset, DatasetProvider, Record, Scalar, SourceMap, StaticProvider, SubjectFilter};
pub use engine::{CalculationEngine, MetricValue};
pub use error::{Error, Result};
pub use registry::{Aggregation, MetricDefinition, Registry, ThresholdBand};
pub use trends::{PeriodFrame, PeriodWindow, TrendAnalyzer, TrendDirection, TrendPoint, TrendResult, TrendStats};
