use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Tunable knobs shared by the calculation engine and the trend analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_display_precision")]
    pub display_precision: u32,
    #[serde(default = "default_stability_tolerance_pct")]
    pub stability_tolerance_pct: f64,
    #[serde(default = "default_zero_baseline_epsilon")]
    pub zero_baseline_epsilon: f64,
}

fn default_display_precision() -> u32 { 1 }
fn default_stability_tolerance_pct() -> f64 { 2.0 }
fn default_zero_baseline_epsilon() -> f64 { 0.01 }

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            display_precision: default_display_precision(),
            stability_tolerance_pct: default_stability_tolerance_pct(),
            zero_baseline_epsilon: default_zero_baseline_epsilon(),
        }
    }
}

impl EngineSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse settings: {}", e)))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Round a raw value to the configured display precision.
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10_f64.powi(self.display_precision as i32);
        (value * factor).round() / factor
    }
}
