use crate::engine::MetricValue;
use crate::error::{Error, Result};
use crate::trends::TrendResult;
use std::fs::File;
use std::io::Write;

pub fn metrics_to_json(values: &[MetricValue], path: &str) -> Result<()> {
    let json_str = serde_json::to_string_pretty(values)
        .map_err(|e| Error::Unknown(format!("Failed to serialize JSON: {}", e)))?;

    let mut file = File::create(path)?;
    file.write_all(json_str.as_bytes())?;

    Ok(())
}

pub fn trend_to_json(trend: &TrendResult, path: &str) -> Result<()> {
    let json_str = serde_json::to_string_pretty(trend)
        .map_err(|e| Error::Unknown(format!("Failed to serialize JSON: {}", e)))?;

    let mut file = File::create(path)?;
    file.write_all(json_str.as_bytes())?;

    Ok(())
}

pub fn trend_to_csv(trend: &TrendResult, path: &str) -> Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "period,value,has_data")?;
    for point in &trend.points {
        writeln!(file, "{},{:.2},{}", point.period, point.value, point.has_data)?;
    }

    Ok(())
}
