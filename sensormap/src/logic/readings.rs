use crate::logic::types::SensorReading;
use anyhow::Context;
use std::path::Path;

/// Load a JSON array of readings.
pub fn load_readings(path: &Path) -> anyhow::Result<Vec<SensorReading>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read readings file {}", path.display()))?;
    parse_readings(&contents).with_context(|| format!("invalid readings file {}", path.display()))
}

pub fn parse_readings(contents: &str) -> anyhow::Result<Vec<SensorReading>> {
    Ok(serde_json::from_str(contents)?)
}
