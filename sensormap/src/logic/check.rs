use crate::cli::OutputFormat;
use crate::logic::config::HostConfig;
use crate::logic::readings::load_readings;
use crate::logic::types::{Placement, SensorReading};
use colored::*;
use std::collections::BTreeMap;

/// Per-type totals for a check run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TypeCount {
    pub total: usize,
    pub mapped: usize,
}

#[derive(Debug)]
pub struct CheckReport<'a> {
    pub rows: Vec<(&'a SensorReading, Placement)>,
    pub by_type: BTreeMap<String, TypeCount>,
}

impl<'a> CheckReport<'a> {
    pub fn build(readings: &'a [SensorReading], sensor_type: Option<&str>) -> Self {
        let mut by_type: BTreeMap<String, TypeCount> = BTreeMap::new();
        let rows: Vec<(&SensorReading, Placement)> = readings
            .iter()
            .map(|reading| {
                let placement = reading.placement(sensor_type);
                let count = by_type.entry(reading.sensor_type.clone()).or_default();
                count.total += 1;
                if placement == Placement::Mapped {
                    count.mapped += 1;
                }
                (reading, placement)
            })
            .collect();

        Self { rows, by_type }
    }

    pub fn mapped(&self) -> Vec<&'a SensorReading> {
        self.rows
            .iter()
            .filter(|(_, placement)| *placement == Placement::Mapped)
            .map(|(reading, _)| *reading)
            .collect()
    }
}

pub fn run(config: &HostConfig, sensor_type: Option<String>, format: OutputFormat) -> anyhow::Result<()> {
    let path = config.readings_file();
    let readings = load_readings(&path)?;
    let report = CheckReport::build(&readings, sensor_type.as_deref());

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report.mapped())?);
        }
        OutputFormat::Table => {
            println!("{} {}", "Readings:".bright_blue().bold(), path.display().to_string().bright_white());
            if let Some(tag) = &sensor_type {
                println!("{} {}", "Type filter:".bright_blue().bold(), tag.bright_white());
            }
            println!();
            display_rows(&report);
            println!();
            display_totals(&report);
        }
    }

    Ok(())
}

fn placement_indicator(placement: Placement) -> String {
    match placement {
        Placement::Mapped => "✓ mapped".green().to_string(),
        Placement::FilteredOut => "- filtered out".bright_black().to_string(),
        Placement::MissingCoordinates => "✗ no coordinates".red().to_string(),
    }
}

fn display_rows(report: &CheckReport<'_>) {
    println!(
        "{:<6} {:<12} {:<11} {:<11} {}",
        "ID".bright_white().bold(),
        "TYPE".bright_white().bold(),
        "LATITUDE".bright_white().bold(),
        "LONGITUDE".bright_white().bold(),
        "STATUS".bright_white().bold()
    );
    println!("{}", "─".repeat(60).bright_blue());

    for (reading, placement) in &report.rows {
        let id = reading.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
        let coord = |value: Option<f64>| value.map(|v| format!("{:.5}", v)).unwrap_or_else(|| "-".to_string());
        let sensor_type = if reading.sensor_type.chars().count() > 12 {
            format!("{}...", reading.sensor_type.chars().take(9).collect::<String>())
        } else {
            reading.sensor_type.clone()
        };

        println!(
            "{:<6} {:<12} {:<11} {:<11} {}",
            id,
            sensor_type,
            coord(reading.latitude),
            coord(reading.longitude),
            placement_indicator(*placement)
        );
    }
}

fn display_totals(report: &CheckReport<'_>) {
    println!("{}", "Per type:".bright_green().bold());
    for (sensor_type, count) in &report.by_type {
        let label = if sensor_type.is_empty() { "(none)" } else { sensor_type.as_str() };
        println!(
            "  {:<12} {} of {} on the map",
            label.cyan(),
            count.mapped.to_string().bright_white(),
            count.total
        );
    }
    println!(
        "{} {} of {} readings",
        "Total:".bright_green().bold(),
        report.mapped().len().to_string().bright_white(),
        report.rows.len()
    );
}
