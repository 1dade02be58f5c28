//! Stand-in for live telemetry: every tick overwrites the measurements a
//! sensor type reports with fresh uniform samples.

use crate::model::{SensorKind, SensorReading};
use rand::Rng;

pub const TEMPERATURE_RANGE: (f64, f64) = (20.0, 35.0);
pub const HUMIDITY_RANGE: (f64, f64) = (30.0, 70.0);
pub const CO2_RANGE: (f64, f64) = (400.0, 700.0);
pub const PM2_5_RANGE: (f64, f64) = (10.0, 100.0);
pub const PM10_RANGE: (f64, f64) = (20.0, 150.0);

/// Round to two decimals, the precision simulated values are reported with.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn sample<R: Rng + ?Sized>(rng: &mut R, (min, max): (f64, f64)) -> f64 {
    round2(rng.gen_range(min..=max))
}

/// Simulated copy of one reading. Only the fields belonging to the
/// reading's type change; unknown types come back untouched.
pub fn simulate_reading<R: Rng + ?Sized>(reading: &SensorReading, rng: &mut R) -> SensorReading {
    let mut next = reading.clone();
    match reading.kind() {
        SensorKind::Dht22 => {
            next.temperature = Some(sample(rng, TEMPERATURE_RANGE));
            next.humidity = Some(sample(rng, HUMIDITY_RANGE));
        }
        SensorKind::Mq135 => {
            next.co2 = Some(sample(rng, CO2_RANGE));
        }
        SensorKind::Pms5003 => {
            next.pm2_5 = Some(sample(rng, PM2_5_RANGE));
            next.pm10 = Some(sample(rng, PM10_RANGE));
        }
        SensorKind::Other => {}
    }
    next
}

/// One simulation tick over the whole working copy.
pub fn simulate_tick<R: Rng + ?Sized>(readings: &[SensorReading], rng: &mut R) -> Vec<SensorReading> {
    readings
        .iter()
        .map(|reading| simulate_reading(reading, rng))
        .collect()
}
