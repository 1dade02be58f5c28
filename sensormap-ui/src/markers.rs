use crate::config::DEFAULT_ICON_URL;
use crate::format::popup_html;
use crate::model::{SensorKind, SensorReading};

/// Icon asset for a sensor type. Unrecognized types share the default icon.
pub fn icon_url(kind: SensorKind) -> &'static str {
    match kind {
        SensorKind::Dht22 => "/icons/DHT22.png",
        SensorKind::Pms5003 => "/icons/PMS5003.png",
        SensorKind::Mq135 => "/icons/MQ-135.png",
        SensorKind::Other => DEFAULT_ICON_URL,
    }
}

/// Everything needed to place one marker.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerPlan<'a> {
    /// Position of the reading in the working copy; keeps a marker attached
    /// to the same reading across simulation ticks.
    pub index: usize,
    pub reading: &'a SensorReading,
    pub position: (f64, f64),
    pub icon_url: &'static str,
    pub popup: String,
}

/// Markers for `readings` under `selected_type`: readings of another type and
/// readings without both coordinates are skipped.
pub fn plan_markers<'a>(readings: &'a [SensorReading], selected_type: Option<&str>) -> Vec<MarkerPlan<'a>> {
    readings
        .iter()
        .enumerate()
        .filter(|(_, reading)| reading.matches_type(selected_type))
        .filter_map(|(index, reading)| {
            let position = reading.position()?;
            Some(MarkerPlan {
                index,
                reading,
                position,
                icon_url: icon_url(reading.kind()),
                popup: popup_html(reading),
            })
        })
        .collect()
}
