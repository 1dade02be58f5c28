use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// A sensor reading as stored in the readings file and served to the UI.
/// Fields of the wrong JSON type read as absent (`""` for the tag) instead of
/// failing the whole file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_tag")]
    pub sensor_type: String,
    #[serde(default, deserialize_with = "lenient")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub co2: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub pm2_5: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub pm10: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(IgnoredAny),
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Value(value) => Ok(Some(value)),
        Lenient::Other(_) => Ok(None),
    }
}

fn lenient_tag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::<D, String>(deserializer)?.unwrap_or_default())
}

/// Where a reading ends up for a given type filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Mapped,
    FilteredOut,        // Sensor type differs from the filter
    MissingCoordinates, // Latitude or longitude absent
}

impl SensorReading {
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    /// Same rule the map widget applies: type filter first, then coordinates.
    pub fn placement(&self, sensor_type: Option<&str>) -> Placement {
        match sensor_type {
            Some(tag) if !tag.is_empty() && self.sensor_type != tag => Placement::FilteredOut,
            _ if self.position().is_none() => Placement::MissingCoordinates,
            _ => Placement::Mapped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_field_types_read_as_absent() {
        let readings: Vec<SensorReading> = serde_json::from_str(
            r#"[
                {"id": "a1", "sensor_type": null, "latitude": 50.75, "longitude": 25.33},
                {"id": -3, "sensor_type": "MQ-135", "latitude": "north", "longitude": 25.3, "co2": 450}
            ]"#,
        )
        .unwrap();

        assert_eq!(readings[0].id, None);
        assert_eq!(readings[0].sensor_type, "");
        assert_eq!(readings[0].placement(None), Placement::Mapped);
        assert_eq!(readings[0].placement(Some("DHT22")), Placement::FilteredOut);

        assert_eq!(readings[1].id, None);
        assert_eq!(readings[1].co2, Some(450.0));
        assert_eq!(readings[1].placement(Some("MQ-135")), Placement::MissingCoordinates);
    }
}
