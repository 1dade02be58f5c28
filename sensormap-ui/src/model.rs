use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::rc::Rc;

/// One sensor's snapshot: type tag, optional location and whatever
/// measurements that type reports.
///
/// Decoding never rejects a reading over a single field: a value of the
/// wrong type reads as absent, and a missing or non-string tag as `""`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
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
    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Value(value) => Some(value),
        Lenient::Other(_) => None,
    })
}

fn lenient_tag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::<D, String>(deserializer)?.unwrap_or_default())
}

/// Sensor families the dashboard knows how to draw and simulate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorKind {
    /// DHT22 temperature / humidity
    Dht22,
    /// MQ-135 gas (CO2)
    Mq135,
    /// PMS5003 particulate matter
    Pms5003,
    Other,
}

impl SensorKind {
    pub const KNOWN: [SensorKind; 3] = [SensorKind::Dht22, SensorKind::Mq135, SensorKind::Pms5003];

    /// Exact, case-sensitive match on the tag carried by a reading.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "DHT22" => SensorKind::Dht22,
            "MQ-135" => SensorKind::Mq135,
            "PMS5003" => SensorKind::Pms5003,
            _ => SensorKind::Other,
        }
    }

    pub fn tag(&self) -> Option<&'static str> {
        match self {
            SensorKind::Dht22 => Some("DHT22"),
            SensorKind::Mq135 => Some("MQ-135"),
            SensorKind::Pms5003 => Some("PMS5003"),
            SensorKind::Other => None,
        }
    }
}

impl SensorReading {
    pub fn kind(&self) -> SensorKind {
        SensorKind::from_tag(&self.sensor_type)
    }

    /// Both coordinates, or nothing. Half a position never goes on the map.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    /// `None` (or an empty string) lets every reading through.
    pub fn matches_type(&self, selected_type: Option<&str>) -> bool {
        match selected_type {
            None | Some("") => true,
            Some(tag) => self.sensor_type == tag,
        }
    }
}

/// The reading list handed down by the page that owns the data.
///
/// Equality is pointer identity: two feeds are the same only if they share
/// one allocation. The map widget resets its working copy whenever it
/// receives a feed that is not the same as the previous one, even if the
/// contents happen to match.
#[derive(Clone, Debug, Default)]
pub struct SensorFeed(Rc<Vec<SensorReading>>);

impl SensorFeed {
    pub fn new(readings: Vec<SensorReading>) -> Self {
        Self(Rc::new(readings))
    }

    pub fn readings(&self) -> &[SensorReading] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for SensorFeed {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Options for the type selector: every known tag, followed by any
/// unrecognized tags in the order they first appear in `readings`, and
/// finally the `selected` tag if the readings no longer carry it, so a
/// restored filter always has an option to show and clear.
pub fn sensor_type_options(readings: &[SensorReading], selected: Option<&str>) -> Vec<String> {
    let mut options: Vec<String> = SensorKind::KNOWN
        .iter()
        .filter_map(|kind| kind.tag())
        .map(str::to_string)
        .collect();

    for reading in readings {
        if reading.sensor_type.is_empty() {
            continue;
        }
        if !options.iter().any(|tag| tag == &reading.sensor_type) {
            options.push(reading.sensor_type.clone());
        }
    }

    if let Some(tag) = selected.filter(|tag| !tag.is_empty()) {
        if !options.iter().any(|option| option == tag) {
            options.push(tag.to_string());
        }
    }

    options
}

#[cfg(test)]
pub(crate) fn reading(sensor_type: &str, lat: Option<f64>, lng: Option<f64>) -> SensorReading {
    SensorReading {
        id: None,
        sensor_type: sensor_type.to_string(),
        latitude: lat,
        longitude: lng,
        temperature: None,
        humidity: None,
        co2: None,
        pm2_5: None,
        pm10: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_absent_and_null_fields() {
        let parsed: SensorReading = serde_json::from_value(json!({
            "id": 7,
            "sensor_type": "MQ-135",
            "latitude": 50.75,
            "longitude": null,
            "co2": 512.4
        }))
        .unwrap();

        assert_eq!(parsed.id, Some(7));
        assert_eq!(parsed.kind(), SensorKind::Mq135);
        assert_eq!(parsed.longitude, None);
        assert_eq!(parsed.co2, Some(512.4));
        assert_eq!(parsed.temperature, None);
        assert_eq!(parsed.position(), None);
    }

    #[test]
    fn test_kind_from_tag_is_exact() {
        assert_eq!(SensorKind::from_tag("DHT22"), SensorKind::Dht22);
        assert_eq!(SensorKind::from_tag("PMS5003"), SensorKind::Pms5003);
        assert_eq!(SensorKind::from_tag("dht22"), SensorKind::Other);
        assert_eq!(SensorKind::from_tag("BME280"), SensorKind::Other);
        assert_eq!(SensorKind::from_tag(""), SensorKind::Other);
    }

    #[test]
    fn test_matches_type() {
        let r = reading("DHT22", None, None);
        assert!(r.matches_type(None));
        assert!(r.matches_type(Some("")));
        assert!(r.matches_type(Some("DHT22")));
        assert!(!r.matches_type(Some("MQ-135")));
    }

    #[test]
    fn test_feed_equality_is_identity() {
        let readings = vec![reading("DHT22", Some(1.0), Some(2.0))];
        let a = SensorFeed::new(readings.clone());
        let b = SensorFeed::new(readings);

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.readings(), b.readings());
    }

    #[test]
    fn test_sensor_type_options() {
        let readings = vec![
            reading("BME280", None, None),
            reading("DHT22", None, None),
            reading("SCD30", None, None),
            reading("BME280", None, None),
            reading("", None, None),
        ];

        assert_eq!(
            sensor_type_options(&readings, None),
            vec!["DHT22", "MQ-135", "PMS5003", "BME280", "SCD30"]
        );
        assert_eq!(
            sensor_type_options(&readings, Some("SCD30")),
            vec!["DHT22", "MQ-135", "PMS5003", "BME280", "SCD30"]
        );
    }

    #[test]
    fn test_options_keep_selected_tag() {
        let readings = vec![reading("DHT22", None, None)];

        // A filter restored from an earlier dataset stays selectable
        assert_eq!(
            sensor_type_options(&readings, Some("BME280")),
            vec!["DHT22", "MQ-135", "PMS5003", "BME280"]
        );
        assert_eq!(
            sensor_type_options(&[], Some("")),
            vec!["DHT22", "MQ-135", "PMS5003"]
        );
    }

    #[test]
    fn test_malformed_fields_do_not_drop_the_list() {
        let parsed: Vec<SensorReading> = serde_json::from_value(json!([
            {"id": 1, "sensor_type": "DHT22", "latitude": 50.74, "longitude": 25.32, "temperature": 22},
            {"id": "a1", "sensor_type": null, "latitude": 50.75, "longitude": 25.33, "co2": "high"},
            {"sensor_type": 42, "humidity": 40.5}
        ]))
        .unwrap();

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].id, Some(1));
        assert_eq!(parsed[0].temperature, Some(22.0));

        assert_eq!(parsed[1].id, None);
        assert_eq!(parsed[1].sensor_type, "");
        assert_eq!(parsed[1].kind(), SensorKind::Other);
        assert_eq!(parsed[1].position(), Some((50.75, 25.33)));
        assert_eq!(parsed[1].co2, None);

        assert_eq!(parsed[2].sensor_type, "");
        assert_eq!(parsed[2].humidity, Some(40.5));
        assert_eq!(parsed[2].position(), None);
    }
}
