use crate::model::SensorReading;

/// A labelled line in a popup or in the details panel.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub icon: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Measurements are shown with at most two decimals and no trailing zeros,
/// so `22.0` reads as `22` and `22.50` as `22.5`.
pub fn format_measurement(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn format_coordinate(value: f64) -> String {
    format!("{:.5}", value)
}

/// Sensor type, coordinates and every measurement the reading carries.
/// Absent measurements are left out rather than shown as zero.
pub fn reading_fields(reading: &SensorReading) -> Vec<Field> {
    let mut fields = vec![Field {
        icon: "📍",
        label: "Sensor",
        value: reading.sensor_type.clone(),
    }];

    if let Some(lat) = reading.latitude {
        fields.push(Field {
            icon: "🌍",
            label: "Latitude",
            value: format_coordinate(lat),
        });
    }
    if let Some(lng) = reading.longitude {
        fields.push(Field {
            icon: "🌏",
            label: "Longitude",
            value: format_coordinate(lng),
        });
    }

    let measurements = [
        ("🌡", "Temperature", reading.temperature, "°C"),
        ("💧", "Humidity", reading.humidity, "%"),
        ("🌫", "CO2", reading.co2, "ppm"),
        ("🛑", "PM2.5", reading.pm2_5, "µg/m³"),
        ("🚧", "PM10", reading.pm10, "µg/m³"),
    ];
    for (icon, label, value, unit) in measurements {
        if let Some(value) = value {
            fields.push(Field {
                icon,
                label,
                value: format!("{} {}", format_measurement(value), unit),
            });
        }
    }

    fields
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Leaflet popup markup for one reading.
pub fn popup_html(reading: &SensorReading) -> String {
    let lines: String = reading_fields(reading)
        .iter()
        .map(|field| {
            format!(
                "<strong>{} {}:</strong> {}<br />",
                field.icon,
                field.label,
                escape_html(&field.value)
            )
        })
        .collect();
    format!(r#"<div class="sensor-popup">{}</div>"#, lines)
}
