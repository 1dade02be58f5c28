//! Fixed settings for the map widget and the dashboard around it.

/// Default map view (Lutsk city centre).
pub const MAP_CENTER: (f64, f64) = (50.7474, 25.3257);
pub const MAP_ZOOM: u8 = 13;

pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;

/// Marker icon geometry, in pixels.
pub const ICON_SIZE: (u32, u32) = (55, 49);
pub const ICON_ANCHOR: (u32, u32) = (16, 32);
pub const POPUP_ANCHOR: (i32, i32) = (0, -32);
pub const DEFAULT_ICON_URL: &str = "/icons/default_icon.png";

/// How often the widget replaces its readings with simulated values.
pub const SIMULATION_PERIOD_MS: u32 = 60_000;

pub const SENSORS_ENDPOINT: &str = "/api/sensors";

/// LocalStorage key for the last chosen sensor type.
pub const TYPE_FILTER_KEY: &str = "sensormap_type_filter";
