pub mod dashboard;
pub mod reading_details;
pub mod sensor_map;

pub use dashboard::Dashboard;
pub use reading_details::ReadingDetails;
pub use sensor_map::SensorMap;
