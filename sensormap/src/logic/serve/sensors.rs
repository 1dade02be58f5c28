use crate::logic::readings::load_readings;
use std::path::PathBuf;
use std::sync::Arc;
use warp::{
    http::StatusCode,
    reply::{json as warp_json, with_status},
    Filter, Rejection,
};

/// `GET /api/sensors`: the readings file, re-read on every request so edits
/// show up on the dashboard's next reload.
pub fn sensors(
    readings_file: Arc<PathBuf>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    warp::get()
        .and(warp::path!("api" / "sensors"))
        .map(move || match load_readings(&readings_file) {
            Ok(readings) => with_status(warp_json(&readings), StatusCode::OK),
            Err(e) => {
                eprintln!("✗ {:#}", e);
                with_status(
                    warp_json(&serde_json::json!({ "error": format!("{:#}", e) })),
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_serves_readings_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "sensor_type": "DHT22", "latitude": 50.74, "longitude": 25.32, "temperature": 22, "humidity": 40}}]"#
        )
        .unwrap();
        let filter = sensors(Arc::new(file.path().to_path_buf()));

        let res = warp::test::request().method("GET").path("/api/sensors").reply(&filter).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body[0]["sensor_type"], "DHT22");
        assert_eq!(body[0]["temperature"], 22.0);
        assert!(body[0]["co2"].is_null());
    }

    #[tokio::test]
    async fn test_broken_file_is_a_server_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let filter = sensors(Arc::new(file.path().to_path_buf()));

        let res = warp::test::request().method("GET").path("/api/sensors").reply(&filter).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert!(body["error"].as_str().unwrap().contains("invalid readings file"));
    }

    #[tokio::test]
    async fn test_other_paths_are_rejected() {
        let filter = sensors(Arc::new(PathBuf::from("/nonexistent.json")));
        assert!(!warp::test::request().method("GET").path("/api/devices").matches(&filter).await);
        assert!(!warp::test::request().method("POST").path("/api/sensors").matches(&filter).await);
    }
}
