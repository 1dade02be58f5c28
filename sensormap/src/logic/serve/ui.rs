use mime_guess;
use rust_embed::RustEmbed;
use warp::{http::Response, Filter, Rejection};

#[derive(RustEmbed)]
#[folder = "../sensormap-ui/static"]
struct Asset;

fn asset_response(path: &str) -> Result<Response<Vec<u8>>, warp::http::Error> {
    match Asset::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            Response::builder()
                .header("content-type", mime.as_ref())
                .body(content.data.into_owned())
        }
        None => Response::builder().status(404).body(b"Not Found".to_vec()),
    }
}

/// Serves `/static/<path>`, the marker icons under `/icons/<file>`, and falls
/// back to `index.html` for any other GET outside `/api`.
pub fn ui_routes() -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    // 1) static files (wasm bundle, styles)
    let static_files = warp::get()
        .and(warp::path("static"))
        .and(warp::path::tail())
        .map(|tail: warp::path::Tail| asset_response(tail.as_str()));

    // 2) marker icons, referenced by the map at fixed absolute paths
    let icons = warp::get()
        .and(warp::path("icons"))
        .and(warp::path::tail())
        .map(|tail: warp::path::Tail| asset_response(&format!("icons/{}", tail.as_str())));

    // 3) SPA fallback
    let spa = warp::get()
        .and(warp::path::full())
        .and_then(|path: warp::path::FullPath| async move {
            if path.as_str().starts_with("/api") {
                Err(warp::reject::not_found())
            } else {
                Ok(())
            }
        })
        .map(|_| match Asset::get("index.html") {
            Some(file) => Response::builder()
                .header("content-type", "text/html; charset=utf-8")
                .body(file.data.into_owned()),
            None => Response::builder().status(404).body(b"index.html missing".to_vec()),
        });

    static_files.or(icons).or(spa)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_icons_are_embedded() {
        let routes = ui_routes();
        for icon in ["DHT22.png", "MQ-135.png", "PMS5003.png", "default_icon.png"] {
            let res = warp::test::request()
                .method("GET")
                .path(&format!("/icons/{}", icon))
                .reply(&routes)
                .await;
            assert_eq!(res.status(), 200, "{}", icon);
            assert_eq!(res.headers()["content-type"], "image/png");
        }
    }

    #[tokio::test]
    async fn test_unknown_static_file_is_404() {
        let res = warp::test::request()
            .method("GET")
            .path("/static/nope.js")
            .reply(&ui_routes())
            .await;
        assert_eq!(res.status(), 404);
    }

    #[tokio::test]
    async fn test_spa_fallback_serves_index() {
        let res = warp::test::request().method("GET").path("/anything").reply(&ui_routes()).await;
        assert_eq!(res.status(), 200);
        assert!(String::from_utf8_lossy(res.body()).contains("sensormap_ui.js"));
    }

    #[tokio::test]
    async fn test_spa_fallback_skips_api() {
        let res = warp::test::request().method("GET").path("/api/unknown").reply(&ui_routes()).await;
        assert_eq!(res.status(), 404);
    }
}
