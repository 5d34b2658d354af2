//! Dashboard HTTP Server
//!
//! HTTP layer of the Bone Age App, built with Axum.
//!
//! # Endpoints
//!
//! ## Pages
//! - `GET /` and `GET /page-1` - Project information
//! - `GET /page-2` - Dataset analysis
//! - `GET /page-3` - Prediction
//! - any other path - 404 page
//!
//! ## API
//! - `POST /api/upload` - Predict bone age for uploaded X-rays
//! - `GET /api/charts` - Chart descriptors of the analysis page
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{WebError, WebResult};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/upload", post(routes::upload::upload_images))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .route("/charts", get(routes::charts::get_charts));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .fallback(routes::pages::render_page)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Start the server and run until a shutdown signal arrives
pub async fn serve(state: AppState) -> Result<(), WebError> {
    let addr = state.config.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Bone Age App listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| WebError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Bone Age App shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{Analytics, DatasetRow};
    use crate::config::ServerConfig;
    use crate::predict::tests::{fixed_pair, png_data_url};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_test_app_with(ServerConfig::default())
    }

    fn create_test_app_with(config: ServerConfig) -> Router {
        let analytics = Analytics::from_rows(&[
            DatasetRow::new(36, true),
            DatasetRow::new(36, false),
            DatasetRow::new(48, true),
        ]);
        let state = AppState::new(analytics, fixed_pair(), 16, config);
        build_router(state)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_recognized_pages() {
        for (path, marker) in [
            ("/", "Acerca del proyecto"),
            ("/page-1", "Acerca del proyecto"),
            ("/page-2", "boneage-graph"),
            ("/page-3", "output-image-upload"),
        ] {
            let response = create_test_app().oneshot(get_request(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "path {path}");
            assert!(body_text(response).await.contains(marker), "path {path}");
        }
    }

    #[tokio::test]
    async fn test_unknown_page_is_404() {
        let response = create_test_app().oneshot(get_request("/page-5")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_text(response).await;
        assert!(body.contains("404: Not found"));
        assert!(body.contains("/page-5"));
    }

    #[tokio::test]
    async fn test_upload_two_files() {
        let body = serde_json::json!({
            "files": [
                {"contents": png_data_url(4, 4), "filename": "a.png", "last_modified": 1600000000.0},
                {"contents": png_data_url(6, 6), "filename": "b.png"},
            ]
        });

        let response = create_test_app()
            .oneshot(post_json("/api/upload", body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert_eq!(html.matches("Modelo 1: 120.5").count(), 2);
        assert_eq!(html.matches("Modelo 2: 118.0").count(), 2);
        assert!(html.find(r#"alt="a.png""#).unwrap() < html.find(r#"alt="b.png""#).unwrap());
    }

    #[tokio::test]
    async fn test_upload_without_files() {
        for body in ["{}", r#"{"files": null}"#, r#"{"files": []}"#] {
            let response = create_test_app()
                .oneshot(post_json("/api/upload", body.to_string()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_text(response).await, "");
        }
    }

    #[tokio::test]
    async fn test_upload_invalid_json() {
        let response = create_test_app()
            .oneshot(post_json("/api/upload", "not json".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn test_upload_over_body_limit() {
        let app = create_test_app_with(ServerConfig {
            max_upload_bytes: 64,
            ..ServerConfig::default()
        });
        let contents = format!("data:image/png;base64,{}", "A".repeat(200));
        let body = serde_json::json!({"files": [{"contents": contents, "filename": "big.png"}]});

        let response = app
            .oneshot(post_json("/api/upload", body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body_text(response).await.contains("PAYLOAD_TOO_LARGE"));
    }

    #[tokio::test]
    async fn test_charts_endpoint() {
        let response = create_test_app().oneshot(get_request("/api/charts")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["boneage"]["data"][0]["x"], serde_json::json!([36, 48]));
        assert_eq!(json["boneage"]["data"][0]["y"], serde_json::json!([2, 1]));
        assert_eq!(json["sex"]["data"][0]["values"], serde_json::json!([1, 2]));
    }

    #[tokio::test]
    async fn test_health() {
        let response = create_test_app().oneshot(get_request("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = create_test_app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["dataset_rows"], 3);
        assert_eq!(json["models"], serde_json::json!(["Modelo 1", "Modelo 2"]));
    }
}
