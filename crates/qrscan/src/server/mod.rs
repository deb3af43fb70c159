//! HTTP server: router construction, CORS, and the listener loop.
//!
//! ```text
//! POST /scan    {"image": "data:image/jpeg;base64,..."}  →  [{"data", "position"}]
//! GET  /health                                           →  {"status", "version"}
//! ```
//!
//! The router is built once at startup around a shared `ScanProcessor`;
//! requests never mutate shared state.

mod error;
mod handlers;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use qrscan_core::config::CorsConfig;
use qrscan_core::{Config, ScanProcessor};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Room for the JSON envelope around the encoded image.
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<ScanProcessor>,
}

/// Build the application router from configuration.
pub fn router(config: &Config) -> anyhow::Result<Router> {
    let state = AppState {
        processor: Arc::new(ScanProcessor::new(config)),
    };
    let body_limit = config
        .limits
        .max_payload_bytes()
        .saturating_add(BODY_OVERHEAD_BYTES);

    let app = Router::new()
        .route("/scan", post(handlers::scan))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&config.cors)?);

    Ok(if config.server.debug {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    })
}

/// Translate the `[cors]` section into a tower-http layer.
fn cors_layer(cors: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let methods = cors
        .allowed_methods
        .iter()
        .map(|m| Method::from_bytes(m.to_ascii_uppercase().as_bytes()))
        .collect::<Result<Vec<_>, _>>()
        .context("invalid method in cors.allowed_methods")?;
    let headers = cors
        .allowed_headers
        .iter()
        .map(|h| HeaderName::from_bytes(h.as_bytes()))
        .collect::<Result<Vec<_>, _>>()
        .context("invalid header in cors.allowed_headers")?;

    let layer = CorsLayer::new().allow_methods(methods).allow_headers(headers);
    if cors.allows_any_origin() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = cors
        .allowed_origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<Vec<_>, _>>()
        .context("invalid origin in cors.allowed_origins")?;
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Bind the configured address and serve until ctrl-c.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let app = router(&config)?;

    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr()))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    if config.server.debug {
        tracing::info!("Development diagnostics enabled (request tracing, debug logs)");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::error::ErrorBody;
    use super::handlers::HealthResponse;
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use image::ImageFormat;
    use qrscan_core::test_fixtures::{canvas_with, data_url, encode, qr_png};
    use qrscan_core::{DetectedSymbol, Position};
    use tower::ServiceExt;

    fn app() -> Router {
        router(&Config::default()).unwrap()
    }

    async fn post_scan(app: Router, body: impl Into<Body>) -> Response {
        app.oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/scan")
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn scan_image(image: String) -> Response {
        let body = serde_json::json!({ "image": image }).to_string();
        post_scan(app(), body).await
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_scan_empty_image_returns_empty_array() {
        let png = encode(&canvas_with(160, 120, &[]), ImageFormat::Png);
        let response = scan_image(data_url(&png, "image/png")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let symbols: Vec<DetectedSymbol> = json(response).await;
        assert!(symbols.is_empty());
    }

    #[tokio::test]
    async fn test_scan_single_code_reports_data_and_position() {
        let png = encode(&canvas_with(320, 300, &[("hello", 80, 56)]), ImageFormat::Png);
        let response = scan_image(data_url(&png, "image/png")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let symbols: Vec<DetectedSymbol> = json(response).await;
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].data, "hello");
        let Position { x, y } = symbols[0].position;
        assert!((x - 80).abs() <= 2 && (y - 56).abs() <= 2, "got ({x}, {y})");
    }

    #[tokio::test]
    async fn test_scan_multiple_codes_each_once() {
        let canvas = canvas_with(
            560,
            560,
            &[("alpha", 32, 32), ("beta", 320, 40), ("gamma", 48, 330)],
        );
        let response = scan_image(data_url(&encode(&canvas, ImageFormat::Png), "image/png")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let symbols: Vec<DetectedSymbol> = json(response).await;
        let mut data: Vec<String> = symbols.into_iter().map(|s| s.data).collect();
        data.sort();
        assert_eq!(data, vec!["alpha", "beta", "gamma"]);
    }

    #[tokio::test]
    async fn test_scan_jpeg_utf8_round_trip() {
        let text = "naïve café ☕";
        let jpeg = encode(&canvas_with(400, 400, &[(text, 40, 40)]), ImageFormat::Jpeg);
        let response = scan_image(data_url(&jpeg, "image/jpeg")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let symbols: Vec<DetectedSymbol> = json(response).await;
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].data, text);
    }

    #[tokio::test]
    async fn test_missing_comma_is_bad_request() {
        let response = scan_image("data:image/png;base64".to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = json(response).await;
        assert!(body.error.contains("Invalid payload"));
    }

    #[tokio::test]
    async fn test_invalid_base64_is_bad_request() {
        let response = scan_image("data:image/png;base64,%%%%".to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = json(response).await;
        assert!(body.error.contains("base64"));
    }

    #[tokio::test]
    async fn test_non_image_payload_is_unprocessable() {
        let response = scan_image(data_url(b"just some text", "text/plain")).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_missing_image_field() {
        let response = post_scan(app(), r#"{"picture": "x"}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = json(response).await;
        assert!(body.error.contains("image"));

        let response = post_scan(app(), r#"{"image": ""}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_json_body_is_bad_request() {
        let response = post_scan(app(), "image=abc").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = json(response).await;
        assert!(body.error.starts_with("Malformed request"));
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut config = Config::default();
        config.limits.max_payload_mb = 1;
        let app = router(&config).unwrap();

        let image = format!("data:image/png;base64,{}", "A".repeat(2 * 1024 * 1024));
        let body = serde_json::json!({ "image": image }).to_string();
        let response = post_scan(app, body).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/scan")
                    .header(header::ORIGIN, "https://scanner.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_success());

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_ascii_uppercase();
        for method in ["GET", "POST", "OPTIONS"] {
            assert!(methods.contains(method), "missing {method} in {methods}");
        }
        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("content-type"));
        assert!(allowed.contains("accept"));
    }

    #[tokio::test]
    async fn test_cors_header_on_scan_response() {
        let body = serde_json::json!({ "image": data_url(&qr_png("cors"), "image/png") });
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/scan")
                    .header(header::ORIGIN, "https://scanner.example")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_restricted_origin_list() {
        let mut config = Config::default();
        config.cors.allowed_origins = vec!["https://scanner.example".into()];
        let response = router(&config)
            .unwrap()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/scan")
                    .header(header::ORIGIN, "https://scanner.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://scanner.example"
        );
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let health: HealthResponse = json(response).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, qrscan_core::VERSION);
    }

    #[test]
    fn test_cors_layer_rejects_bad_origin() {
        let cors = CorsConfig {
            allowed_origins: vec!["https://bad\norigin".into()],
            ..CorsConfig::default()
        };
        assert!(cors_layer(&cors).is_err());
    }
}
