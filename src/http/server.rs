//! HTTP server setup and configuration
//!
//! This module provides the server startup logic, routing configuration,
//! and graceful shutdown handling for the hash service.

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::{future::IntoFuture, net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::Notify};
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, instrument, warn};

use crate::{
    config::{parse_size_string, SystemConfig},
    http::{
        handlers::*,
        middleware::{make_request_span, track_http_metrics},
        HASH_PATH,
    },
    metrics::Metrics,
    types::{ConfigError, Error, Result},
};

/// Default body limit if the configured size cannot be parsed
const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Start the HTTP server with the given configuration
#[instrument(skip_all)]
pub async fn start_server(
    system_config: SystemConfig,
    metrics: Arc<Metrics>,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app_state = Arc::new(AppState::new(system_config.clone(), metrics));

    // Create the router with all endpoints
    let router = create_router(app_state, &system_config);

    // Parse the listen address
    let addr = parse_listen_address(&system_config.server.listen)?;

    info!(
        listen_addr = %addr,
        max_request_size = %system_config.server.max_request_size,
        request_timeout = system_config.server.request_timeout,
        metrics_enabled = system_config.monitoring.metrics_enabled,
        "Starting HTTP server"
    );

    // Create TCP listener
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        error!(
            error = %e,
            addr = %addr,
            "Failed to bind to address"
        );
        Error::Io(e)
    })?;

    info!(
        local_addr = %listener.local_addr().unwrap_or(addr),
        "HTTP server listening"
    );

    // Signalled once shutdown starts, so in-flight requests get a bounded drain period
    let shutdown_started = Arc::new(Notify::new());
    let notify = shutdown_started.clone();

    let server = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal.await;
            info!("Shutdown signal received, starting graceful shutdown");
            notify.notify_one();
        })
        .into_future();

    let shutdown_timeout = Duration::from_secs(system_config.server.shutdown_timeout);
    let drain_deadline = async {
        shutdown_started.notified().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server error");
                return Err(Error::Io(e));
            }
        }
        _ = drain_deadline => {
            warn!(
                shutdown_timeout = system_config.server.shutdown_timeout,
                "Graceful shutdown timed out, dropping remaining connections"
            );
        }
    }

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Create the Axum router with all endpoints and middleware
pub fn create_router(app_state: Arc<AppState>, config: &SystemConfig) -> Router {
    let routes = Router::new()
        .route(HASH_PATH, post(handle_hash).fallback(handle_not_found))
        .route(
            &config.monitoring.health_path,
            get(handle_health).fallback(handle_not_found),
        );

    // Add metrics endpoint if enabled
    let routes = if config.monitoring.metrics_enabled {
        routes.route(
            &config.monitoring.metrics_path,
            get(handle_metrics).fallback(handle_not_found),
        )
    } else {
        routes
    };

    let body_limit = parse_size_string(&config.server.max_request_size)
        .ok()
        .and_then(|bytes| usize::try_from(bytes).ok())
        .unwrap_or(DEFAULT_BODY_LIMIT);

    routes
        .route_layer(from_fn_with_state(app_state.clone(), track_http_metrics))
        .fallback(handle_not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout),
        ))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(app_state)
}

/// Parse the listen address from configuration
fn parse_listen_address(listen: &str) -> Result<SocketAddr> {
    listen.parse().map_err(|e| {
        error!(
            listen_addr = %listen,
            error = %e,
            "Invalid listen address format"
        );
        Error::Config(ConfigError::Invalid {
            message: format!("Invalid listen address '{}': {}", listen, e),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt as _;

    const WORLD_DIGEST: &str = "486ea46224d1bb4fb680f34f7c9ad96a8f24ec88be73ea8e5a6c65260e9cb8a7";

    fn create_test_router(config: SystemConfig) -> (Router, Arc<Metrics>) {
        let metrics = Arc::new(Metrics::new().unwrap());
        let state = Arc::new(AppState::new(config.clone(), metrics.clone()));
        (create_router(state, &config), metrics)
    }

    async fn send(router: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_parse_listen_address() {
        // Valid addresses
        assert!(parse_listen_address("127.0.0.1:8080").is_ok());
        assert!(parse_listen_address("0.0.0.0:8080").is_ok());
        assert!(parse_listen_address("[::1]:8080").is_ok());

        // Invalid addresses
        assert!(parse_listen_address("invalid").is_err());
        assert!(parse_listen_address("127.0.0.1").is_err());
        assert!(parse_listen_address("127.0.0.1:99999").is_err());
    }

    #[tokio::test]
    async fn test_hash_wiring_status_codes() {
        let (router, _) = create_test_router(SystemConfig::default());

        for (method, uri, body, want) in [
            ("POST", "/hash", r#"{"s":"world"}"#, StatusCode::OK),
            ("POST", "/hash", r#"{"s":""}"#, StatusCode::OK),
            ("POST", "/hash", r#"{"sdfs":""}"#, StatusCode::OK),
            ("POST", "/hash", "invalid", StatusCode::BAD_REQUEST),
            ("POST", "/hashDoesNotExist", "invalid", StatusCode::NOT_FOUND),
        ] {
            let (status, _) = send(&router, method, uri, body).await;
            assert_eq!(status, want, "{} {} {}", method, uri, body);
        }
    }

    #[tokio::test]
    async fn test_hash_wiring_bodies() {
        let (router, _) = create_test_router(SystemConfig::default());

        let world = format!(r#"{{"v":"{}"}}"#, WORLD_DIGEST);
        for (body, want) in [
            (r#"{"s":"world"}"#, world.as_str()),
            (r#"{"s":""}"#, r#"{"v":"","err":"Empty input string"}"#),
            (r#"{"sdfs":""}"#, r#"{"v":"","err":"Empty input string"}"#),
        ] {
            let (_, have) = send(&router, "POST", "/hash", body).await;
            assert_eq!(have.trim(), want, "POST /hash {}", body);
        }
    }

    #[tokio::test]
    async fn test_hash_with_json_content_type() {
        let (router, _) = create_test_router(SystemConfig::default());
        let request = Request::builder()
            .method("POST")
            .uri("/hash")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"s":"world"}"#))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_malformed_body_returns_json_error() {
        let (router, _) = create_test_router(SystemConfig::default());
        let (status, body) = send(&router, "POST", "/hash", "invalid").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["code"], "DECODE_ERROR");
    }

    #[tokio::test]
    async fn test_wrong_method_returns_not_found() {
        let (router, _) = create_test_router(SystemConfig::default());

        let (status, body) = send(&router, "GET", "/hash", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = send(&router, "POST", "/health", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_responses_are_idempotent() {
        let (router, _) = create_test_router(SystemConfig::default());

        for body in [r#"{"s":"world"}"#, r#"{"s":""}"#] {
            let (_, first) = send(&router, "POST", "/hash", body).await;
            let (_, second) = send(&router, "POST", "/hash", body).await;
            assert_eq!(first, second);
        }
    }

    #[tokio::test]
    async fn test_health_route() {
        let (router, _) = create_test_router(SystemConfig::default());
        let (status, body) = send(&router, "GET", "/health", "").await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_metrics_route_reports_requests() {
        let (router, metrics) = create_test_router(SystemConfig::default());

        send(&router, "POST", "/hash", r#"{"s":"world"}"#).await;
        send(&router, "POST", "/hash", r#"{"s":""}"#).await;
        send(&router, "POST", "/hash", "invalid").await;

        assert_eq!(metrics.request_count("hash", false), 1);
        assert_eq!(metrics.request_count("hash", true), 1);

        let (status, text) = send(&router, "GET", "/metrics", "").await;
        assert_eq!(status, StatusCode::OK);
        assert!(text.contains("api_request_total"));
        assert!(text.contains("request_processing_latency"));
        assert!(text.contains("http_requests_total"));
        assert!(text.contains(r#"path="/hash""#));
    }

    #[tokio::test]
    async fn test_router_with_metrics_disabled() {
        let mut config = SystemConfig::default();
        config.monitoring.metrics_enabled = false;
        let (router, _) = create_test_router(config);

        let (status, _) = send(&router, "GET", "/metrics", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, "POST", "/hash", r#"{"s":"world"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_custom_paths() {
        let mut config = SystemConfig::default();
        config.monitoring.health_path = "/healthz".to_string();
        config.monitoring.metrics_path = "/internal/metrics".to_string();
        let (router, _) = create_test_router(config);

        assert_eq!(send(&router, "GET", "/healthz", "").await.0, StatusCode::OK);
        assert_eq!(
            send(&router, "GET", "/internal/metrics", "").await.0,
            StatusCode::OK
        );
        assert_eq!(
            send(&router, "GET", "/health", "").await.0,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let mut config = SystemConfig::default();
        config.server.max_request_size = "1KB".to_string();
        let (router, metrics) = create_test_router(config);

        let body = format!(r#"{{"s":"{}"}}"#, "a".repeat(4096));
        let (status, _) = send(&router, "POST", "/hash", &body).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(metrics.request_count("hash", false), 0);
    }

    #[tokio::test]
    async fn test_body_above_extractor_default_accepted() {
        let mut config = SystemConfig::default();
        config.server.max_request_size = "10MB".to_string();
        assert!(config.validate().is_ok());
        let (router, metrics) = create_test_router(config);

        let body = format!(r#"{{"s":"{}"}}"#, "a".repeat(3 * 1024 * 1024));
        let (status, response) = send(&router, "POST", "/hash", &body).await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(json["v"].as_str().map(str::len), Some(64));
        assert_eq!(metrics.request_count("hash", false), 1);
    }

    #[tokio::test]
    async fn test_start_server_shuts_down() {
        let mut config = SystemConfig::default();
        config.server.listen = "127.0.0.1:0".to_string();
        let metrics = Arc::new(Metrics::new().unwrap());

        let result = start_server(config, metrics, async {}).await;
        assert!(result.is_ok());
    }
}
