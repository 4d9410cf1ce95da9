//! HTTP endpoint handlers for the hash API
//!
//! This module implements the handlers that translate between HTTP/JSON and the
//! transport-agnostic [`HashEndpoint`].

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::{sync::Arc, time::SystemTime};
use tracing::{debug, warn};

use crate::{
    config::SystemConfig,
    endpoint::{HashEndpoint, HashRequest},
    http::responses::*,
    metrics::Metrics,
    service::build_hash_service,
    types::Result,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub system_config: SystemConfig,
    pub start_time: SystemTime,
    pub endpoint: HashEndpoint,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wire the canonical service chain around the shared metrics aggregator
    pub fn new(system_config: SystemConfig, metrics: Arc<Metrics>) -> Self {
        let service = build_hash_service(metrics.clone());

        Self {
            system_config,
            start_time: SystemTime::now(),
            endpoint: HashEndpoint::new(service),
            metrics,
        }
    }
}

/// Decode a POST /hash body
///
/// The body is parsed as JSON regardless of the request content type. Missing
/// or unknown fields are tolerated; anything that is not a JSON object with an
/// optional string field `s` is rejected.
pub fn decode_hash_request(body: &[u8]) -> Result<HashRequest> {
    Ok(serde_json::from_slice(body)?)
}

/// POST /hash - Compute the digest of the submitted string
pub async fn handle_hash(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request = match decode_hash_request(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Rejected undecodable hash request");
            return e.into_response();
        }
    };

    let response = state.endpoint.call(request);
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /health - Liveness endpoint
pub async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().unwrap_or_default().as_secs();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        metrics_enabled: state.system_config.monitoring.metrics_enabled,
    })
}

/// GET /metrics - Prometheus metrics endpoint
pub async fn handle_metrics(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<impl IntoResponse, StatusCode> {
    match state.metrics.gather() {
        Ok(metrics_text) => Ok((
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            metrics_text,
        )),
        Err(e) => {
            warn!(error = %e, "Failed to gather Prometheus metrics");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Fallback handler for 404 Not Found
pub async fn handle_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found()))
}
