//! HTTP middleware for the hash server
//!
//! Provides the tracing span factory used by `TraceLayer` and a per-route
//! request metrics layer.

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::{sync::Arc, time::Instant};
use tracing::{info_span, Span};

use crate::http::handlers::AppState;

/// Span for one HTTP request, used with `TraceLayer::make_span_with`
pub fn make_request_span(request: &Request) -> Span {
    info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
        request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    )
}

/// Record request count and latency for matched routes
///
/// Installed with `route_layer`, so the route template is always available and
/// unmatched paths never create new label values.
pub async fn track_http_metrics(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    state
        .metrics
        .record_http_request(&method, &path, response.status().as_u16(), start.elapsed());

    response
}
