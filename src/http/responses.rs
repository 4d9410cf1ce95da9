//! HTTP response types shared by the handlers
//!
//! The hash request/response bodies live in [`crate::endpoint`]; this module
//! holds the transport-only shapes (errors, health) and the mapping from
//! [`Error`] to HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::Error;

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub metrics_enabled: bool,
}

/// Standard error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub details: Option<BTreeMap<String, String>>,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error: &Error) -> Self {
        Self {
            error: error.to_string(),
            code: error_to_code(error),
            details: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Error body for requests that matched no route
    pub fn not_found() -> Self {
        Self {
            error: "Endpoint not found".to_string(),
            code: "NOT_FOUND".to_string(),
            details: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Convert error types to error codes
fn error_to_code(error: &Error) -> String {
    match error {
        Error::Config(_) => "CONFIG_ERROR".to_string(),
        Error::Validation { .. } => "VALIDATION_ERROR".to_string(),
        Error::Decode(_) => "DECODE_ERROR".to_string(),
        Error::Metrics(_) => "METRICS_ERROR".to_string(),
        Error::Io(_) => "IO_ERROR".to_string(),
        Error::Application(_) => "APPLICATION_ERROR".to_string(),
    }
}

/// Convert error types to HTTP status codes
pub fn error_to_status_code(error: &Error) -> StatusCode {
    match error {
        Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        Error::Validation { .. } => StatusCode::BAD_REQUEST,
        Error::Decode(_) => StatusCode::BAD_REQUEST,
        Error::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        Error::Application(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Implement IntoResponse for Error types to automatically convert them to HTTP responses
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = error_to_status_code(&self);
        let error_response = ErrorResponse::new(&self);
        (status_code, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_creation() {
        let error = Error::Decode("expected value at line 1 column 1".to_string());

        let response = ErrorResponse::new(&error);
        assert_eq!(response.code, "DECODE_ERROR");
        assert!(response.error.contains("expected value"));
        assert!(response.details.is_none());
    }

    #[test]
    fn test_not_found_response() {
        let response = ErrorResponse::not_found();
        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.error, "Endpoint not found");
    }

    #[test]
    fn test_error_to_status_code() {
        assert_eq!(
            error_to_status_code(&Error::Decode("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_to_status_code(&Error::Validation {
                field: "test".to_string(),
                message: "test".to_string()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_to_status_code(&Error::Application("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_into_response_status() {
        let response = Error::Decode("bad json".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
