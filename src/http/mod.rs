//! HTTP server module for the hash service
//!
//! This module provides the HTTP transport:
//! - Axum-based web server with routing
//! - JSON decoding/encoding around the hash endpoint
//! - Tracing, timeout, body limit and request metrics middleware
//! - Graceful shutdown handling
//!
//! The server exposes the following endpoints:
//! - POST /hash - Compute the SHA-256 digest of a string
//! - GET /health - Liveness check (path configurable)
//! - GET /metrics - Prometheus metrics (when enabled, path configurable)

pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod server;

pub use server::start_server;

/// Route of the hash endpoint
pub const HASH_PATH: &str = "/hash";
