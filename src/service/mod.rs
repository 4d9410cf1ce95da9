//! Hash computation service and its middleware decorators
//!
//! The base [`Sha256HashService`] is a pure function of its input. Cross-cutting
//! behavior is layered on by wrapping it in types that implement the same
//! [`HashService`] trait:
//!
//! ```text
//! InstrumentingMiddleware -> LoggingMiddleware -> Sha256HashService
//! ```
//!
//! Each wrapper owns the next link of the chain and forwards the call unchanged.

pub mod instrumenting;
pub mod logging;

use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;

use crate::metrics::Metrics;

pub use instrumenting::InstrumentingMiddleware;
pub use logging::LoggingMiddleware;

/// Method name used for log records and metric labels
pub const HASH_METHOD: &str = "hash";

/// Domain errors returned by a [`HashService`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Empty input string")]
    EmptyInput,
}

/// Capability shared by the base service and every decorator
pub trait HashService: Send + Sync {
    /// Compute the lowercase hex digest of `s`
    fn hash(&self, s: &str) -> Result<String, ServiceError>;
}

impl<T: HashService + ?Sized> HashService for Arc<T> {
    fn hash(&self, s: &str) -> Result<String, ServiceError> {
        (**self).hash(s)
    }
}

impl<T: HashService + ?Sized> HashService for Box<T> {
    fn hash(&self, s: &str) -> Result<String, ServiceError> {
        (**self).hash(s)
    }
}

/// SHA-256 implementation of [`HashService`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256HashService;

impl Sha256HashService {
    pub fn new() -> Self {
        Self
    }
}

impl HashService for Sha256HashService {
    fn hash(&self, s: &str) -> Result<String, ServiceError> {
        if s.is_empty() {
            return Err(ServiceError::EmptyInput);
        }

        Ok(hex::encode(Sha256::digest(s.as_bytes())))
    }
}

/// Build the canonical chain: Instrumenting(Logging(Sha256HashService))
///
/// Latency measured by the instrumenting layer includes logging overhead, and
/// the logging layer sees only the base service's outcome.
pub fn build_hash_service(metrics: Arc<Metrics>) -> Arc<dyn HashService> {
    Arc::new(InstrumentingMiddleware::new(
        metrics,
        LoggingMiddleware::new(Sha256HashService::new()),
    ))
}
