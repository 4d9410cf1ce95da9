//! Structured logging decorator for [`HashService`]
//!
//! Emits one event per call after the wrapped service returns. Only the method
//! name, the elapsed time and the error message (if any) are recorded; the input
//! string and the digest never reach the log.

use std::time::Instant;
use tracing::{info, warn};

use super::{HashService, ServiceError, HASH_METHOD};

/// Wraps a [`HashService`] and logs every call
#[derive(Debug, Clone)]
pub struct LoggingMiddleware<S> {
    next: S,
}

impl<S: HashService> LoggingMiddleware<S> {
    pub fn new(next: S) -> Self {
        Self { next }
    }
}

impl<S: HashService> HashService for LoggingMiddleware<S> {
    fn hash(&self, s: &str) -> Result<String, ServiceError> {
        let begin = Instant::now();
        let result = self.next.hash(s);
        let took = begin.elapsed();

        match &result {
            Ok(_) => info!(method = HASH_METHOD, took = ?took, "Hash computed"),
            Err(e) => warn!(method = HASH_METHOD, took = ?took, error = %e, "Hash rejected"),
        }

        result
    }
}
