//! Metrics decorator for [`HashService`]

use std::sync::Arc;
use std::time::Instant;

use super::{HashService, ServiceError, HASH_METHOD};
use crate::metrics::Metrics;

/// Wraps a [`HashService`] and records a request count and latency per call
#[derive(Clone)]
pub struct InstrumentingMiddleware<S> {
    metrics: Arc<Metrics>,
    next: S,
}

impl<S: HashService> InstrumentingMiddleware<S> {
    pub fn new(metrics: Arc<Metrics>, next: S) -> Self {
        Self { metrics, next }
    }
}

impl<S: HashService> HashService for InstrumentingMiddleware<S> {
    fn hash(&self, s: &str) -> Result<String, ServiceError> {
        let begin = Instant::now();
        let result = self.next.hash(s);

        self.metrics
            .record_request(HASH_METHOD, result.is_err(), begin.elapsed());

        result
    }
}
