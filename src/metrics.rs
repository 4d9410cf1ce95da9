//! Prometheus metrics collection for the hash service
//!
//! A single [`Metrics`] instance is built at startup and shared through an
//! `Arc`. It owns its own registry so tests can create isolated instances.
//! All recording methods are best effort: a failure to resolve a labelled
//! series is logged at debug level and otherwise ignored.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;
use tracing::debug;

use crate::types::Result;

/// Labels used by the service-level metrics
pub const SERVICE_LABELS: &[&str] = &["method", "error"];

/// Process-wide metric aggregator
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,

    /// Total API requests
    /// Labels: method, error (true/false)
    request_count: IntCounterVec,

    /// Time spent in the service per request, in seconds
    /// Labels: method, error (true/false)
    request_latency: HistogramVec,

    /// Total number of HTTP requests
    /// Labels: method, path
    http_requests_total: IntCounterVec,

    /// HTTP request duration in seconds
    /// Labels: method, path, status
    /// Buckets optimized for HTTP request times (1ms to 10s)
    http_request_duration_seconds: HistogramVec,
}

impl Metrics {
    /// Create the metric vectors and register them with a fresh registry
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let request_count = IntCounterVec::new(
            Opts::new(
                "api_request_total",
                "Total API requests, partitioned by method and error",
            ),
            SERVICE_LABELS,
        )?;

        let request_latency = HistogramVec::new(
            HistogramOpts::new(
                "request_processing_latency",
                "Time taken per request, partitioned by method and error",
            ),
            SERVICE_LABELS,
        )?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request latencies")
                .buckets(vec![
                    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
                ]),
            &["method", "path", "status"],
        )?;

        registry.register(Box::new(request_count.clone()))?;
        registry.register(Box::new(request_latency.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        debug!("Prometheus metrics registry initialized");

        Ok(Self {
            registry,
            request_count,
            request_latency,
            http_requests_total,
            http_request_duration_seconds,
        })
    }

    /// Record one service invocation
    pub fn record_request(&self, method: &str, failed: bool, elapsed: Duration) {
        let error_label = if failed { "true" } else { "false" };
        let labels = [method, error_label];

        match self.request_count.get_metric_with_label_values(&labels) {
            Ok(counter) => counter.inc(),
            Err(e) => debug!(error = %e, "Dropped api_request_total sample"),
        }

        match self.request_latency.get_metric_with_label_values(&labels) {
            Ok(histogram) => histogram.observe(elapsed.as_secs_f64()),
            Err(e) => debug!(error = %e, "Dropped request_processing_latency sample"),
        }
    }

    /// Record an HTTP request
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, elapsed: Duration) {
        match self
            .http_requests_total
            .get_metric_with_label_values(&[method, path])
        {
            Ok(counter) => counter.inc(),
            Err(e) => debug!(error = %e, "Dropped http_requests_total sample"),
        }

        let status = status.to_string();
        match self
            .http_request_duration_seconds
            .get_metric_with_label_values(&[method, path, &status])
        {
            Ok(histogram) => histogram.observe(elapsed.as_secs_f64()),
            Err(e) => debug!(error = %e, "Dropped http_request_duration_seconds sample"),
        }
    }

    /// Current value of `api_request_total` for a label pair
    #[cfg(test)]
    pub fn request_count(&self, method: &str, failed: bool) -> u64 {
        let error_label = if failed { "true" } else { "false" };
        self.request_count
            .get_metric_with_label_values(&[method, error_label])
            .map(|counter| counter.get())
            .unwrap_or(0)
    }

    /// Number of latency observations for a label pair
    #[cfg(test)]
    pub fn latency_sample_count(&self, method: &str, failed: bool) -> u64 {
        let error_label = if failed { "true" } else { "false" };
        self.request_latency
            .get_metric_with_label_values(&[method, error_label])
            .map(|histogram| histogram.get_sample_count())
            .unwrap_or(0)
    }

    /// Gather all metrics and encode them in Prometheus text format
    pub fn gather(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| {
            crate::types::Error::Application(format!(
                "Failed to convert metrics to UTF-8: {}",
                e
            ))
        })
    }
}
