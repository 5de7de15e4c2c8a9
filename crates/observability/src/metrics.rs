//! Prometheus metrics infrastructure
//!
//! This module provides utilities for initializing Prometheus metrics
//! and the metric set recorded by the forecasting engine.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Initialize the Prometheus metrics exporter
///
/// This starts an HTTP server on the specified port that exposes metrics
/// at the `/metrics` endpoint.
///
/// # Arguments
///
/// * `port` - Port to expose metrics on
///
/// # Example
///
/// ```ignore
/// observability::metrics::init_metrics(9090)?;
/// // Metrics available at http://localhost:9090/metrics
/// ```
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Outcome label of a prediction request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Request,
    Success,
    Error,
}

impl RequestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestOutcome::Request => "request",
            RequestOutcome::Success => "success",
            RequestOutcome::Error => "error",
        }
    }
}

/// Prediction metrics
///
/// # Metrics
///
/// * `prediction_requests_total{provider, status}` - requests by outcome
/// * `prediction_duration_seconds{provider}` - provider latency
/// * `prediction_cache_total{result}` - cache hits and misses
/// * `prediction_fallbacks_total{provider}` - remote failures answered by the baseline
///
/// Without an installed recorder every call is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictionMetrics;

impl PredictionMetrics {
    pub fn new() -> Self {
        Self
    }

    /// Count one request outcome for a provider
    pub fn record_outcome(&self, provider: &str, outcome: RequestOutcome) {
        counter!(
            "prediction_requests_total",
            "provider" => provider.to_string(),
            "status" => outcome.as_str()
        )
        .increment(1);
    }

    /// Record how long a provider took to answer
    pub fn record_duration(&self, provider: &str, duration: Duration) {
        histogram!("prediction_duration_seconds", "provider" => provider.to_string())
            .record(duration.as_secs_f64());
    }

    pub fn record_cache(&self, hit: bool) {
        let result = if hit { "hit" } else { "miss" };
        counter!("prediction_cache_total", "result" => result).increment(1);
    }

    pub fn record_fallback(&self, provider: &str) {
        counter!("prediction_fallbacks_total", "provider" => provider.to_string()).increment(1);
    }
}
