//! Metrics for the forecast engine
//!
//! Local atomic counters readable through [`EngineMetrics::snapshot`]. Every
//! recording is mirrored to the `metrics` facade through
//! [`PredictionMetrics`] so an installed Prometheus exporter sees it too.

use observability::{PredictionMetrics, RequestOutcome};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Simple atomic counter
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Latency histogram reduced to count, sum, min and max
#[derive(Debug)]
pub struct Histogram {
    count: AtomicU64,
    sum: AtomicU64,
    min: AtomicU64,
    max: AtomicU64,
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            min: AtomicU64::new(u64::MAX),
            max: AtomicU64::new(0),
        }
    }

    pub fn record(&self, value_us: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(value_us, Ordering::Relaxed);
        self.min.fetch_min(value_us, Ordering::Relaxed);
        self.max.fetch_max(value_us, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> HistogramStats {
        let count = self.count.load(Ordering::Relaxed);
        let sum = self.sum.load(Ordering::Relaxed);

        HistogramStats {
            count,
            sum_us: sum,
            avg_us: if count > 0 { sum / count } else { 0 },
            min_us: if count > 0 { self.min.load(Ordering::Relaxed) } else { 0 },
            max_us: self.max.load(Ordering::Relaxed),
        }
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramStats {
    pub count: u64,
    pub sum_us: u64,
    pub avg_us: u64,
    pub min_us: u64,
    pub max_us: u64,
}

/// Metrics for the forecast engine
#[derive(Debug, Default)]
pub struct EngineMetrics {
    pub requests: Counter,
    pub successes: Counter,
    pub errors: Counter,
    pub cache_hits: Counter,
    pub cache_misses: Counter,
    pub forecast_latency: Histogram,
    exporter: PredictionMetrics,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self, provider: &str) {
        self.requests.increment();
        self.exporter.record_outcome(provider, RequestOutcome::Request);
    }

    pub fn record_success(&self, provider: &str, duration: Duration) {
        self.successes.increment();
        self.forecast_latency.record(duration.as_micros() as u64);
        self.exporter.record_outcome(provider, RequestOutcome::Success);
        self.exporter.record_duration(provider, duration);
    }

    pub fn record_error(&self, provider: &str, duration: Duration) {
        self.errors.increment();
        self.exporter.record_outcome(provider, RequestOutcome::Error);
        self.exporter.record_duration(provider, duration);
    }

    pub fn record_cache(&self, hit: bool) {
        if hit {
            self.cache_hits.increment();
        } else {
            self.cache_misses.increment();
        }
        self.exporter.record_cache(hit);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let latency = self.forecast_latency.get_stats();

        MetricsSnapshot {
            requests: self.requests.get(),
            successes: self.successes.get(),
            errors: self.errors.get(),
            cache_hits: self.cache_hits.get(),
            cache_misses: self.cache_misses.get(),
            forecast_latency_avg_us: latency.avg_us,
            forecast_latency_min_us: latency.min_us,
            forecast_latency_max_us: latency.max_us,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub successes: u64,
    pub errors: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub forecast_latency_avg_us: u64,
    pub forecast_latency_min_us: u64,
    pub forecast_latency_max_us: u64,
}
