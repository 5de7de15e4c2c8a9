//! Prediction cache traits

use async_trait::async_trait;
use common::{ForecastPoint, SubjectId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Errors that can occur in cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache serialization error: {0}")]
    Serialization(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Cache key of a forecast: `prediction:{subject}:{horizon}`
pub fn prediction_key(subject_id: &SubjectId, horizon_days: u32) -> String {
    format!("prediction:{}:{}", subject_id, horizon_days)
}

/// A cached forecast and the provider that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedForecast {
    pub provider: String,
    pub points: Vec<ForecastPoint>,
}

impl CachedForecast {
    pub fn new(provider: impl Into<String>, points: Vec<ForecastPoint>) -> Self {
        Self {
            provider: provider.into(),
            points,
        }
    }
}

/// Key-value store for computed forecasts with per-entry TTL
///
/// Implementations must tolerate concurrent reads and writes.
#[async_trait]
pub trait PredictionCache: Send + Sync {
    /// Get an unexpired forecast
    async fn get(&self, key: &str) -> CacheResult<Option<CachedForecast>>;

    /// Store a forecast, replacing any previous value
    async fn set(&self, key: &str, forecast: &CachedForecast, ttl: Duration) -> CacheResult<()>;

    /// Remove a forecast. Returns true if an entry was removed.
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Remove every forecast
    async fn flush(&self) -> CacheResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_key() {
        assert_eq!(prediction_key(&SubjectId::new("sku-42"), 14), "prediction:sku-42:14");
    }
}
