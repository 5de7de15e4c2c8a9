//! Redis prediction cache
//!
//! Forecasts are stored as JSON strings with `SET EX`, so expiry is handled
//! by Redis itself and the cache is shared across engine instances.

use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::traits::{CacheError, CacheResult, CachedForecast, PredictionCache};

/// Pattern matched by [`PredictionCache::flush`]
const KEY_PATTERN: &str = "prediction:*";

/// Keys per `DEL` issued by [`PredictionCache::flush`]
const FLUSH_BATCH: usize = 500;

pub struct RedisPredictionCache {
    redis: Mutex<redis::aio::ConnectionManager>,
}

impl RedisPredictionCache {
    /// Connect to Redis at `url`, e.g. `redis://localhost:6379/0`
    pub async fn connect(url: &str) -> CacheResult<Self> {
        info!("Connecting prediction cache to Redis");

        let client = redis::Client::open(url).map_err(|e| CacheError::Backend(e.to_string()))?;
        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;

        Ok(Self {
            redis: Mutex::new(manager),
        })
    }
}

#[async_trait]
impl PredictionCache for RedisPredictionCache {
    async fn get(&self, key: &str) -> CacheResult<Option<CachedForecast>> {
        let mut redis = self.redis.lock().await;
        let value: Option<String> = redis
            .get(key)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;

        value
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| CacheError::Serialization(e.to_string()))
            })
            .transpose()
    }

    async fn set(&self, key: &str, forecast: &CachedForecast, ttl: Duration) -> CacheResult<()> {
        let json =
            serde_json::to_string(forecast).map_err(|e| CacheError::Serialization(e.to_string()))?;

        let mut redis = self.redis.lock().await;
        redis
            .set_ex::<_, _, ()>(key, json, ttl.as_secs().max(1))
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;

        debug!(%key, ttl_secs = ttl.as_secs(), "Prediction cached in Redis");
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        let mut redis = self.redis.lock().await;
        let removed: u64 = redis
            .del(key)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(removed > 0)
    }

    async fn flush(&self) -> CacheResult<()> {
        let mut redis = self.redis.lock().await;

        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter = redis
                .scan_match::<_, String>(KEY_PATTERN)
                .await
                .map_err(|e| CacheError::Backend(e.to_string()))?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }

        for batch in keys.chunks(FLUSH_BATCH) {
            redis
                .del::<_, ()>(batch)
                .await
                .map_err(|e| CacheError::Backend(e.to_string()))?;
        }

        debug!(removed = keys.len(), "Flushed Redis prediction cache");
        Ok(())
    }
}
