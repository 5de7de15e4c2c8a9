//! Prediction cache
//!
//! This module provides the cache trait and implementations.

mod memory;
#[cfg(feature = "redis")]
mod redis;
mod traits;

pub use memory::{InMemoryPredictionCache, NoopPredictionCache};
#[cfg(feature = "redis")]
pub use self::redis::RedisPredictionCache;
pub use traits::*;

use config::CacheConfig;
use std::sync::Arc;
use tracing::info;

/// Cache backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// Process-local map (fast, non-persistent)
    InMemory,
    /// Shared Redis instance
    Redis,
}

impl CacheBackend {
    /// Parse backend name from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in_memory" => Some(CacheBackend::InMemory),
            "redis" => Some(CacheBackend::Redis),
            _ => None,
        }
    }
}

/// Create a cache based on configuration
///
/// A disabled cache yields [`NoopPredictionCache`].
pub async fn create_cache(config: &CacheConfig) -> CacheResult<Arc<dyn PredictionCache>> {
    if !config.enabled {
        info!("Prediction cache disabled");
        return Ok(Arc::new(NoopPredictionCache));
    }

    let backend = CacheBackend::parse(&config.backend)
        .ok_or_else(|| CacheError::Backend(format!("unknown cache backend: {}", config.backend)))?;

    match backend {
        CacheBackend::InMemory => {
            info!(max_entries = config.max_entries, "Creating in-memory prediction cache");
            Ok(Arc::new(InMemoryPredictionCache::new(
                config.max_entries as usize,
            )))
        }
        #[cfg(feature = "redis")]
        CacheBackend::Redis => {
            let url = config.redis_url.as_deref().ok_or_else(|| {
                CacheError::Backend("redis backend requires redis_url".to_string())
            })?;
            info!("Creating Redis prediction cache");
            Ok(Arc::new(RedisPredictionCache::connect(url).await?))
        }
        #[cfg(not(feature = "redis"))]
        CacheBackend::Redis => Err(CacheError::Backend(
            "redis cache requested but the `redis` feature is not enabled".to_string(),
        )),
    }
}
