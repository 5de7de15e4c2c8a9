//! In-memory prediction caches

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::traits::{CacheResult, CachedForecast, PredictionCache};

struct CacheEntry {
    forecast: CachedForecast,
    expires_at: Instant,
}

/// In-memory prediction cache
///
/// Expired entries are dropped lazily. When full, expired entries are
/// purged first, then the entry closest to expiry is evicted.
pub struct InMemoryPredictionCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    max_entries: usize,
}

impl InMemoryPredictionCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn make_room(entries: &mut HashMap<String, CacheEntry>, max_entries: usize, now: Instant) {
        if entries.len() < max_entries {
            return;
        }

        entries.retain(|_, entry| entry.expires_at > now);

        if entries.len() >= max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                debug!(%key, "Evicting prediction from full cache");
                entries.remove(&key);
            }
        }
    }
}

impl Default for InMemoryPredictionCache {
    fn default() -> Self {
        Self::new(config::default_max_entries() as usize)
    }
}

#[async_trait]
impl PredictionCache for InMemoryPredictionCache {
    async fn get(&self, key: &str) -> CacheResult<Option<CachedForecast>> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.forecast.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| entry.expires_at <= now) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, forecast: &CachedForecast, ttl: Duration) -> CacheResult<()> {
        let now = Instant::now();
        let mut entries = self.entries.write();

        if !entries.contains_key(key) {
            Self::make_room(&mut entries, self.max_entries, now);
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                forecast: forecast.clone(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }

    async fn flush(&self) -> CacheResult<()> {
        self.entries.write().clear();
        Ok(())
    }
}

/// Cache that stores nothing, used when caching is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPredictionCache;

#[async_trait]
impl PredictionCache for NoopPredictionCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<CachedForecast>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _forecast: &CachedForecast, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> CacheResult<bool> {
        Ok(false)
    }

    async fn flush(&self) -> CacheResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::ForecastPoint;

    fn points(p50: f64) -> CachedForecast {
        let date = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        CachedForecast::new(
            "baseline",
            vec![ForecastPoint::rounded(date, p50 - 1.0, p50, p50 + 1.0)],
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_respects_ttl() {
        let cache = InMemoryPredictionCache::new(10);
        cache.set("a", &points(10.0), Duration::from_secs(300)).await.unwrap();

        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get("a").await.unwrap(), Some(points(10.0)));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("a").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_set_replaces_value() {
        let cache = InMemoryPredictionCache::new(10);
        cache.set("a", &points(1.0), Duration::from_secs(60)).await.unwrap();
        cache.set("a", &points(2.0), Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").await.unwrap(), Some(points(2.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_cache_evicts_expired_first() {
        let cache = InMemoryPredictionCache::new(2);
        cache.set("short", &points(1.0), Duration::from_secs(10)).await.unwrap();
        cache.set("long", &points(2.0), Duration::from_secs(600)).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;
        cache.set("new", &points(3.0), Duration::from_secs(600)).await.unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.get("long").await.unwrap().is_some());
        assert!(cache.get("new").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_cache_evicts_nearest_expiry() {
        let cache = InMemoryPredictionCache::new(2);
        cache.set("a", &points(1.0), Duration::from_secs(100)).await.unwrap();
        cache.set("b", &points(2.0), Duration::from_secs(50)).await.unwrap();
        cache.set("c", &points(3.0), Duration::from_secs(100)).await.unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.get("b").await.unwrap().is_none());
        assert!(cache.get("a").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_and_flush() {
        let cache = InMemoryPredictionCache::new(10);
        cache.set("a", &points(1.0), Duration::from_secs(60)).await.unwrap();
        cache.set("b", &points(2.0), Duration::from_secs(60)).await.unwrap();

        assert!(cache.delete("a").await.unwrap());
        assert!(!cache.delete("a").await.unwrap());

        cache.flush().await.unwrap();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_noop_cache_never_hits() {
        let cache = NoopPredictionCache;
        cache.set("a", &points(1.0), Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("a").await.unwrap(), None);
        assert!(!cache.delete("a").await.unwrap());
    }
}
