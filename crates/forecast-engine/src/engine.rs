//! Forecast engine - provider registry, aggregation, caching
//!
//! The engine owns the provider registry and the active-provider selection.
//! It is constructed explicitly and shared by cloning; clones see the same
//! registry, cache and metrics.

use chrono::Utc;
use common::{ForecastPoint, ForecastRequest, PredictionReport, SubjectId, MIN_HORIZON_DAYS};
use config::PriceCastConfig;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::aggregate::daily_average;
use crate::cache::{prediction_key, CachedForecast, PredictionCache};
use crate::error::PredictionError;
use crate::history::HistorySource;
use crate::metrics::{EngineMetrics, MetricsSnapshot};
use crate::providers::{BaselineProvider, ForecastProvider, RemoteProvider};
use crate::Result;

/// Engine tuning taken from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Fewest aggregated daily points accepted
    pub min_history_points: usize,
    /// Most recent raw observations kept before aggregation
    pub max_history_points: usize,
    pub default_horizon_days: u32,
    pub max_horizon_days: u32,
    pub cache_ttl: Duration,
}

impl EngineSettings {
    pub fn from_config(config: &PriceCastConfig) -> Self {
        Self {
            min_history_points: config.prediction.min_history_points,
            max_history_points: config.prediction.max_history_points,
            default_horizon_days: config.prediction.default_horizon_days,
            max_horizon_days: config.prediction.max_horizon_days,
            cache_ttl: Duration::from_secs(config.cache.ttl_seconds),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&PriceCastConfig::default())
    }
}

struct EngineInner {
    providers: RwLock<HashMap<String, Arc<dyn ForecastProvider>>>,
    active_provider: RwLock<String>,
    history: Arc<dyn HistorySource>,
    cache: Arc<dyn PredictionCache>,
    settings: EngineSettings,
    metrics: EngineMetrics,
}

/// Forecast orchestrator
#[derive(Clone)]
pub struct ForecastEngine {
    inner: Arc<EngineInner>,
}

impl ForecastEngine {
    /// Create an engine with `default_provider` registered and active
    pub fn new(
        default_provider: Arc<dyn ForecastProvider>,
        history: Arc<dyn HistorySource>,
        cache: Arc<dyn PredictionCache>,
        settings: EngineSettings,
    ) -> Self {
        let active = default_provider.id().to_string();
        let mut providers = HashMap::new();
        providers.insert(active.clone(), default_provider);

        info!(provider = %active, "Forecast engine created");

        Self {
            inner: Arc::new(EngineInner {
                providers: RwLock::new(providers),
                active_provider: RwLock::new(active),
                history,
                cache,
                settings,
                metrics: EngineMetrics::new(),
            }),
        }
    }

    /// Build the standard provider set from configuration
    ///
    /// Registers the baseline provider and, when enabled, the remote one,
    /// then activates `prediction.provider`.
    pub fn from_config(
        config: &PriceCastConfig,
        history: Arc<dyn HistorySource>,
        cache: Arc<dyn PredictionCache>,
    ) -> Result<Self> {
        let prediction = &config.prediction;
        let baseline = Arc::new(BaselineProvider::from_config(&prediction.baseline));
        let engine = Self::new(baseline, history, cache, EngineSettings::from_config(config));

        if prediction.remote.enabled {
            let remote = RemoteProvider::from_config(&prediction.remote, &prediction.baseline)?;
            engine.register_provider(Arc::new(remote));
        } else {
            debug!("Remote provider disabled");
        }

        engine.set_active_provider(&prediction.provider)?;
        Ok(engine)
    }

    /// Register a provider, replacing any provider with the same id
    pub fn register_provider(&self, provider: Arc<dyn ForecastProvider>) {
        let id = provider.id().to_string();
        let replaced = self.inner.providers.write().insert(id.clone(), provider).is_some();
        info!(provider = %id, replaced, "Registered prediction provider");
    }

    /// Switch the provider used by subsequent predictions
    ///
    /// In-flight predictions finish with the provider they started with.
    pub fn set_active_provider(&self, id: &str) -> Result<()> {
        if !self.inner.providers.read().contains_key(id) {
            return Err(PredictionError::ProviderNotFound(id.to_string()));
        }

        let mut active = self.inner.active_provider.write();
        if *active != id {
            info!(from = %*active, to = %id, "Switching prediction provider");
            *active = id.to_string();
        }
        Ok(())
    }

    pub fn active_provider(&self) -> String {
        self.inner.active_provider.read().clone()
    }

    /// Registered provider ids, sorted
    pub fn available_providers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.providers.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.inner.settings
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    /// Forecast with the configured default horizon
    pub async fn predict_default(&self, subject_id: &SubjectId) -> Result<Vec<ForecastPoint>> {
        self.predict(subject_id, self.inner.settings.default_horizon_days).await
    }

    /// Forecast `horizon_days` days of prices for a subject
    ///
    /// Cached forecasts are returned without invoking a provider. Otherwise
    /// the history is fetched, aggregated to one point per day and handed to
    /// the active provider; the result is cached before it is returned.
    ///
    /// The computation runs on its own task, so a caller that gives up does
    /// not prevent the result from reaching the cache.
    pub async fn predict(
        &self,
        subject_id: &SubjectId,
        horizon_days: u32,
    ) -> Result<Vec<ForecastPoint>> {
        Ok(self.forecast(subject_id, horizon_days).await?.points)
    }

    /// Forecast plus the metadata shown to callers
    ///
    /// The reported provider is the one that produced the points, which for
    /// a cached forecast may differ from the currently active provider.
    pub async fn predict_report(
        &self,
        subject_id: &SubjectId,
        horizon_days: u32,
    ) -> Result<PredictionReport> {
        let forecast = self.forecast(subject_id, horizon_days).await?;

        Ok(PredictionReport {
            subject_id: subject_id.clone(),
            provider: forecast.provider,
            horizon_days,
            generated_at: Utc::now(),
            data_points: forecast.points.len(),
            points: forecast.points,
        })
    }

    /// Serve a forecast request
    pub async fn handle_request(&self, request: &ForecastRequest) -> Result<PredictionReport> {
        self.predict_report(&request.subject_id, request.horizon_days).await
    }

    /// Drop the cached forecast of one subject and horizon
    pub async fn invalidate(&self, subject_id: &SubjectId, horizon_days: u32) -> bool {
        let key = prediction_key(subject_id, horizon_days);
        match self.inner.cache.delete(&key).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(error = %e, %key, "Failed to invalidate cached prediction");
                false
            }
        }
    }

    pub async fn flush_cache(&self) {
        if let Err(e) = self.inner.cache.flush().await {
            warn!(error = %e, "Failed to flush prediction cache");
        }
    }

    async fn forecast(&self, subject_id: &SubjectId, horizon_days: u32) -> Result<CachedForecast> {
        let max = self.inner.settings.max_horizon_days;
        if !(MIN_HORIZON_DAYS..=max).contains(&horizon_days) {
            return Err(PredictionError::InvalidHorizon {
                horizon: horizon_days,
                max,
            });
        }

        let key = prediction_key(subject_id, horizon_days);
        match self.inner.cache.get(&key).await {
            Ok(Some(cached)) => {
                debug!(subject = %subject_id, horizon_days, "Prediction cache hit");
                self.inner.metrics.record_cache(true);
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, %key, "Prediction cache read failed, treating as miss"),
        }
        self.inner.metrics.record_cache(false);

        let provider = self.resolve_active()?;
        let inner = Arc::clone(&self.inner);
        let subject_id = subject_id.clone();

        tokio::spawn(async move { inner.compute(provider, subject_id, horizon_days, key).await })
            .await
            .map_err(|e| PredictionError::Task(e.to_string()))?
    }

    fn resolve_active(&self) -> Result<Arc<dyn ForecastProvider>> {
        let active = self.inner.active_provider.read().clone();
        let provider = self.inner.providers.read().get(&active).cloned();
        provider.ok_or(PredictionError::ProviderNotFound(active))
    }
}

impl EngineInner {
    async fn compute(
        &self,
        provider: Arc<dyn ForecastProvider>,
        subject_id: SubjectId,
        horizon_days: u32,
        key: String,
    ) -> Result<CachedForecast> {
        let provider_id = provider.id().to_string();
        info!(
            subject = %subject_id,
            horizon_days,
            provider = %provider_id,
            "Starting price prediction"
        );

        let started = Instant::now();
        let result = self.run_provider(provider.as_ref(), &subject_id, horizon_days).await;

        match result {
            Ok(points) => {
                self.metrics.record_success(&provider_id, started.elapsed());

                let forecast = CachedForecast::new(provider_id, points);
                if let Err(e) = self.cache.set(&key, &forecast, self.settings.cache_ttl).await {
                    warn!(error = %e, %key, "Failed to cache prediction");
                }

                info!(
                    subject = %subject_id,
                    points = forecast.points.len(),
                    "Price prediction completed"
                );
                Ok(forecast)
            }
            Err(e) => {
                self.metrics.record_error(&provider_id, started.elapsed());
                error!(
                    subject = %subject_id,
                    provider = %provider_id,
                    error = %e,
                    "Price prediction failed"
                );
                Err(e)
            }
        }
    }

    async fn run_provider(
        &self,
        provider: &dyn ForecastProvider,
        subject_id: &SubjectId,
        horizon_days: u32,
    ) -> Result<Vec<ForecastPoint>> {
        let raw = self.history.get_history(subject_id).await?;
        let raw_points = raw.len();
        let daily = daily_average(raw, self.settings.max_history_points);

        debug!(subject = %subject_id, raw_points, daily_points = daily.len(), "History aggregated");

        if daily.len() < self.settings.min_history_points {
            return Err(PredictionError::insufficient_data(
                self.settings.min_history_points,
                daily.len(),
            ));
        }

        self.metrics.record_request(provider.id());
        provider.forecast(&daily, horizon_days).await
    }
}

impl std::fmt::Debug for ForecastEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastEngine")
            .field("active_provider", &self.active_provider())
            .field("providers", &self.available_providers())
            .field("settings", &self.inner.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, CacheResult, InMemoryPredictionCache};
    use crate::history::{HistoryError, HistoryResult, InMemoryHistory};
    use crate::providers::SeededSource;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration as ChronoDuration, TimeZone};
    use common::HistoricalPoint;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider returning a flat forecast and recording every call
    struct CountingProvider {
        id: &'static str,
        level: f64,
        delay: Option<Duration>,
        calls: AtomicUsize,
        seen: Mutex<Vec<HistoricalPoint>>,
    }

    impl CountingProvider {
        fn new(id: &'static str, level: f64) -> Self {
            Self {
                id,
                level,
                delay: None,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ForecastProvider for CountingProvider {
        fn id(&self) -> &str {
            self.id
        }

        async fn forecast(
            &self,
            history: &[HistoricalPoint],
            horizon_days: u32,
        ) -> Result<Vec<ForecastPoint>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock() = history.to_vec();
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let last = history.last().map(|p| p.timestamp).unwrap_or_else(Utc::now);
            Ok((1..=horizon_days)
                .map(|i| {
                    ForecastPoint::rounded(
                        last + ChronoDuration::days(i64::from(i)),
                        self.level - 1.0,
                        self.level,
                        self.level + 1.0,
                    )
                })
                .collect())
        }
    }

    struct FailingHistory;

    #[async_trait]
    impl HistorySource for FailingHistory {
        async fn get_history(
            &self,
            _subject_id: &SubjectId,
        ) -> HistoryResult<Vec<HistoricalPoint>> {
            Err(HistoryError::Unavailable("db down".to_string()))
        }
    }

    struct FailingCache;

    #[async_trait]
    impl PredictionCache for FailingCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<CachedForecast>> {
            Err(CacheError::Backend("cache down".to_string()))
        }

        async fn set(
            &self,
            _key: &str,
            _forecast: &CachedForecast,
            _ttl: Duration,
        ) -> CacheResult<()> {
            Err(CacheError::Backend("cache down".to_string()))
        }

        async fn delete(&self, _key: &str) -> CacheResult<bool> {
            Err(CacheError::Backend("cache down".to_string()))
        }

        async fn flush(&self) -> CacheResult<()> {
            Err(CacheError::Backend("cache down".to_string()))
        }
    }

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + ChronoDuration::days(n)
    }

    fn subject() -> SubjectId {
        SubjectId::new("sku-1")
    }

    /// One observation per day at noon, `100 + day`
    fn history_with_days(days: i64) -> Arc<InMemoryHistory> {
        let history = InMemoryHistory::new();
        history.extend(
            subject(),
            (0..days).map(|d| {
                HistoricalPoint::new(100.0 + d as f64, day(d) + ChronoDuration::hours(12))
            }),
        );
        Arc::new(history)
    }

    fn engine_with(
        provider: Arc<CountingProvider>,
        history: Arc<dyn HistorySource>,
    ) -> ForecastEngine {
        ForecastEngine::new(
            provider,
            history,
            Arc::new(InMemoryPredictionCache::new(100)),
            EngineSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_second_predict_is_served_from_cache() {
        let provider = Arc::new(CountingProvider::new("counting", 50.0));
        let engine = engine_with(provider.clone(), history_with_days(14));

        let first = engine.predict(&subject(), 7).await.unwrap();
        let second = engine.predict(&subject(), 7).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 7);
        assert_eq!(provider.calls(), 1);

        let metrics = engine.metrics();
        assert_eq!(metrics.cache_hits, 1);
        assert_eq!(metrics.cache_misses, 1);
        assert_eq!(metrics.requests, 1);
        assert_eq!(metrics.successes, 1);
    }

    #[tokio::test]
    async fn test_cache_is_keyed_by_horizon() {
        let provider = Arc::new(CountingProvider::new("counting", 50.0));
        let engine = engine_with(provider.clone(), history_with_days(14));

        engine.predict(&subject(), 7).await.unwrap();
        engine.predict(&subject(), 8).await.unwrap();

        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_prediction_expires() {
        let provider = Arc::new(CountingProvider::new("counting", 50.0));
        let engine = engine_with(provider.clone(), history_with_days(14));

        engine.predict(&subject(), 7).await.unwrap();
        tokio::time::advance(Duration::from_secs(299)).await;
        engine.predict(&subject(), 7).await.unwrap();
        assert_eq!(provider.calls(), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        engine.predict(&subject(), 7).await.unwrap();
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_provider_receives_daily_means() {
        let history = InMemoryHistory::new();
        for d in 0..12 {
            let evening = day(d) + ChronoDuration::hours(20);
            let morning = day(d) + ChronoDuration::hours(3);
            history.record(subject(), HistoricalPoint::new(10.0, evening));
            history.record(subject(), HistoricalPoint::new(20.0, morning));
        }
        let provider = Arc::new(CountingProvider::new("counting", 50.0));
        let engine = engine_with(provider.clone(), Arc::new(history));

        let points = engine.predict(&subject(), 3).await.unwrap();

        let seen = provider.seen.lock().clone();
        assert_eq!(seen.len(), 12);
        assert!(seen.iter().all(|p| p.price == 15.0));
        assert_eq!(seen[0].timestamp, day(0));
        assert_eq!(seen[11].timestamp, day(11));
        assert_eq!(points[0].date, day(12));
    }

    #[tokio::test]
    async fn test_only_most_recent_raw_points_used() {
        let provider = Arc::new(CountingProvider::new("counting", 50.0));
        let engine = engine_with(provider.clone(), history_with_days(120));

        engine.predict(&subject(), 1).await.unwrap();

        let seen = provider.seen.lock().clone();
        assert_eq!(seen.len(), 90);
        assert_eq!(seen[0].price, 130.0);
        assert_eq!(seen[89].price, 219.0);
    }

    #[tokio::test]
    async fn test_insufficient_daily_points() {
        // 20 observations, but only 5 distinct days
        let history = InMemoryHistory::new();
        for i in 0..20 {
            let timestamp = day(i % 5) + ChronoDuration::hours(i);
            history.record(subject(), HistoricalPoint::new(10.0, timestamp));
        }
        let provider = Arc::new(CountingProvider::new("counting", 50.0));
        let engine = engine_with(provider.clone(), Arc::new(history));

        let err = engine.predict(&subject(), 7).await.unwrap_err();

        assert_matches!(err, PredictionError::InsufficientData { required: 10, actual: 5 });
        assert_eq!(provider.calls(), 0);
        assert_eq!(engine.metrics().errors, 1);
    }

    #[tokio::test]
    async fn test_unknown_subject_is_insufficient() {
        let provider = Arc::new(CountingProvider::new("counting", 50.0));
        let engine = engine_with(provider, history_with_days(14));

        let err = engine.predict(&SubjectId::new("missing"), 7).await.unwrap_err();
        assert_matches!(err, PredictionError::InsufficientData { actual: 0, .. });
    }

    #[tokio::test]
    async fn test_history_errors_propagate_unchanged() {
        let provider = Arc::new(CountingProvider::new("counting", 50.0));
        let engine = engine_with(provider, Arc::new(FailingHistory));

        let err = engine.predict(&subject(), 7).await.unwrap_err();
        assert_matches!(
            err,
            PredictionError::History(HistoryError::Unavailable(msg)) if msg == "db down"
        );
    }

    #[tokio::test]
    async fn test_horizon_bounds() {
        let provider = Arc::new(CountingProvider::new("counting", 50.0));
        let engine = engine_with(provider.clone(), Arc::new(FailingHistory));

        assert_matches!(
            engine.predict(&subject(), 0).await,
            Err(PredictionError::InvalidHorizon { horizon: 0, max: 90 })
        );
        assert_matches!(
            engine.predict(&subject(), 91).await,
            Err(PredictionError::InvalidHorizon { horizon: 91, max: 90 })
        );
        assert_eq!(engine.metrics().cache_misses, 0);
    }

    #[tokio::test]
    async fn test_predict_default_uses_fourteen_days() {
        let provider = Arc::new(CountingProvider::new("counting", 50.0));
        let engine = engine_with(provider, history_with_days(14));

        let points = engine.predict_default(&subject()).await.unwrap();
        assert_eq!(points.len(), 14);
    }

    #[tokio::test]
    async fn test_set_unknown_provider_keeps_active() {
        let provider = Arc::new(CountingProvider::new("counting", 50.0));
        let engine = engine_with(provider, history_with_days(14));

        let err = engine.set_active_provider("nonexistent").unwrap_err();

        assert_matches!(err, PredictionError::ProviderNotFound(id) if id == "nonexistent");
        assert_eq!(engine.active_provider(), "counting");
    }

    #[tokio::test]
    async fn test_switch_provider() {
        let first = Arc::new(CountingProvider::new("first", 10.0));
        let second = Arc::new(CountingProvider::new("second", 20.0));
        let engine = engine_with(first.clone(), history_with_days(14));
        engine.register_provider(second.clone());

        assert_eq!(engine.available_providers(), vec!["first", "second"]);

        engine.set_active_provider("second").unwrap();
        let points = engine.predict(&subject(), 2).await.unwrap();

        assert_eq!(points[0].p50, 20.0);
        assert_eq!(first.calls(), 0);
        assert_eq!(second.calls(), 1);
    }

    #[tokio::test]
    async fn test_register_is_upsert() {
        let original = Arc::new(CountingProvider::new("counting", 10.0));
        let replacement = Arc::new(CountingProvider::new("counting", 30.0));
        let engine = engine_with(original.clone(), history_with_days(14));

        engine.register_provider(replacement.clone());
        engine.register_provider(replacement.clone());

        assert_eq!(engine.available_providers(), vec!["counting"]);
        let points = engine.predict(&subject(), 1).await.unwrap();
        assert_eq!(points[0].p50, 30.0);
        assert_eq!(original.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_prediction_survives_provider_switch() {
        let slow = Arc::new(CountingProvider::new("slow", 10.0).with_delay(Duration::from_secs(5)));
        let other = Arc::new(CountingProvider::new("other", 99.0));
        let engine = engine_with(slow.clone(), history_with_days(14));
        engine.register_provider(other);

        let in_flight = tokio::spawn({
            let engine = engine.clone();
            async move { engine.predict(&subject(), 3).await }
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        engine.set_active_provider("other").unwrap();

        let points = in_flight.await.unwrap().unwrap();
        assert_eq!(points[0].p50, 10.0);
        assert_eq!(engine.active_provider(), "other");
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_call_still_populates_cache() {
        let slow = Arc::new(CountingProvider::new("slow", 10.0).with_delay(Duration::from_secs(5)));
        let engine = engine_with(slow.clone(), history_with_days(14));

        let abandoned =
            tokio::time::timeout(Duration::from_secs(1), engine.predict(&subject(), 3)).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_secs(10)).await;

        let points = engine.predict(&subject(), 3).await.unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(slow.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_failures_are_misses() {
        let provider = Arc::new(CountingProvider::new("counting", 50.0));
        let engine = ForecastEngine::new(
            provider.clone(),
            history_with_days(14),
            Arc::new(FailingCache),
            EngineSettings::default(),
        );

        engine.predict(&subject(), 2).await.unwrap();
        engine.predict(&subject(), 2).await.unwrap();

        assert_eq!(provider.calls(), 2);
        assert!(!engine.invalidate(&subject(), 2).await);
        engine.flush_cache().await;
    }

    #[tokio::test]
    async fn test_invalidate_and_flush() {
        let provider = Arc::new(CountingProvider::new("counting", 50.0));
        let engine = engine_with(provider.clone(), history_with_days(14));

        engine.predict(&subject(), 2).await.unwrap();
        assert!(engine.invalidate(&subject(), 2).await);
        engine.predict(&subject(), 2).await.unwrap();
        assert_eq!(provider.calls(), 2);

        engine.flush_cache().await;
        engine.predict(&subject(), 2).await.unwrap();
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_predict_report() {
        let provider = Arc::new(CountingProvider::new("counting", 50.0));
        let engine = engine_with(provider, history_with_days(14));

        let report = engine.predict_report(&subject(), 5).await.unwrap();

        assert_eq!(report.subject_id, subject());
        assert_eq!(report.provider, "counting");
        assert_eq!(report.horizon_days, 5);
        assert_eq!(report.data_points, 5);
        assert_eq!(report.points.len(), 5);

        let request = ForecastRequest::with_default_horizon(subject());
        let report = engine.handle_request(&request).await.unwrap();
        assert_eq!(report.horizon_days, 14);
    }

    #[tokio::test]
    async fn test_cached_report_names_producing_provider() {
        let first = Arc::new(CountingProvider::new("first", 10.0));
        let second = Arc::new(CountingProvider::new("second", 20.0));
        let engine = engine_with(first.clone(), history_with_days(14));
        engine.register_provider(second.clone());

        engine.predict(&subject(), 7).await.unwrap();
        engine.set_active_provider("second").unwrap();

        let report = engine.predict_report(&subject(), 7).await.unwrap();
        assert_eq!(report.provider, "first");
        assert_eq!(report.points.len(), 7);
        assert_eq!(second.calls(), 0);

        let report = engine.predict_report(&subject(), 3).await.unwrap();
        assert_eq!(report.provider, "second");
        assert_eq!(second.calls(), 1);
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = PriceCastConfig::default();
        let engine = ForecastEngine::from_config(
            &config,
            history_with_days(14),
            Arc::new(InMemoryPredictionCache::default()),
        )
        .unwrap();

        assert_eq!(engine.available_providers(), vec!["baseline", "remote"]);
        assert_eq!(engine.active_provider(), "baseline");
        assert_eq!(engine.settings().cache_ttl, Duration::from_secs(300));

        let mut config = PriceCastConfig::default();
        config.prediction.provider = "remote".to_string();
        config.prediction.remote.enabled = false;
        let err = ForecastEngine::from_config(
            &config,
            history_with_days(14),
            Arc::new(InMemoryPredictionCache::default()),
        )
        .unwrap_err();
        assert_matches!(err, PredictionError::ProviderNotFound(id) if id == "remote");
    }

    #[tokio::test]
    async fn test_baseline_end_to_end() {
        let baseline =
            BaselineProvider::new().with_random_source(Arc::new(SeededSource(3)));
        let engine = ForecastEngine::new(
            Arc::new(baseline),
            history_with_days(14),
            Arc::new(InMemoryPredictionCache::default()),
            EngineSettings::default(),
        );

        let points = engine.predict(&subject(), 7).await.unwrap();

        let p50: Vec<f64> = points.iter().map(|p| p.p50).collect();
        assert_eq!(p50, vec![112.5, 113.5, 114.5, 115.5, 116.5, 117.5, 118.5]);
        assert!(points.iter().all(|p| p.p10 <= p.p90));
        assert_eq!(points[0].date, day(14));
    }
}
