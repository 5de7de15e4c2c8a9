//! PriceCast forecast engine
//!
//! Turns irregular price observations into horizon-based forecasts with
//! p10/p50/p90 bands.
//!
//! # Architecture
//!
//! ```text
//! HistorySource ──> daily_average ──> ForecastProvider ──> PredictionCache
//!                                      ├─ BaselineProvider
//!                                      └─ RemoteProvider ──(failure)──> BaselineProvider
//! ```
//!
//! [`ForecastEngine`] owns the provider registry and the active-provider
//! selection; providers are stateless and shared across concurrent calls.

pub mod aggregate;
pub mod cache;
pub mod clients;
pub mod engine;
pub mod error;
pub mod history;
pub mod metrics;
pub mod providers;
pub mod stats;

pub use cache::{
    create_cache, prediction_key, CachedForecast, InMemoryPredictionCache, PredictionCache,
};
pub use engine::{EngineSettings, ForecastEngine};
pub use error::PredictionError;
pub use history::{HistorySource, InMemoryHistory};
pub use metrics::MetricsSnapshot;
pub use providers::{BaselineProvider, ForecastProvider, RandomSource, RemoteProvider};

/// Result type for forecasting operations
pub type Result<T> = std::result::Result<T, PredictionError>;
