use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Provider id of the deterministic moving-average baseline
pub const BASELINE_PROVIDER: &str = "baseline";

/// Provider id of the external forecasting service
pub const REMOTE_PROVIDER: &str = "remote";

/// Every provider id the engine knows how to build from configuration
pub const KNOWN_PROVIDERS: [&str; 2] = [BASELINE_PROVIDER, REMOTE_PROVIDER];

/// Prediction cache backends
pub const KNOWN_CACHE_BACKENDS: [&str; 2] = ["memory", "redis"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
        }
    }
}

// ==================================================================================
// PREDICTION CONFIG
// ==================================================================================

/// Forecasting engine configuration
///
/// Example YAML:
/// ```yaml
/// prediction:
///   provider: baseline
///   min_history_points: 10
///   max_history_points: 90
///   default_horizon_days: 14
///   max_horizon_days: 90
///   baseline:
///     bootstrap_samples: 1000
///     max_window: 7
///   remote:
///     enabled: true
///     url: http://ml:8080
///     timeout_seconds: 30
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictionConfig {
    /// Active provider at startup
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(rename = "min_history_points")]
    #[serde(default = "default_min_history_points")]
    pub min_history_points: usize,
    /// Raw observations retained before daily aggregation
    #[serde(rename = "max_history_points")]
    #[serde(default = "default_max_history_points")]
    pub max_history_points: usize,
    #[serde(rename = "default_horizon_days")]
    #[serde(default = "default_horizon_days")]
    pub default_horizon_days: u32,
    #[serde(rename = "max_horizon_days")]
    #[serde(default = "default_max_horizon_days")]
    pub max_horizon_days: u32,
    #[serde(default)]
    pub baseline: BaselineConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            min_history_points: default_min_history_points(),
            max_history_points: default_max_history_points(),
            default_horizon_days: default_horizon_days(),
            max_horizon_days: default_max_horizon_days(),
            baseline: BaselineConfig::default(),
            remote: RemoteConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BaselineConfig {
    /// Residual draws per forecast day
    #[serde(rename = "bootstrap_samples")]
    #[serde(default = "default_bootstrap_samples")]
    pub bootstrap_samples: usize,
    /// Upper bound of the smoothing window
    #[serde(rename = "max_window")]
    #[serde(default = "default_max_window")]
    pub max_window: usize,
    /// Clamp p50 into [p10, p90]
    #[serde(rename = "clamp_median")]
    #[serde(default)]
    pub clamp_median: bool,
    /// Fixed seed for the bootstrap, entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            bootstrap_samples: default_bootstrap_samples(),
            max_window: default_max_window(),
            clamp_median: false,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_remote_url")]
    pub url: String,
    #[serde(rename = "timeout_seconds")]
    #[serde(default = "default_remote_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            url: default_remote_url(),
            timeout_seconds: default_remote_timeout_seconds(),
        }
    }
}

// ==================================================================================
// CACHE / LOGGING / METRICS
// ==================================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// memory or redis
    #[serde(default = "default_cache_backend")]
    pub backend: String,
    /// Connection string for the redis backend
    #[serde(rename = "redis_url")]
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(rename = "ttl_seconds")]
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    #[serde(rename = "max_entries")]
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            backend: default_cache_backend(),
            redis_url: None,
            ttl_seconds: default_ttl_seconds(),
            max_entries: default_max_entries(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// pretty, json or compact
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

// ==================================================================================
// ROOT
// ==================================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PriceCastConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}
