use crate::*;
use thiserror::Error;
use url::Url;

/// Cache TTLs above this are reported as a warning
const MAX_RECOMMENDED_TTL_SECONDS: u64 = 3600;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unknown prediction provider: {0}. Must be one of: baseline, remote")]
    UnknownProvider(String),

    #[error("Active provider is 'remote' but prediction.remote.enabled is false")]
    RemoteProviderDisabled,

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        min: u64,
        max: u64,
        value: u64,
    },

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("max_history_points ({max}) must not be smaller than min_history_points ({min})")]
    HistoryWindowTooSmall { min: usize, max: usize },

    #[error("Remote forecaster: {message}")]
    InvalidRemote { message: String },

    #[error("Cache: {message}")]
    InvalidCache { message: String },

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("Environment variable '{var}' is missing or invalid: {message}")]
    InvalidEnvVar { var: String, message: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &PriceCastConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_prediction(&config.prediction, &mut report);
    validate_cache_config(&config.cache, &mut report);
    validate_logging(&config.logging, &mut report);

    report
}

fn validate_prediction(prediction: &PredictionConfig, report: &mut ValidationReport) {
    if !KNOWN_PROVIDERS.contains(&prediction.provider.as_str()) {
        if has_unresolved_env_vars(&prediction.provider) {
            report.add_error(ValidationError::InvalidEnvVar {
                var: "PREDICTOR_PROVIDER".to_string(),
                message: "prediction provider placeholder was not resolved".to_string(),
            });
        } else {
            report.add_error(ValidationError::UnknownProvider(prediction.provider.clone()));
        }
    }

    if prediction.provider == REMOTE_PROVIDER && !prediction.remote.enabled {
        report.add_error(ValidationError::RemoteProviderDisabled);
    }

    let max_horizon = u64::from(common::MAX_HORIZON_DAYS);
    if !(1..=max_horizon).contains(&u64::from(prediction.max_horizon_days)) {
        report.add_error(ValidationError::OutOfRange {
            field: "prediction.max_horizon_days".to_string(),
            min: 1,
            max: max_horizon,
            value: u64::from(prediction.max_horizon_days),
        });
    }

    if prediction.default_horizon_days == 0
        || prediction.default_horizon_days > prediction.max_horizon_days
    {
        report.add_error(ValidationError::OutOfRange {
            field: "prediction.default_horizon_days".to_string(),
            min: 1,
            max: u64::from(prediction.max_horizon_days),
            value: u64::from(prediction.default_horizon_days),
        });
    }

    if prediction.min_history_points < 2 {
        report.add_error(ValidationError::OutOfRange {
            field: "prediction.min_history_points".to_string(),
            min: 2,
            max: prediction.max_history_points as u64,
            value: prediction.min_history_points as u64,
        });
    } else if prediction.min_history_points != default_min_history_points() {
        report.add_warning(
            "prediction.min_history_points",
            "Providers still require at least 10 points regardless of this setting",
        );
    }

    if prediction.max_history_points < prediction.min_history_points {
        report.add_error(ValidationError::HistoryWindowTooSmall {
            min: prediction.min_history_points,
            max: prediction.max_history_points,
        });
    }

    if prediction.baseline.bootstrap_samples == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "prediction.baseline.bootstrap_samples".to_string(),
        });
    }

    if prediction.baseline.max_window == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "prediction.baseline.max_window".to_string(),
        });
    }

    if prediction.baseline.clamp_median {
        report.add_warning(
            "prediction.baseline.clamp_median",
            "p50 will be clamped into [p10, p90]; forecasts differ from the unclamped baseline",
        );
    }

    if prediction.baseline.seed.is_none() {
        report.add_default("prediction.baseline.seed", "entropy");
    }

    if prediction.remote.enabled {
        validate_remote(&prediction.remote, report);
    }
}

fn validate_remote(remote: &RemoteConfig, report: &mut ValidationReport) {
    if remote.url.is_empty() || has_unresolved_env_vars(&remote.url) {
        report.add_error(ValidationError::InvalidEnvVar {
            var: "ML_SERVICE_URL".to_string(),
            message: "remote forecaster url is missing or invalid".to_string(),
        });
    } else {
        match Url::parse(&remote.url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => report.add_error(ValidationError::InvalidRemote {
                message: format!("unsupported url scheme '{}'", url.scheme()),
            }),
            Err(e) => report.add_error(ValidationError::InvalidRemote {
                message: format!("invalid url '{}': {}", remote.url, e),
            }),
        }
    }

    if remote.timeout_seconds == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "prediction.remote.timeout_seconds".to_string(),
        });
    }
}

fn validate_cache_config(cache: &CacheConfig, report: &mut ValidationReport) {
    if !cache.enabled {
        report.add_warning(
            "cache.enabled",
            "Prediction cache is disabled; every request recomputes",
        );
        return;
    }

    let backend = cache.backend.to_lowercase();
    if !KNOWN_CACHE_BACKENDS.contains(&backend.as_str()) {
        report.add_error(ValidationError::InvalidCache {
            message: format!("unknown backend '{}', must be one of: memory, redis", cache.backend),
        });
    } else if backend == "redis" {
        match cache.redis_url.as_deref() {
            None | Some("") => report.add_error(ValidationError::InvalidCache {
                message: "redis backend requires redis_url".to_string(),
            }),
            Some(url) if has_unresolved_env_vars(url) => {
                report.add_error(ValidationError::InvalidEnvVar {
                    var: "cache.redis_url".to_string(),
                    message: "redis url placeholder was not resolved".to_string(),
                })
            }
            Some(_) => {}
        }
    }

    if cache.ttl_seconds == 0 {
        report.add_error(ValidationError::InvalidCache {
            message: "ttl_seconds must be a positive integer".to_string(),
        });
    } else if cache.ttl_seconds > MAX_RECOMMENDED_TTL_SECONDS {
        report.add_warning(
            "cache.ttl_seconds",
            "Predictions cached for more than an hour may be stale",
        );
    }

    if cache.max_entries == 0 {
        report.add_error(ValidationError::InvalidCache {
            message: "max_entries must be a positive integer".to_string(),
        });
    }
}

fn validate_logging(logging: &LoggingConfig, report: &mut ValidationReport) {
    let valid_formats = ["pretty", "json", "compact"];
    if !valid_formats.contains(&logging.format.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(logging.format.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let report = validate_config(&PriceCastConfig::default());
        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
        assert_eq!(report.defaults_applied.len(), 1);
    }

    #[test]
    fn test_unknown_provider() {
        let mut config = PriceCastConfig::default();
        config.prediction.provider = "tfjs".to_string();

        let report = validate_config(&config);
        assert!(report
            .errors
            .contains(&ValidationError::UnknownProvider("tfjs".to_string())));
    }

    #[test]
    fn test_remote_provider_requires_remote_enabled() {
        let mut config = PriceCastConfig::default();
        config.prediction.provider = REMOTE_PROVIDER.to_string();
        config.prediction.remote.enabled = false;

        let report = validate_config(&config);
        assert!(report.errors.contains(&ValidationError::RemoteProviderDisabled));
    }

    #[test]
    fn test_explicit_seed_is_not_a_default() {
        let mut config = PriceCastConfig::default();
        config.prediction.baseline.seed = Some(42);

        let report = validate_config(&config);
        assert!(report.is_valid());
        assert!(report.defaults_applied.is_empty());
    }

    #[test]
    fn test_unresolved_remote_url() {
        let mut config = generate_default_config();
        config.prediction.remote.url = "${ML_SERVICE_URL}".to_string();
        let report = validate_config(&config);

        assert!(!report.is_valid());
        assert!(matches!(
            &report.errors[0],
            ValidationError::InvalidEnvVar { var, .. } if var == "ML_SERVICE_URL"
        ));
    }

    #[test]
    fn test_invalid_remote_scheme() {
        let mut config = PriceCastConfig::default();
        config.prediction.remote.url = "ftp://ml:21".to_string();

        let report = validate_config(&config);
        assert!(matches!(&report.errors[..], [ValidationError::InvalidRemote { .. }]));
    }

    #[test]
    fn test_horizon_bounds() {
        let mut config = PriceCastConfig::default();
        config.prediction.max_horizon_days = 120;
        config.prediction.default_horizon_days = 0;

        let report = validate_config(&config);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_history_window() {
        let mut config = PriceCastConfig::default();
        config.prediction.max_history_points = 5;

        let report = validate_config(&config);
        assert!(report.errors.contains(&ValidationError::HistoryWindowTooSmall {
            min: 10,
            max: 5
        }));
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = PriceCastConfig::default();
        config.prediction.baseline.bootstrap_samples = 0;
        config.prediction.baseline.max_window = 0;
        config.prediction.remote.timeout_seconds = 0;
        config.cache.ttl_seconds = 0;

        let report = validate_config(&config);
        assert_eq!(report.errors.len(), 4);
    }

    #[test]
    fn test_warnings() {
        let mut config = PriceCastConfig::default();
        config.cache.ttl_seconds = 7200;
        config.prediction.baseline.clamp_median = true;

        let report = validate_config(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_cache_backend() {
        let mut config = PriceCastConfig::default();
        config.cache.backend = "memcached".to_string();
        let report = validate_config(&config);
        assert!(matches!(&report.errors[..], [ValidationError::InvalidCache { .. }]));

        config.cache.backend = "redis".to_string();
        let report = validate_config(&config);
        assert!(matches!(&report.errors[..], [ValidationError::InvalidCache { .. }]));

        config.cache.redis_url = Some("redis://localhost:6379".to_string());
        assert!(validate_config(&config).is_valid());
    }

    #[test]
    fn test_invalid_log_format() {
        let mut config = PriceCastConfig::default();
        config.logging.format = "xml".to_string();

        let report = validate_config(&config);
        assert!(report
            .errors
            .contains(&ValidationError::InvalidLogFormat("xml".to_string())));
    }
}
