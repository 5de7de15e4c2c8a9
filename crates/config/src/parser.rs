use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Load configuration from a YAML file
///
/// `${VAR}` placeholders are substituted before parsing and the
/// well-known environment overrides are applied afterwards.
#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PriceCastConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    let mut config = parse_config(&content)?;
    apply_env_overrides(&mut config);

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Parse configuration from YAML text after environment substitution
pub fn parse_config(content: &str) -> Result<PriceCastConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    let config: PriceCastConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    Ok(config)
}

#[instrument]
pub fn generate_default_config() -> PriceCastConfig {
    PriceCastConfig {
        service: ServiceConfig::default(),
        prediction: PredictionConfig {
            provider: BASELINE_PROVIDER.to_string(),
            remote: RemoteConfig {
                enabled: true,
                url: default_remote_url(),
                timeout_seconds: default_remote_timeout_seconds(),
            },
            ..PredictionConfig::default()
        },
        cache: CacheConfig::default(),
        logging: LoggingConfig::default(),
        metrics: MetricsConfig::default(),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(
    config: &PriceCastConfig,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}
