use crate::PriceCastConfig;
use anyhow::Result;
use regex::Regex;
use std::env;
use tracing::{debug, warn};

const ENV_VAR_PATTERN: &str = r"\$\{(\w+)\}|\$(\w+)";

/// Substitute environment variables in the format ${VAR_NAME} or $VAR_NAME
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(ENV_VAR_PATTERN)?;
    let mut result = content.to_string();
    let mut missing_vars = Vec::new();

    for caps in re.captures_iter(content) {
        let (Some(var), Some(placeholder)) = (caps.get(1).or(caps.get(2)), caps.get(0)) else {
            continue;
        };
        let var_name = var.as_str();

        match env::var(var_name) {
            Ok(value) => {
                debug!("Substituting environment variable: {} = \"{}\"", var_name, value);
                result = result.replace(placeholder.as_str(), &value);
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
                // Placeholder is kept, the validator reports it
                missing_vars.push(var_name.to_string());
            }
        }
    }

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (may use defaults or fail validation): {:?}",
            missing_vars
        );
    }

    Ok(result)
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    Regex::new(ENV_VAR_PATTERN)
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}

/// Apply the process environment on top of a parsed configuration
///
/// * `PREDICTOR_PROVIDER` - active provider id
/// * `ML_SERVICE_URL` - remote forecaster base URL
/// * `CACHE_TTL` - prediction cache TTL in seconds
/// * `LOG_FORMAT` - pretty, json or compact
pub fn apply_env_overrides(config: &mut PriceCastConfig) {
    apply_overrides_from(config, |name| env::var(name).ok());
}

/// Apply overrides from an arbitrary variable lookup
pub fn apply_overrides_from<F>(config: &mut PriceCastConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(provider) = lookup("PREDICTOR_PROVIDER") {
        debug!(provider = %provider, "Overriding prediction provider from environment");
        config.prediction.provider = provider;
    }

    if let Some(url) = lookup("ML_SERVICE_URL") {
        debug!(url = %url, "Overriding remote forecaster URL from environment");
        config.prediction.remote.url = url;
    }

    if let Some(ttl) = lookup("CACHE_TTL") {
        match ttl.parse::<u64>() {
            Ok(seconds) => config.cache.ttl_seconds = seconds,
            Err(_) => warn!(value = %ttl, "Ignoring non-numeric CACHE_TTL"),
        }
    }

    if let Some(format) = lookup("LOG_FORMAT") {
        config.logging.format = format;
    }
}
