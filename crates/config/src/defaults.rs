pub fn default_enabled() -> bool {
    true
}

pub fn default_service_name() -> String {
    "pricecast".to_string()
}

pub fn default_provider() -> String {
    crate::BASELINE_PROVIDER.to_string()
}

pub fn default_min_history_points() -> usize {
    10
}

pub fn default_max_history_points() -> usize {
    90
}

pub fn default_horizon_days() -> u32 {
    14
}

pub fn default_max_horizon_days() -> u32 {
    90
}

pub fn default_bootstrap_samples() -> usize {
    1000
}

pub fn default_max_window() -> usize {
    7
}

pub fn default_remote_url() -> String {
    "http://ml:8080".to_string()
}

pub fn default_remote_timeout_seconds() -> u64 {
    30
}

pub fn default_cache_backend() -> String {
    "memory".to_string()
}

pub fn default_ttl_seconds() -> u64 {
    300
}

pub fn default_max_entries() -> u64 {
    10000
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_metrics_port() -> u16 {
    9090
}
