//! PriceCast CLI Binary
//!
//! This is the main entry point for the PriceCast application. It wires
//! configuration, logging, metrics and the forecast engine together and
//! runs one command.

use anyhow::{Context, Result};
use cli::{Cli, Commands, OutputFormat};
use common::{ForecastRequest, HistoricalPoint, PredictionReport, SubjectId};
use config::{
    generate_default_config, load_config, save_config, validate_config, PriceCastConfig,
};
use forecast_engine::{create_cache, ForecastEngine, InMemoryHistory};
use observability::{init_logging, init_metrics, LogFormat};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Forecast {
            config,
            history,
            subject,
            horizon,
            provider,
            format,
        } => {
            let config = prepare(config.as_deref())?;
            info!("Executing 'forecast' command");
            forecast_command(&config, &history, subject, horizon, provider, format).await
        }
        Commands::Providers { config } => {
            let config = prepare(config.as_deref())?;
            info!("Executing 'providers' command");
            providers_command(&config).await
        }
        Commands::Validate { config } => {
            init_logging("pricecast", LogFormat::Pretty, "info")?;
            info!("Executing 'validate' command");
            validate_command(config).await
        }
        Commands::Init { output } => {
            init_logging("pricecast", LogFormat::Pretty, "info")?;
            info!("Executing 'init' command");
            init_command(output).await
        }
    }
}

/// Load and validate configuration, then start logging and metrics from it
fn prepare(config_path: Option<&Path>) -> Result<PriceCastConfig> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => {
            let mut config = PriceCastConfig::default();
            config::apply_env_overrides(&mut config);
            config
        }
    };

    let format = LogFormat::parse(&config.logging.format).unwrap_or_default();
    init_logging(&config.service.name, format, &config.logging.level)?;
    debug!(?config_path, "Configuration prepared");

    let report = validate_config(&config);
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }
    if !report.is_valid() {
        error!(error_count = report.errors.len(), "Configuration validation failed");
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot run due to configuration errors");
    }

    if config.metrics.enabled {
        init_metrics(config.metrics.port)?;
    }

    Ok(config)
}

/// Read a JSON object mapping subject ids to price observations
fn load_history(path: &Path) -> Result<InMemoryHistory> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file: {:?}", path))?;
    let subjects: HashMap<SubjectId, Vec<HistoricalPoint>> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse history file: {:?}", path))?;

    let history = InMemoryHistory::new();
    for (subject_id, points) in subjects {
        history.extend(subject_id, points);
    }

    info!(subjects = history.subjects().len(), "History loaded");
    Ok(history)
}

async fn build_engine(
    config: &PriceCastConfig,
    history: InMemoryHistory,
) -> Result<ForecastEngine> {
    let cache = create_cache(&config.cache)
        .await
        .context("Failed to create prediction cache")?;

    ForecastEngine::from_config(config, Arc::new(history), cache)
        .context("Failed to build forecast engine")
}

async fn forecast_command(
    config: &PriceCastConfig,
    history_path: &Path,
    subject: String,
    horizon: Option<u32>,
    provider: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let history = load_history(history_path)?;
    let engine = build_engine(config, history).await?;

    if let Some(provider) = provider {
        engine.set_active_provider(&provider)?;
    }

    let horizon = horizon.unwrap_or(engine.settings().default_horizon_days);
    let request = ForecastRequest::new(subject, horizon);
    debug!(subject = %request.subject_id, horizon, format = format.as_str(), "Forecasting");

    let report = engine.handle_request(&request).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_table(&report),
    }

    Ok(())
}

fn print_table(report: &PredictionReport) {
    println!(
        "Forecast for {} ({} days, provider: {})",
        report.subject_id, report.horizon_days, report.provider
    );
    println!();
    println!("{:<12} {:>12} {:>12} {:>12}", "date", "p10", "p50", "p90");
    for point in &report.points {
        println!(
            "{:<12} {:>12.2} {:>12.2} {:>12.2}",
            point.date.format("%Y-%m-%d"),
            point.p10,
            point.p50,
            point.p90
        );
    }
}

async fn providers_command(config: &PriceCastConfig) -> Result<()> {
    let engine = build_engine(config, InMemoryHistory::new()).await?;
    let active = engine.active_provider();

    println!("Available providers:");
    for id in engine.available_providers() {
        let marker = if id == active { "*" } else { " " };
        println!("  {} {}", marker, id);
    }

    Ok(())
}

async fn validate_command(config_path: PathBuf) -> Result<()> {
    info!(path = ?config_path, "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Service: {}", config.service.name);
    println!("Provider: {}", config.prediction.provider);
    println!(
        "Remote forecaster: {}",
        if config.prediction.remote.enabled {
            config.prediction.remote.url.as_str()
        } else {
            "disabled"
        }
    );
    println!(
        "Cache: {}",
        if config.cache.enabled {
            format!("{} (ttl {}s)", config.cache.backend, config.cache.ttl_seconds)
        } else {
            "disabled".to_string()
        }
    );

    Ok(())
}

async fn init_command(output_path: PathBuf) -> Result<()> {
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    save_config(&config, &output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Point prediction.remote.url (or ML_SERVICE_URL) at the remote forecaster");
    println!(
        "  2. Run 'pricecast validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'pricecast forecast --config {:?} --history prices.json --subject <id>'",
        output_path
    );

    Ok(())
}
