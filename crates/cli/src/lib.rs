use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pricecast")]
#[command(about = "PriceCast - price forecasting with p10/p50/p90 bands")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Forecast prices for one subject from a history file
    Forecast {
        /// Path to the configuration file (defaults apply when omitted)
        #[arg(short, long, env = "PRICECAST_CONFIG")]
        config: Option<PathBuf>,

        /// JSON file mapping subject ids to price observations
        #[arg(long)]
        history: PathBuf,

        /// Subject to forecast
        #[arg(short, long)]
        subject: String,

        /// Days to forecast (1-90), configured default when omitted
        #[arg(long)]
        horizon: Option<u32>,

        /// Override the active provider
        #[arg(short, long)]
        provider: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// List registered providers and the active one
    Providers {
        /// Path to the configuration file (defaults apply when omitted)
        #[arg(short, long, env = "PRICECAST_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Validate configuration
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "pricecast.yaml")]
        config: PathBuf,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "pricecast.yaml")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Full prediction report as JSON
    Json,

    /// One line per forecast day
    Table,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
