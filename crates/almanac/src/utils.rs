use anyhow::anyhow;
use clap::Parser;
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use india_climate_core::{
    find_config_file, load_config, ConfigSource, DEFAULT_ALMANAC_PORT, DEFAULT_DATASET_PATH,
};
use log::LevelFilter;
use std::{env, path::PathBuf};
use time::{format_description::well_known::Iso8601, OffsetDateTime};

use crate::{
    SummaryConfig, DEFAULT_SUMMARY_BASE_URL, DEFAULT_SUMMARY_MODEL, DEFAULT_SUMMARY_TIMEOUT_SECS,
};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Almanac - Historical climate statistics for Indian cities"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $INDIA_CLIMATE_CONFIG, ./almanac.toml,
    /// $XDG_CONFIG_HOME/india-climate/almanac.toml, /etc/india-climate/almanac.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "INDIA_CLIMATE_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(long, env = "INDIA_CLIMATE_HOST")]
    #[serde(alias = "domain")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "INDIA_CLIMATE_PORT")]
    pub port: Option<u16>,

    /// Parquet snapshot written by the preparer
    #[arg(short, long, env = "INDIA_CLIMATE_DATASET")]
    #[serde(alias = "dataset_path")]
    pub dataset: Option<String>,

    /// API key for the text-generation service
    #[arg(long, env = "INDIA_CLIMATE_SUMMARY_API_KEY", hide_env_values = true)]
    pub summary_api_key: Option<String>,

    /// Text-generation model used for summaries
    #[arg(long, env = "INDIA_CLIMATE_SUMMARY_MODEL")]
    pub summary_model: Option<String>,

    /// Base URL of the text-generation API
    #[arg(long, env = "INDIA_CLIMATE_SUMMARY_BASE_URL")]
    pub summary_base_url: Option<String>,

    /// Seconds to wait for a summary before giving up
    #[arg(long, env = "INDIA_CLIMATE_SUMMARY_TIMEOUT_SECS")]
    pub summary_timeout_secs: Option<u64>,
}

impl Cli {
    /// Get the effective configuration value with defaults
    pub fn host(&self) -> String {
        self.host.clone().unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_ALMANAC_PORT)
    }

    pub fn dataset(&self) -> PathBuf {
        PathBuf::from(
            self.dataset
                .clone()
                .unwrap_or_else(|| DEFAULT_DATASET_PATH.to_string()),
        )
    }

    /// The summarizer cannot run without an API key, so a missing key is an error.
    pub fn summary_config(&self) -> anyhow::Result<SummaryConfig> {
        let api_key = self
            .summary_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!("missing summary API key, set --summary-api-key or INDIA_CLIMATE_SUMMARY_API_KEY")
            })?;

        Ok(SummaryConfig {
            api_key,
            model: self
                .summary_model
                .clone()
                .unwrap_or_else(|| DEFAULT_SUMMARY_MODEL.to_string()),
            base_url: self
                .summary_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_SUMMARY_BASE_URL.to_string()),
            timeout_secs: self
                .summary_timeout_secs
                .unwrap_or(DEFAULT_SUMMARY_TIMEOUT_SECS),
        })
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Cli {
    let cli_args = Cli::parse();

    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("INDIA_CLIMATE_CONFIG", "almanac.toml")
    };

    // the logger is not set up yet, so this goes straight to stdout
    if let Some(path) = source.path() {
        println!("Loading config from: {}", path.display());
    }

    let file_config: Cli = load_config(&source).unwrap_or_default();

    // CLI args override file config (env vars are handled by clap)
    Cli {
        config: cli_args.config,
        level: cli_args.level.or(file_config.level),
        host: cli_args.host.or(file_config.host),
        port: cli_args.port.or(file_config.port),
        dataset: cli_args.dataset.or(file_config.dataset),
        summary_api_key: cli_args.summary_api_key.or(file_config.summary_api_key),
        summary_model: cli_args.summary_model.or(file_config.summary_model),
        summary_base_url: cli_args.summary_base_url.or(file_config.summary_base_url),
        summary_timeout_secs: cli_args
            .summary_timeout_secs
            .or(file_config.summary_timeout_secs),
    }
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_default();
            out.finish(format_args!(
                "[{} {}] {}: {}",
                timestamp,
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
