use clap::Parser;
use india_climate_core::{find_config_file, load_config, ConfigSource, DEFAULT_DATASET_PATH};
use slog::{o, Drain, Level, Logger};
use std::{env, path::PathBuf};

/// Rows per Parquet row group unless configured otherwise
pub const DEFAULT_BATCH_SIZE: usize = 50_000;

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Dataset preparer - Converts the raw daily weather CSV into the almanac snapshot"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $INDIA_CLIMATE_PREPARER_CONFIG, ./preparer.toml,
    /// $XDG_CONFIG_HOME/india-climate/preparer.toml, /etc/india-climate/preparer.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "INDIA_CLIMATE_PREPARER_LEVEL")]
    pub level: Option<String>,

    /// Raw CSV extract with at least the snapshot columns
    #[arg(short, long, env = "INDIA_CLIMATE_PREPARER_INPUT")]
    pub input: Option<String>,

    /// Where to write the Parquet snapshot
    #[arg(short, long, env = "INDIA_CLIMATE_PREPARER_OUTPUT")]
    pub output: Option<String>,

    /// Rows per Parquet row group
    #[arg(short, long, env = "INDIA_CLIMATE_PREPARER_BATCH_SIZE")]
    pub batch_size: Option<usize>,
}

impl Cli {
    pub fn input(&self) -> PathBuf {
        self.input
            .clone()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./india_2000_2024_daily_weather.csv"))
    }

    pub fn output(&self) -> PathBuf {
        self.output
            .clone()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH))
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_BATCH_SIZE)
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Cli {
    let cli_args = Cli::parse();

    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("INDIA_CLIMATE_PREPARER_CONFIG", "preparer.toml")
    };

    let file_config: Cli = load_config(&source).unwrap_or_default();

    // CLI args override file config (env vars are handled by clap)
    Cli {
        config: cli_args.config,
        level: cli_args.level.or(file_config.level),
        input: cli_args.input.or(file_config.input),
        output: cli_args.output.or(file_config.output),
        batch_size: cli_args.batch_size.or(file_config.batch_size),
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "info" => Level::Info,
        "warn" => Level::Warning,
        "error" => Level::Error,
        _ => Level::Info,
    }
}

pub fn setup_logger(cli: &Cli) -> Logger {
    let log_level = match cli.level.as_ref() {
        Some(level) => parse_level(level),
        None => parse_level(&env::var("RUST_LOG").unwrap_or_default()),
    };

    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = drain.filter_level(log_level).fuse();
    slog::Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}
