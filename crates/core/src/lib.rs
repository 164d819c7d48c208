//! India Climate Core Library
//!
//! Shared utilities for the preparer and almanac services:
//! - Configuration loading (XDG-compliant)
//! - File system utilities
//! - Snapshot date encoding

mod config;
pub mod dates;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigSource};
pub use dates::{from_epoch_days, parse_date, to_epoch_days, DateError};
pub use fs::{create_dir_all, path_exists};

/// Application name used for XDG paths
pub const APP_NAME: &str = "india-climate";

/// Default almanac port
pub const DEFAULT_ALMANAC_PORT: u16 = 5000;

/// Snapshot file written by the preparer and read by the almanac
pub const DEFAULT_DATASET_PATH: &str = "./india_weather_database.parquet";

/// Columns kept in the snapshot, in file order
pub const SNAPSHOT_COLUMNS: [&str; 7] = [
    "city",
    "date",
    "temperature_2m_max",
    "temperature_2m_min",
    "precipitation_sum",
    "rain_sum",
    "wind_speed_10m_max",
];
