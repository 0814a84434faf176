//! ## Logging setup driven by environment variables.
//!
//! - `LOG_MODE`: `stdout` (default) or `file`
//! - `LOG_LEVEL`: `trace`, `debug`, `info` (default), `warn` or `error`
//! - `LOG_DATA_DIR`: directory for `watchgod.log` in file mode (default `./logs`)
//! - `LOG_MAX_SIZE`: bytes after which a new numbered file is started (default 1GiB)
//!
//! File mode rolls by UTC date and then by size:
//! `watchgod-2024-05-01.1.log`, `watchgod-2024-05-01.2.log`, ...

use chrono::Utc;
use eyre::{Result, WrapErr};
use log::info;
use simplelog::{Config, LevelFilter, SimpleLogger, WriteLogger};
use std::{
    env,
    fs::{create_dir_all, metadata, OpenOptions},
    path::Path,
};

pub const LOG_FILE_NAME: &str = "watchgod.log";
const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_MAX_SIZE: u64 = 1_073_741_824;

#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub to_file: bool,
    pub level: LevelFilter,
    pub dir: String,
    pub max_size: u64,
}

impl LogSettings {
    pub fn from_env() -> Result<Self> {
        let mode = env::var("LOG_MODE").unwrap_or_else(|_| "stdout".to_string());
        let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let max_size = match env::var("LOG_MAX_SIZE") {
            Ok(raw) => raw
                .parse::<u64>()
                .wrap_err_with(|| format!("LOG_MAX_SIZE must be a byte count, got {}", raw))?,
            Err(_) => DEFAULT_MAX_SIZE,
        };

        Ok(Self {
            to_file: mode.eq_ignore_ascii_case("file"),
            level: parse_level(&level),
            dir: env::var("LOG_DATA_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string()),
            max_size,
        })
    }

    /// Base log path inside the configured directory.
    pub fn base_file_path(&self) -> String {
        format!("{}/{}", self.dir.trim_end_matches('/'), LOG_FILE_NAME)
    }
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Path of the `index`-th log file for `date_str`.
pub fn compute_rolled_file_path(base_file_path: &str, date_str: &str, index: u32) -> String {
    let stem = base_file_path
        .strip_suffix(".log")
        .unwrap_or(base_file_path);
    format!("{}-{}.{}.log", stem, date_str, index)
}

/// First file for `date_str` that is missing or still under `max_size` bytes.
pub fn space_based_rolling(base_file_path: &str, date_str: &str, max_size: u64) -> String {
    let mut index = 1;
    loop {
        let candidate = compute_rolled_file_path(base_file_path, date_str, index);
        match metadata(&candidate) {
            Ok(meta) if meta.len() > max_size => index += 1,
            _ => return candidate,
        }
    }
}

/// Installs the global logger.
pub fn setup_logging() -> Result<()> {
    let settings = LogSettings::from_env()?;

    if settings.to_file {
        let date_str = Utc::now().format("%Y-%m-%d").to_string();
        let base_file_path = settings.base_file_path();
        let final_path = space_based_rolling(&base_file_path, &date_str, settings.max_size);

        if let Some(parent) = Path::new(&final_path).parent() {
            create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create log directory {:?}", parent))?;
        }

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&final_path)
            .wrap_err_with(|| format!("Unable to open log file {}", final_path))?;
        WriteLogger::init(settings.level, Config::default(), log_file)
            .wrap_err("Failed to initialize file logger")?;
        info!("Logging to file {}", final_path);
    } else {
        SimpleLogger::init(settings.level, Config::default())
            .wrap_err("Failed to initialize stdout logger")?;
    }

    info!("Logging configured at level {}", settings.level);
    Ok(())
}
