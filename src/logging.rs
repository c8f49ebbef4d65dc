//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! The terminal belongs to the TUI, so logs only go to a file. Without a log
//! file no subscriber is installed and every `tracing` macro is a no-op.
//!
//! # Log Levels
//!
//! - `warn`: failed store operations
//! - `info`: user-visible operations (fetch, add, delete, undo, clear)
//! - `debug`: repository calls, applied search queries, rejected input
//! - `trace`: store mutations

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Context, Result};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    /// Include the module path in each line.
    pub with_target: bool,
    /// Destination file; logging is disabled when `None`.
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            with_target: false,
            log_file: None,
        }
    }
}

impl LogConfig {
    /// - 0: info
    /// - 1 (`-v`): debug
    /// - 2+ (`-vv`): trace
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    #[must_use]
    pub fn with_target(mut self, enable: bool) -> Self {
        self.with_target = enable;
        self
    }
}

/// Install the global subscriber. Returns `Ok(false)` when logging stays off.
///
/// # Errors
///
/// Fails when the log file cannot be opened or a subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<bool> {
    let Some(path) = &config.log_file else {
        return Ok(false);
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;

    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(config.with_target);

    tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .try_init()
        .with_ctx(|| "install tracing subscriber".to_string())?;
    Ok(true)
}

/// `RUST_LOG` wins over the configured level.
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}
