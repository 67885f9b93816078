//! Logging setup. The terminal belongs to the UI, so events go to a file
//! (`<data dir>/sqlspell/sqlspell.log` unless `--log-file` says otherwise).
//! `RUST_LOG` takes precedence over the `-v` level when set.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::store::json_store;

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub log_file: PathBuf,
}

impl LogConfig {
    /// 0 → info, 1 → debug, 2+ → trace.
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            log_file: default_log_file(),
        }
    }

    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.log_file = path;
        }
        self
    }
}

pub fn default_log_file() -> PathBuf {
    json_store::data_dir().join("sqlspell.log")
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Install the global subscriber. Call once, before the terminal is taken over.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    if let Some(parent) = config.log_file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("opening log file {}", config.log_file.display()))?;

    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(())
}
