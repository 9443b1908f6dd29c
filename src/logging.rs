use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use directories::BaseDirs;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, APP_NAME};

/// Environment variable that overrides `[log] level`.
pub const LOG_ENV: &str = "FETCHLIST_LOG";

pub enum LogTarget {
    Stderr,
    /// The browser owns the terminal, so its logs go to a file.
    File,
}

fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"))
    })
}

pub fn log_file_path() -> Result<PathBuf> {
    let base = BaseDirs::new().context("unable to determine cache directory")?;
    let dir = base.cache_dir().join(APP_NAME);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log dir: {}", dir.display()))?;
    Ok(dir.join(format!("{APP_NAME}.log")))
}

pub fn init(config: &Config, target: LogTarget) -> Result<()> {
    let filter = env_filter(config);
    // try_init: a subscriber may already be installed (tests)
    match target {
        LogTarget::Stderr => {
            let _ = fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogTarget::File => {
            let path = log_file_path()?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let _ = fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
    }

    for message in &config.warnings {
        warn!("{message}");
    }
    Ok(())
}
