//! Logging setup.
//!
//! Logs always go to stderr or to `--log-file`, never stdout: stdout belongs
//! to `--print-config` and to backups written with `--output-file -`.

use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter};

use crate::models::App;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub verbose: bool,
    /// Level used when `verbose` is set; already validated.
    pub level: String,
    pub json: bool,
    pub file: Option<PathBuf>,
}

impl From<&App> for LogConfig {
    fn from(app: &App) -> Self {
        Self {
            verbose: app.verbose,
            level: app.log_level.clone(),
            json: app.log_json,
            file: (!app.log_file.is_empty()).then(|| PathBuf::from(&app.log_file)),
        }
    }
}

impl LogConfig {
    /// `info` unless verbose, in which case the configured level.
    pub fn filter(&self) -> String {
        if !self.verbose || self.level.is_empty() {
            return "info".into();
        }

        self.level.to_lowercase()
    }
}

/// Install the global subscriber.  Fails if one is already installed.
pub fn init(config: &LogConfig) -> Result<()> {
    let writer = match &config.file {
        Some(path) => BoxMakeWriter::new(Mutex::new(open_log_file(path)?)),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.filter()))
        .with_writer(writer)
        .with_ansi(config.file.is_none());

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| anyhow!("failed to initialize logging: {e}"))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
