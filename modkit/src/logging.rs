//! Logging setup.
//!
//! Installs a global `tracing` subscriber with a stderr layer and, if a log
//! file is configured, a non-blocking file layer. `RUST_LOG` takes precedence
//! over the configured level.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSettings;

/// Errors from logging initialization.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("logging is already initialized")]
    AlreadyInitialized,

    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        directive: String,
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("failed to create log directory {}: {source}", .path.display())]
    CreateDirectory { path: PathBuf, source: io::Error },
}

/// Logging options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
    /// Colored stderr output.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            ansi: true,
        }
    }
}

impl From<&LoggingSettings> for LoggingConfig {
    fn from(settings: &LoggingSettings) -> Self {
        Self {
            level: settings.level.clone(),
            file: settings.file.clone(),
            ..Self::default()
        }
    }
}

impl LoggingConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }
}

/// Keeps the file writer alive. Dropping it flushes pending log lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Filter for `level`, ignoring the environment.
pub fn level_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidFilter {
        directive: level.to_string(),
        source: e,
    })
}

/// Install the global subscriber.
///
/// Fails with [`LoggingError::AlreadyInitialized`] if a global subscriber is
/// already set.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&config.level)?,
    };

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.ansi)
        .with_timer(LocalTime::new(Rfc3339));

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            fs::create_dir_all(&dir).map_err(|e| LoggingError::CreateDirectory {
                path: dir.clone(),
                source: e,
            })?;
            let file_name = path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("modkit.log"));

            let appender = tracing_appender::rolling::never(&dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(LocalTime::new(Rfc3339));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    Ok(LoggingGuard { _file: guard })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_filter() {
        assert!(level_filter("debug").is_ok());
        assert!(level_filter("modkit=trace,warn").is_ok());
        assert!(matches!(
            level_filter("modkit=loud"),
            Err(LoggingError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_config_from_settings() {
        let settings = LoggingSettings {
            level: "debug".to_string(),
            file: Some(PathBuf::from("/tmp/modkit.log")),
        };
        let config = LoggingConfig::from(&settings).with_ansi(false);
        assert_eq!(config.level, "debug");
        assert!(!config.ansi);
    }

    #[test]
    fn test_init_once_with_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logs/modkit.log");
        let config = LoggingConfig::default()
            .with_file(Some(path.clone()))
            .with_ansi(false);

        let guard = init_logging(&config).unwrap();
        tracing::info!("logging test");
        assert!(matches!(
            init_logging(&LoggingConfig::default()),
            Err(LoggingError::AlreadyInitialized)
        ));
        drop(guard);

        assert!(path.exists());
    }
}
