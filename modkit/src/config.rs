//! Configuration file support.
//!
//! Settings live in an INI file, by default `~/.modkit/config.ini`:
//!
//! ```ini
//! [workspace]
//! packages_dir = ~/.modkit/packages
//! assets_dir = .
//!
//! [packing]
//! output_dir = ~/.modkit/dist
//! compression = default
//!
//! [logging]
//! level = warn
//! file = ~/.modkit/modkit.log
//! ```
//!
//! Missing files and missing keys fall back to defaults.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;

use crate::packer::CompressionLevel;

/// Directory name under the home directory.
pub const CONFIG_DIR_NAME: &str = ".modkit";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.ini";

/// Errors reading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read { path: PathBuf, source: ini::Error },

    #[error("failed to write config {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// Base directory for modkit state.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Path of the default configuration file.
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILENAME)
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(value: &str) -> PathBuf {
    match (value.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(value),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSettings {
    /// Where package directories are stored.
    pub packages_dir: PathBuf,
    /// Root that asset paths are resolved against.
    pub assets_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackingSettings {
    pub output_dir: PathBuf,
    pub compression: CompressionLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Optional log file.
    pub file: Option<PathBuf>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub workspace: WorkspaceSettings,
    pub packing: PackingSettings,
    pub logging: LoggingSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let base = config_dir();
        Self {
            workspace: WorkspaceSettings {
                packages_dir: base.join("packages"),
                assets_dir: PathBuf::from("."),
            },
            packing: PackingSettings {
                output_dir: base.join("dist"),
                compression: CompressionLevel::Default,
            },
            logging: LoggingSettings {
                level: "warn".to_string(),
                file: None,
            },
        }
    }
}

impl ConfigFile {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if !path.exists() {
            return Ok(config);
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        for key in ConfigKey::all() {
            if let Some(value) = ini
                .section(Some(key.section()))
                .and_then(|s| s.get(key.key_name()))
            {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }
        ini.write_to_file(path).map_err(write_err)
    }
}

/// A single configurable setting, addressed as `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    WorkspacePackagesDir,
    WorkspaceAssetsDir,
    PackingOutputDir,
    PackingCompression,
    LoggingLevel,
    LoggingFile,
}

impl ConfigKey {
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::WorkspacePackagesDir,
            ConfigKey::WorkspaceAssetsDir,
            ConfigKey::PackingOutputDir,
            ConfigKey::PackingCompression,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingFile,
        ]
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::WorkspacePackagesDir | ConfigKey::WorkspaceAssetsDir => "workspace",
            ConfigKey::PackingOutputDir | ConfigKey::PackingCompression => "packing",
            ConfigKey::LoggingLevel | ConfigKey::LoggingFile => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::WorkspacePackagesDir => "packages_dir",
            ConfigKey::WorkspaceAssetsDir => "assets_dir",
            ConfigKey::PackingOutputDir => "output_dir",
            ConfigKey::PackingCompression => "compression",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingFile => "file",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as text. Unset values are empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::WorkspacePackagesDir => config.workspace.packages_dir.display().to_string(),
            ConfigKey::WorkspaceAssetsDir => config.workspace.assets_dir.display().to_string(),
            ConfigKey::PackingOutputDir => config.packing.output_dir.display().to_string(),
            ConfigKey::PackingCompression => config.packing.compression.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingFile => config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parse and store `value`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match self {
            ConfigKey::WorkspacePackagesDir | ConfigKey::WorkspaceAssetsDir
            | ConfigKey::PackingOutputDir
                if value.is_empty() =>
            {
                return Err(invalid("path cannot be empty"));
            }
            ConfigKey::WorkspacePackagesDir => config.workspace.packages_dir = expand_tilde(value),
            ConfigKey::WorkspaceAssetsDir => config.workspace.assets_dir = expand_tilde(value),
            ConfigKey::PackingOutputDir => config.packing.output_dir = expand_tilde(value),
            ConfigKey::PackingCompression => {
                config.packing.compression = value
                    .parse::<CompressionLevel>()
                    .map_err(|e| invalid(&e))?;
            }
            ConfigKey::LoggingLevel => {
                if value.is_empty() {
                    return Err(invalid("level cannot be empty"));
                }
                config.logging.level = value.to_string();
            }
            ConfigKey::LoggingFile => {
                config.logging.file = (!value.is_empty()).then(|| expand_tilde(value));
            }
        }
        Ok(())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
