//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use modkit::asset::ProjectAssetResolver;
use modkit::config::{config_file_path, ConfigFile};
use modkit::events::LoggingObserver;
use modkit::packer::GzipArtifactWriter;
use modkit::store::FsPackageStore;
use modkit::workshop::Workshop;

use crate::error::CliError;

/// Directory overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub packages_dir: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl Overrides {
    /// Apply the overrides. Command-line values take precedence over the file.
    pub fn apply(&self, config: &mut ConfigFile) {
        if let Some(dir) = &self.packages_dir {
            config.workspace.packages_dir = dir.clone();
        }
        if let Some(dir) = &self.assets_dir {
            config.workspace.assets_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.packing.output_dir = dir.clone();
        }
    }
}

/// The config file to use: `--config` if given, otherwise the default.
pub fn resolve_config_path(cli_path: Option<&Path>) -> PathBuf {
    cli_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path)
}

/// Load configuration. An explicitly named file must exist.
pub fn load_config(cli_path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let path = resolve_config_path(cli_path);
    if cli_path.is_some() && !path.exists() {
        return Err(CliError::Config(format!(
            "config file {} does not exist",
            path.display()
        )));
    }
    Ok(ConfigFile::load_from(&path)?)
}

/// Build the workshop from configuration, loading the catalog from disk.
pub fn build_workshop(config: &ConfigFile) -> Result<Workshop, CliError> {
    let store = Arc::new(FsPackageStore::new(config.workspace.packages_dir.clone()));
    let resolver = Arc::new(ProjectAssetResolver::new(
        config.workspace.assets_dir.clone(),
    ));
    let writer = GzipArtifactWriter::new().with_compression(config.packing.compression);

    let workshop = Workshop::open(store, resolver, config.packing.output_dir.clone())?
        .with_artifact_writer(Arc::new(writer))
        .with_observer(Arc::new(LoggingObserver));
    Ok(workshop)
}

/// Format a size in bytes as a human-readable string.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
