//! Configuration management CLI commands.
//!
//! Provides `config show`, `config init`, `config get`, `config set` and
//! `config path` for viewing and modifying settings from the command line.

use std::path::Path;

use clap::Subcommand;
use modkit::config::{ConfigFile, ConfigKey};

use crate::error::CliError;
use crate::output::Output;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show all configuration settings
    Show,

    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., workspace.packages_dir)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., packing.compression)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand against the file at `path`.
pub fn run(command: ConfigCommands, path: &Path, out: &dyn Output) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_show(path, out),
        ConfigCommands::Init { force } => run_init(path, force, out),
        ConfigCommands::Get { key } => run_get(path, &key, out),
        ConfigCommands::Set { key, value } => run_set(path, &key, &value, out),
        ConfigCommands::Path => {
            out.println(&path.display().to_string());
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'modkit config show' to see available keys.",
            key
        ))
    })
}

fn run_show(path: &Path, out: &dyn Output) -> Result<(), CliError> {
    let config = ConfigFile::load_from(path)?;

    out.header("Configuration Settings");
    if !path.exists() {
        out.println("(no config file, showing defaults)");
    }

    let mut current_section = "";
    for key in ConfigKey::all() {
        let section = key.section();
        if section != current_section {
            out.newline();
            out.println(&format!("[{}]", section));
            current_section = section;
        }

        let value = key.get(&config);
        if value.is_empty() {
            out.indented(&format!("{} = (not set)", key.key_name()));
        } else {
            out.indented(&format!("{} = {}", key.key_name(), value));
        }
    }
    Ok(())
}

fn run_init(path: &Path, force: bool, out: &dyn Output) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        )));
    }
    ConfigFile::default().save_to(path)?;
    out.success(&format!("Wrote {}", path.display()));
    Ok(())
}

fn run_get(path: &Path, key: &str, out: &dyn Output) -> Result<(), CliError> {
    let key = parse_key(key)?;
    let config = ConfigFile::load_from(path)?;
    let value = key.get(&config);
    if value.is_empty() {
        out.println("(not set)");
    } else {
        out.println(&value);
    }
    Ok(())
}

fn run_set(path: &Path, key: &str, value: &str, out: &dyn Output) -> Result<(), CliError> {
    let key = parse_key(key)?;
    let mut config = ConfigFile::load_from(path)?;
    key.set(&mut config, value)?;
    config.save_to(path)?;
    out.println(&format!("Set {} = {}", key.name(), value));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::testing::BufferOutput;
    use modkit::packer::CompressionLevel;
    use tempfile::TempDir;

    #[test]
    fn test_init_then_refuse_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        let out = BufferOutput::default();

        run(ConfigCommands::Init { force: false }, &path, &out).unwrap();
        assert!(path.exists());

        let err = run(ConfigCommands::Init { force: false }, &path, &out).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        run(ConfigCommands::Init { force: true }, &path, &out).unwrap();
    }

    #[test]
    fn test_set_and_get() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        let out = BufferOutput::default();

        run(
            ConfigCommands::Set {
                key: "packing.compression".to_string(),
                value: "best".to_string(),
            },
            &path,
            &out,
        )
        .unwrap();
        assert_eq!(
            ConfigFile::load_from(&path).unwrap().packing.compression,
            CompressionLevel::Best
        );

        run(
            ConfigCommands::Get {
                key: "packing.compression".to_string(),
            },
            &path,
            &out,
        )
        .unwrap();
        assert_eq!(out.lines.borrow().last().unwrap(), "best");
    }

    #[test]
    fn test_unknown_key() {
        let temp = TempDir::new().unwrap();
        let out = BufferOutput::default();
        let err = run(
            ConfigCommands::Get {
                key: "nope.nope".to_string(),
            },
            &temp.path().join("config.ini"),
            &out,
        )
        .unwrap_err();
        assert!(err.to_string().contains("modkit config show"));
    }

    #[test]
    fn test_show_lists_every_key() {
        let temp = TempDir::new().unwrap();
        let out = BufferOutput::default();
        run(ConfigCommands::Show, &temp.path().join("config.ini"), &out).unwrap();

        let text = out.text();
        for key in ConfigKey::all() {
            assert!(text.contains(key.key_name()));
        }
        assert!(text.contains("[logging]"));
    }
}
