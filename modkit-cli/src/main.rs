//! modkit CLI - Command-line interface
//!
//! Author mod packages, add content entries and metadata records, and pack
//! packages into distributable artifacts.

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use modkit::logging::{init_logging, LoggingConfig};

use commands::common::{build_workshop, load_config, resolve_config_path, Overrides};
use commands::config::ConfigCommands;
use commands::exec::ExecArgs;
use commands::item::ItemCommands;
use commands::pack::PackArgs;
use commands::package::PackageCommands;
use commands::CommandContext;
use error::CliError;
use output::{ConsoleOutput, Output};

#[derive(Parser)]
#[command(name = "modkit")]
#[command(about = "Author and pack mod packages", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: ~/.modkit/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding package manifests
    #[arg(long, global = true)]
    packages_dir: Option<PathBuf>,

    /// Project directory that asset paths are resolved against
    #[arg(long, global = true)]
    assets_dir: Option<PathBuf>,

    /// Directory packed artifacts are written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Print raw JSON responses
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, list and inspect packages
    #[command(subcommand)]
    Package(PackageCommands),

    /// Add entries and records to a package
    #[command(subcommand)]
    Item(ItemCommands),

    /// Validate and pack a package into an artifact
    Pack(PackArgs),

    /// Run a command by name with JSON parameters
    Exec(ExecArgs),

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let out = ConsoleOutput;

    match run(cli, &out) {
        Ok(()) => ExitCode::SUCCESS,
        // Already reported by the command.
        Err(e @ CliError::CommandFailed(_)) => e.exit_code(),
        Err(e) => {
            out.error(&e.to_string());
            e.exit_code()
        }
    }
}

fn run(cli: Cli, out: &dyn Output) -> Result<(), CliError> {
    let Cli {
        config,
        packages_dir,
        assets_dir,
        output_dir,
        json,
        verbose,
        command,
    } = cli;
    let session = Session {
        config,
        overrides: Overrides {
            packages_dir,
            assets_dir,
            output_dir,
        },
        json,
        verbose,
    };

    match command {
        Commands::Config(command) => {
            let path = resolve_config_path(session.config.as_deref());
            commands::config::run(command, &path, out)
        }
        Commands::Package(command) => {
            session.run(out, |ctx| commands::package::run(command, ctx))
        }
        Commands::Item(command) => session.run(out, |ctx| commands::item::run(command, ctx)),
        Commands::Pack(args) => session.run(out, |ctx| commands::pack::run(args, ctx)),
        Commands::Exec(args) => session.run(out, |ctx| commands::exec::run(args, ctx)),
    }
}

/// Global options for commands that work on a loaded workshop.
struct Session {
    config: Option<PathBuf>,
    overrides: Overrides,
    json: bool,
    verbose: bool,
}

impl Session {
    /// Load configuration, start logging, open the workshop and run `f`.
    fn run<F>(self, out: &dyn Output, f: F) -> Result<(), CliError>
    where
        F: FnOnce(&CommandContext<'_>) -> Result<(), CliError>,
    {
        let mut config = load_config(self.config.as_deref())?;
        self.overrides.apply(&mut config);

        let mut logging = LoggingConfig::from(&config.logging)
            .with_ansi(console::colors_enabled_stderr());
        if self.verbose {
            logging = logging.with_level("debug");
        }
        let _guard = init_logging(&logging)?;

        let workshop = build_workshop(&config)?;
        let ctx = CommandContext::new(&workshop, out, self.json);
        f(&ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::testing::BufferOutput;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("modkit").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_config_command_does_not_open_workshop() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.ini");
        let out = BufferOutput::default();

        run(parse(&["--config", missing.to_str().unwrap(), "config", "path"]), &out).unwrap();

        assert_eq!(out.text(), missing.display().to_string());
        assert!(!missing.exists());
    }

    #[test]
    fn test_workshop_command_loads_named_config() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.ini");
        let out = BufferOutput::default();

        let err = run(
            parse(&["--config", missing.to_str().unwrap(), "package", "list"]),
            &out,
        )
        .unwrap_err();

        assert!(matches!(err, CliError::Config(_)));
    }
}
