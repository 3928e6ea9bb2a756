//! CLI error type.

use std::process::ExitCode;

use modkit::commands::ErrorBody;
use modkit::config::ConfigError;
use modkit::logging::LoggingError;
use modkit::CatalogError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A command ran and reported failure. Its response has already been
    /// printed.
    #[error("{}: {}", .0.code, .0.message)]
    CommandFailed(ErrorBody),

    #[error("invalid JSON parameters: {0}")]
    InvalidParams(String),
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Config(_) | CliError::InvalidParams(_) => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modkit::ErrorCode;

    #[test]
    fn test_command_failed_display() {
        let err = CliError::CommandFailed(ErrorBody {
            code: ErrorCode::NotFound,
            message: "could not find a package with identifier Jane.Mod".to_string(),
            trace: None,
        });
        assert_eq!(
            err.to_string(),
            "NOT_FOUND: could not find a package with identifier Jane.Mod"
        );
    }

    #[test]
    fn test_config_error_converts() {
        let err: CliError = ConfigError::UnknownKey("nope".to_string()).into();
        assert!(matches!(err, CliError::Config(_)));
    }
}
