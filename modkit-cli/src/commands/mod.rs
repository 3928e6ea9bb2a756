//! CLI command handlers.
//!
//! Catalog commands are routed through the library's command boundary, the
//! same path `modkit exec` uses, so `--json` output is identical to what an
//! embedding host would receive.

pub mod common;
pub mod config;
pub mod exec;
pub mod item;
pub mod pack;
pub mod package;

use modkit::commands::{self, CommandResponse};
use modkit::workshop::Workshop;
use serde_json::Value;
use tracing::error;

use crate::error::CliError;
use crate::output::Output;

/// Everything a catalog command handler needs.
pub struct CommandContext<'a> {
    pub workshop: &'a Workshop,
    pub output: &'a dyn Output,
    /// Print raw JSON responses instead of formatted text.
    pub json: bool,
}

impl<'a> CommandContext<'a> {
    pub fn new(workshop: &'a Workshop, output: &'a dyn Output, json: bool) -> Self {
        Self {
            workshop,
            output,
            json,
        }
    }

    /// Run a command through the command boundary.
    ///
    /// In JSON mode the response is printed as is. Failures are reported to
    /// the user here and returned as [`CliError::CommandFailed`].
    pub fn dispatch(&self, name: &str, params: Value) -> Result<CommandResponse, CliError> {
        let response = commands::dispatch(self.workshop, name, params);
        if self.json {
            self.output.println(&response.to_json());
        }

        match response.error.clone() {
            Some(body) => {
                if let Some(trace) = &body.trace {
                    error!(code = %body.code, trace = %trace, "{}", body.message);
                }
                if !self.json {
                    self.output.error(&body.message);
                }
                Err(CliError::CommandFailed(body))
            }
            None => Ok(response),
        }
    }
}
