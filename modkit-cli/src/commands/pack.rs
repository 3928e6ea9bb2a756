//! `modkit pack` command.

use clap::Args;
use modkit::package::Identifier;
use serde_json::json;

use super::common::format_size;
use super::CommandContext;
use crate::error::CliError;

/// Arguments of `modkit pack`.
#[derive(Debug, Args)]
pub struct PackArgs {
    /// Package identifier (e.g., Jane.ExampleMod)
    pub package: String,
}

/// Validate and pack a package.
pub fn run(args: PackArgs, ctx: &CommandContext) -> Result<(), CliError> {
    let response = ctx.dispatch("pack_package", json!({ "package_id": args.package }))?;
    if ctx.json {
        return Ok(());
    }

    ctx.output.success(&response.message);
    if let Some(data) = &response.data {
        if let Some(path) = data.get("artifact").and_then(|v| v.as_str()) {
            ctx.output.indented(&format!("Artifact: {}", path));
        }
        if let Some(checksum) = data.get("checksum").and_then(|v| v.as_str()) {
            ctx.output.indented(&format!("SHA-256:  {}", checksum));
        }
    }

    if let Some(artifact) = args
        .package
        .parse::<Identifier>()
        .ok()
        .and_then(|id| ctx.workshop.package_info(&id).ok())
        .and_then(|p| p.packed().cloned())
    {
        ctx.output.indented(&format!("Size:     {}", format_size(artifact.size)));
    }
    Ok(())
}
