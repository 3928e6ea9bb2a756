//! `modkit package` commands.

use clap::Subcommand;
use modkit::package::Package;
use serde_json::json;

use super::CommandContext;
use crate::error::CliError;
use crate::output::Output;

/// Package subcommands.
#[derive(Debug, Subcommand)]
pub enum PackageCommands {
    /// Create a new package
    Create {
        /// Package author
        #[arg(long)]
        author: String,

        /// Package name
        #[arg(long)]
        name: String,
    },

    /// List all packages
    List,

    /// Show details of a package
    Info {
        /// Package identifier (e.g., Jane.ExampleMod)
        id: String,
    },
}

/// Run a package subcommand.
pub fn run(command: PackageCommands, ctx: &CommandContext) -> Result<(), CliError> {
    match command {
        PackageCommands::Create { author, name } => run_create(ctx, &author, &name),
        PackageCommands::List => run_list(ctx),
        PackageCommands::Info { id } => run_info(ctx, &id),
    }
}

fn run_create(ctx: &CommandContext, author: &str, name: &str) -> Result<(), CliError> {
    let response = ctx.dispatch(
        "create_package",
        json!({ "author": author, "name": name }),
    )?;
    if !ctx.json {
        ctx.output.success(&response.message);
    }
    Ok(())
}

fn run_list(ctx: &CommandContext) -> Result<(), CliError> {
    ctx.dispatch("list_packages", json!({}))?;
    if ctx.json {
        return Ok(());
    }

    let packages = ctx.workshop.catalog().list_packages();
    if packages.is_empty() {
        ctx.output.println("No packages.");
        return Ok(());
    }

    ctx.output.header("Packages");
    ctx.output.newline();
    for package in &packages {
        ctx.output.println(&format!(
            "{:<32} v{:<8} {:>3} entries {:>3} records  {}",
            package.id.as_str(),
            package.version.to_string(),
            package.entries().len(),
            package.records().len(),
            status_label(package)
        ));
    }
    Ok(())
}

fn run_info(ctx: &CommandContext, id: &str) -> Result<(), CliError> {
    let response = ctx.dispatch("get_package_info", json!({ "package_id": id }))?;
    if ctx.json {
        return Ok(());
    }

    let package: Package = response
        .data
        .as_ref()
        .and_then(|data| data.get("package"))
        .cloned()
        .map(serde_json::from_value::<Package>)
        .transpose()
        .map_err(|e| CliError::InvalidParams(e.to_string()))?
        .ok_or_else(|| CliError::InvalidParams("response has no package".to_string()))?;
    print_package(ctx.output, &package);
    Ok(())
}

fn status_label(package: &Package) -> &'static str {
    match (package.packed(), package.is_dirty()) {
        (None, _) => "not packed",
        (Some(_), true) => "modified",
        (Some(_), false) => "packed",
    }
}

/// Print the full details of a package.
pub fn print_package(out: &dyn Output, package: &Package) {
    out.header(package.id.as_str());
    out.println(&format!("Name:     {}", package.name));
    out.println(&format!("Author:   {}", package.author));
    out.println(&format!("Version:  {}", package.version));
    out.println(&format!(
        "Created:  {}",
        package.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.println(&format!("Status:   {}", status_label(package)));

    out.subheader(&format!("Entries ({})", package.entries().len()));
    for entry in package.entries() {
        out.indented(&format!(
            "{} [{}] {} -> {}",
            entry.id, entry.kind, entry.title, entry.asset.path
        ));
    }

    out.subheader(&format!("Records ({})", package.records().len()));
    for record in package.records() {
        let payload = record
            .payload
            .as_ref()
            .map(|p| p.asset().path.as_str())
            .unwrap_or("-");
        out.indented(&format!(
            "{} [{}] {} -> {}",
            record.id, record.kind, record.title, payload
        ));
    }

    if let Some(artifact) = package.packed() {
        out.subheader("Artifact");
        out.println(&format!("Path:     {}", artifact.path.display()));
        out.println(&format!("Checksum: {}", artifact.checksum));
        out.println(&format!(
            "Size:     {}",
            super::common::format_size(artifact.size)
        ));
    }
}
