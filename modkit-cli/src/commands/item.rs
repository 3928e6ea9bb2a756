//! `modkit item` commands.

use clap::Subcommand;
use serde_json::json;

use super::CommandContext;
use crate::error::CliError;

/// Item subcommands.
#[derive(Debug, Subcommand)]
pub enum ItemCommands {
    /// Create an entry or record in a package
    ///
    /// Entry kinds: SPAWNABLE, LEVEL, AVATAR.
    /// Record kinds: MONODISC, TAG, SURFACE.
    Create {
        /// Package identifier (e.g., Jane.ExampleMod)
        package: String,

        /// Item title
        #[arg(long)]
        title: String,

        /// Item kind (case-insensitive)
        #[arg(long)]
        kind: String,

        /// Asset path, relative to the assets directory
        #[arg(long)]
        asset: String,
    },
}

/// Run an item subcommand.
pub fn run(command: ItemCommands, ctx: &CommandContext) -> Result<(), CliError> {
    match command {
        ItemCommands::Create {
            package,
            title,
            kind,
            asset,
        } => {
            let response = ctx.dispatch(
                "create_item",
                json!({
                    "package_id": package,
                    "title": title,
                    "kind": kind,
                    "asset_path": asset,
                }),
            )?;
            if !ctx.json {
                ctx.output.success(&response.message);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::workshop;
    use crate::output::testing::BufferOutput;
    use modkit::ErrorCode;
    use tempfile::TempDir;

    fn create(package: &str, kind: &str, asset: &str) -> ItemCommands {
        ItemCommands::Create {
            package: package.to_string(),
            title: "Gun01".to_string(),
            kind: kind.to_string(),
            asset: asset.to_string(),
        }
    }

    #[test]
    fn test_create_entry() {
        let temp = TempDir::new().unwrap();
        let workshop = workshop(&temp);
        workshop.create_package("Jane", "ExampleMod").unwrap();
        let out = BufferOutput::default();
        let ctx = CommandContext::new(&workshop, &out, false);

        run(create("Jane.ExampleMod", "spawnable", "Assets/Gun01.prefab"), &ctx).unwrap();
        assert!(out
            .text()
            .contains("Created Spawnable Jane.ExampleMod.Spawnable.Gun01"));
    }

    #[test]
    fn test_bogus_kind() {
        let temp = TempDir::new().unwrap();
        let workshop = workshop(&temp);
        let out = BufferOutput::default();
        let ctx = CommandContext::new(&workshop, &out, false);

        match run(create("Nobody.Nothing", "BOGUS", "Assets/Gun01.prefab"), &ctx) {
            Err(CliError::CommandFailed(body)) => assert_eq!(body.code, ErrorCode::InvalidKind),
            other => panic!("expected InvalidKind, got {:?}", other),
        }
    }
}
