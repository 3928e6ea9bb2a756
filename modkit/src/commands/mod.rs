//! Command boundary.
//!
//! Hosts receive requests as a command name plus a JSON parameter object and
//! answer with a [`CommandResponse`]. Decoding resolves the command name and
//! every parameter, including the item kind, before anything touches the
//! catalog.
//!
//! | Command            | Aliases                                            |
//! |--------------------|----------------------------------------------------|
//! | `create_package`   |                                                    |
//! | `create_item`      | `create_entry`, `create_record`, `create_scannable`|
//! | `pack_package`     | `pack`                                             |
//! | `list_packages`    |                                                    |
//! | `get_package_info` | `package_info`                                     |

mod params;
mod response;

pub use params::{CreateItemParams, CreatePackageParams, PackParams, PackageInfoParams};
pub use response::{CommandResponse, ErrorBody};

use serde_json::{json, Value};
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::packer::PackOutcome;
use crate::workshop::Workshop;
use params::RawParams;

/// A decoded command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreatePackage(CreatePackageParams),
    CreateItem(CreateItemParams),
    Pack(PackParams),
    ListPackages,
    PackageInfo(PackageInfoParams),
}

impl Command {
    /// Canonical command names.
    pub const NAMES: [&'static str; 5] = [
        "create_package",
        "create_item",
        "pack_package",
        "list_packages",
        "get_package_info",
    ];

    /// Decode a command from its name and parameter object.
    ///
    /// Names are case-insensitive.
    pub fn decode(name: &str, params: Value) -> CatalogResult<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        let raw = RawParams::from_value(params)?;

        let command = match normalized.as_str() {
            "create_package" => Command::CreatePackage(raw.try_into()?),
            "create_item" | "create_entry" | "create_record" | "create_scannable" => {
                Command::CreateItem(raw.try_into()?)
            }
            "pack_package" | "pack" => Command::Pack(raw.try_into()?),
            "list_packages" => Command::ListPackages,
            "get_package_info" | "package_info" => Command::PackageInfo(raw.try_into()?),
            _ => {
                return Err(CatalogError::InvalidInput(format!(
                    "unknown command '{}' (expected one of: {})",
                    name.trim(),
                    Self::NAMES.join(", ")
                )))
            }
        };
        Ok(command)
    }

    /// Canonical name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreatePackage(_) => "create_package",
            Command::CreateItem(_) => "create_item",
            Command::Pack(_) => "pack_package",
            Command::ListPackages => "list_packages",
            Command::PackageInfo(_) => "get_package_info",
        }
    }
}

/// Run a decoded command.
pub fn execute(workshop: &Workshop, command: Command) -> CommandResponse {
    let name = command.name();
    match run(workshop, command) {
        Ok((message, data)) => {
            debug!(command = name, "Command succeeded");
            CommandResponse::ok(message, data)
        }
        Err(e) => {
            debug!(command = name, code = %e.code(), error = %e, "Command failed");
            CommandResponse::from_error(&e)
        }
    }
}

/// Decode and run a command.
pub fn dispatch(workshop: &Workshop, name: &str, params: Value) -> CommandResponse {
    match Command::decode(name, params) {
        Ok(command) => execute(workshop, command),
        Err(e) => CommandResponse::from_error(&e),
    }
}

fn run(workshop: &Workshop, command: Command) -> CatalogResult<(String, Value)> {
    match command {
        Command::CreatePackage(p) => {
            let package = workshop.create_package(&p.author, &p.name)?;
            Ok((
                format!("Created package {}", package.id),
                json!({ "identifier": package.id }),
            ))
        }
        Command::CreateItem(p) => {
            let item = workshop.create_item(&p.package_id, &p.title, p.kind, &p.asset_path)?;
            Ok((
                format!("Created {} {}", p.kind.label(), item.identifier),
                json!({ "identifier": item.identifier, "kind": item.kind }),
            ))
        }
        Command::Pack(p) => {
            let outcome = workshop.pack(&p.package_id)?;
            let message = match &outcome {
                PackOutcome::Packed(_) => format!("Packed {}", p.package_id),
                PackOutcome::Unchanged(_) => {
                    format!("{} is already packed and unchanged", p.package_id)
                }
            };
            let artifact = outcome.artifact();
            Ok((
                message,
                json!({
                    "identifier": p.package_id,
                    "artifact": artifact.path,
                    "checksum": artifact.checksum,
                    "fresh": outcome.is_fresh(),
                }),
            ))
        }
        Command::ListPackages => {
            let identifiers = workshop.list_packages();
            Ok((
                format!("{} package(s)", identifiers.len()),
                json!({ "identifiers": identifiers }),
            ))
        }
        Command::PackageInfo(p) => {
            let package = workshop.package_info(&p.package_id)?;
            Ok((
                format!("Package {}", package.id),
                json!({ "package": package }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetType, MemoryAssetResolver};
    use crate::catalog::Catalog;
    use crate::error::ErrorCode;
    use crate::package::{EntryKind, ItemKind, RecordKind};
    use crate::store::FsPackageStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn workshop(temp: &TempDir) -> Workshop {
        let resolver = MemoryAssetResolver::new()
            .with_asset("Assets/Gun01.prefab", AssetType::Prefab)
            .with_asset("Assets/Theme.ogg", AssetType::AudioClip);
        Workshop::new(
            Arc::new(Catalog::new()),
            Arc::new(FsPackageStore::new(temp.path().join("packages"))),
            Arc::new(resolver),
            temp.path().join("dist"),
        )
    }

    #[test]
    fn test_decode_aliases_and_case() {
        let params = json!({
            "package_id": "Jane.ExampleMod",
            "title": "Theme",
            "kind": "monodisc",
            "asset_path": "Assets/Theme.ogg",
        });
        let command = Command::decode("Create_Scannable", params).unwrap();
        match command {
            Command::CreateItem(p) => assert_eq!(p.kind, ItemKind::Record(RecordKind::AudioDisc)),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            Command::decode("LIST_PACKAGES", Value::Null).unwrap(),
            Command::ListPackages
        );
    }

    #[test]
    fn test_decode_unknown_command() {
        let err = Command::decode("delete_package", json!({})).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }

    #[test]
    fn test_dispatch_round_trip() {
        let temp = TempDir::new().unwrap();
        let workshop = workshop(&temp);

        let created = dispatch(
            &workshop,
            "create_package",
            json!({"author": "Jane", "name": "ExampleMod"}),
        );
        assert!(created.success);
        assert_eq!(created.data.as_ref().unwrap()["identifier"], "Jane.ExampleMod");

        let entry = dispatch(
            &workshop,
            "create_entry",
            json!({
                "packageId": "Jane.ExampleMod",
                "title": "Gun01",
                "kind": "SPAWNABLE",
                "assetPath": "Assets/Gun01.prefab",
            }),
        );
        assert!(entry.success, "{:?}", entry.error);
        assert_eq!(entry.data.as_ref().unwrap()["kind"], "SPAWNABLE");

        let packed = dispatch(&workshop, "pack", json!({"package_id": "Jane.ExampleMod"}));
        assert!(packed.success);
        assert!(packed.message.contains("Jane.ExampleMod"));

        let info = dispatch(
            &workshop,
            "get_package_info",
            json!({"package_id": "Jane.ExampleMod"}),
        );
        let package = &info.data.as_ref().unwrap()["package"];
        assert_eq!(package["entries"][0]["kind"], "SPAWNABLE");
        assert_eq!(package["dirty"], false);
    }

    #[test]
    fn test_execute_typed_command() {
        let temp = TempDir::new().unwrap();
        let workshop = workshop(&temp);
        workshop.create_package("Jane", "ExampleMod").unwrap();

        let response = execute(
            &workshop,
            Command::CreateItem(CreateItemParams {
                package_id: "Jane.ExampleMod".parse().unwrap(),
                title: "Gun01".to_string(),
                kind: ItemKind::Entry(EntryKind::Spawnable),
                asset_path: "Assets/Gun01.prefab".to_string(),
            }),
        );
        assert!(response.success);

        let listed = execute(&workshop, Command::ListPackages);
        assert_eq!(listed.data.unwrap()["identifiers"], json!(["Jane.ExampleMod"]));
    }

    #[test]
    fn test_dispatch_reports_error_code() {
        let temp = TempDir::new().unwrap();
        let workshop = workshop(&temp);

        let response = dispatch(
            &workshop,
            "pack_package",
            json!({"package_id": "Nobody.Nothing"}),
        );
        assert!(!response.success);
        let error = response.error.unwrap();
        assert_eq!(error.code, ErrorCode::NotFound);
        assert!(error.trace.is_none());
    }
}
