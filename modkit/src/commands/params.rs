//! Typed command parameters.
//!
//! Requests arrive as a loose JSON object. [`RawParams`] accepts whatever
//! keys clients send; the typed parameter structs are built from it and
//! reject missing or malformed fields before any catalog work starts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CatalogError, CatalogResult};
use crate::package::{Identifier, ItemKind};

/// Untyped request parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawParams {
    author: Option<String>,
    name: Option<String>,
    #[serde(alias = "packageId", alias = "package", alias = "id")]
    package_id: Option<String>,
    title: Option<String>,
    #[serde(alias = "type")]
    kind: Option<String>,
    #[serde(alias = "assetPath", alias = "path")]
    asset_path: Option<String>,
}

impl RawParams {
    pub(crate) fn from_value(value: Value) -> CatalogResult<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => serde_json::from_value(value)
                .map_err(|e| CatalogError::InvalidInput(format!("malformed parameters: {}", e))),
            other => Err(CatalogError::InvalidInput(format!(
                "parameters must be an object, got {}",
                other
            ))),
        }
    }

    fn required(field: &str, value: &Option<String>) -> CatalogResult<String> {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v.to_string()),
            _ => Err(CatalogError::InvalidInput(format!("{} is required", field))),
        }
    }
}

/// Parameters of `create_package`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePackageParams {
    pub author: String,
    pub name: String,
}

impl TryFrom<RawParams> for CreatePackageParams {
    type Error = CatalogError;

    fn try_from(raw: RawParams) -> CatalogResult<Self> {
        Ok(Self {
            author: RawParams::required("author", &raw.author)?,
            name: RawParams::required("name", &raw.name)?,
        })
    }
}

/// Parameters of `create_item`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateItemParams {
    pub package_id: Identifier,
    pub title: String,
    pub kind: ItemKind,
    pub asset_path: String,
}

impl TryFrom<RawParams> for CreateItemParams {
    type Error = CatalogError;

    /// The kind is checked before the package identifier, so an unknown kind
    /// is reported whatever package it names.
    fn try_from(raw: RawParams) -> CatalogResult<Self> {
        let package_id = RawParams::required("package_id", &raw.package_id)?;
        let title = RawParams::required("title", &raw.title)?;
        let kind = RawParams::required("kind", &raw.kind)?;
        let asset_path = RawParams::required("asset_path", &raw.asset_path)?;

        let kind = ItemKind::parse(&kind)?;
        Ok(Self {
            package_id: Identifier::parse(&package_id)?,
            title,
            kind,
            asset_path,
        })
    }
}

/// Parameters of `pack_package`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackParams {
    pub package_id: Identifier,
}

impl TryFrom<RawParams> for PackParams {
    type Error = CatalogError;

    fn try_from(raw: RawParams) -> CatalogResult<Self> {
        let package_id = RawParams::required("package_id", &raw.package_id)?;
        Ok(Self {
            package_id: Identifier::parse(&package_id)?,
        })
    }
}

/// Parameters of `get_package_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfoParams {
    pub package_id: Identifier,
}

impl TryFrom<RawParams> for PackageInfoParams {
    type Error = CatalogError;

    fn try_from(raw: RawParams) -> CatalogResult<Self> {
        let package_id = RawParams::required("package_id", &raw.package_id)?;
        Ok(Self {
            package_id: Identifier::parse(&package_id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::package::EntryKind;
    use serde_json::json;

    fn raw(value: Value) -> RawParams {
        RawParams::from_value(value).unwrap()
    }

    #[test]
    fn test_create_package_params() {
        let params =
            CreatePackageParams::try_from(raw(json!({"author": " Jane ", "name": "ExampleMod"})))
                .unwrap();
        assert_eq!(params.author, "Jane");
    }

    #[test]
    fn test_missing_field_is_invalid_input() {
        let err = CreatePackageParams::try_from(raw(json!({"author": "Jane"}))).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_create_item_accepts_camel_case_keys() {
        let params = CreateItemParams::try_from(raw(json!({
            "packageId": "Jane.ExampleMod",
            "title": "Gun01",
            "type": "spawnable",
            "assetPath": "Assets/Gun01.prefab",
        })))
        .unwrap();
        assert_eq!(params.kind, ItemKind::Entry(EntryKind::Spawnable));
        assert_eq!(params.package_id.as_str(), "Jane.ExampleMod");
    }

    #[test]
    fn test_bogus_kind_wins_over_bad_identifier() {
        let err = CreateItemParams::try_from(raw(json!({
            "package_id": "not an id!",
            "title": "Gun01b",
            "kind": "BOGUS",
            "asset_path": "Assets/Gun01.prefab",
        })))
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidKind);
    }

    #[test]
    fn test_non_object_params() {
        let err = RawParams::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
        assert!(RawParams::from_value(Value::Null).is_ok());
    }
}
