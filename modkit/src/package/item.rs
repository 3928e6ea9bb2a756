//! Content entries and metadata records.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{EntryKind, Identifier, RecordKind};
use crate::asset::AssetRef;

/// A typed item referencing one resolved asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub id: Identifier,
    pub title: String,
    pub kind: EntryKind,
    pub asset: AssetRef,

    /// Where the entry was persisted.
    pub storage_path: PathBuf,
}

/// Asset carried by a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "asset", rename_all = "snake_case")]
pub enum RecordPayload {
    /// Typed audio payload of an audio-disc record.
    Audio(AssetRef),
    /// Untyped asset reference of a descriptive record.
    Reference(AssetRef),
}

impl RecordPayload {
    pub fn asset(&self) -> &AssetRef {
        match self {
            RecordPayload::Audio(asset) | RecordPayload::Reference(asset) => asset,
        }
    }
}

/// A lighter-weight descriptive item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub id: Identifier,
    pub title: String,
    pub kind: RecordKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<RecordPayload>,

    /// Where the record was persisted.
    pub storage_path: PathBuf,

    /// Files produced by packed sub-asset generation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packed_assets: Vec<PathBuf>,
}
