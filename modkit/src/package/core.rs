//! Core package type.
//!
//! The [`Package`] struct is both the in-memory authoritative copy held by the
//! catalog and the persisted manifest written by the store.

use std::fmt;

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};

use super::{ContentEntry, Identifier, MetadataRecord};
use crate::packer::PackedArtifact;

/// Version assigned to newly created packages.
pub const INITIAL_VERSION: Version = Version::new(0, 1, 0);

/// An authored, uniquely identified unit of distributable content.
///
/// Entries and records are append-only: the only mutators are
/// [`push_entry`](Self::push_entry) and [`push_record`](Self::push_record),
/// plus the rollback used when persisting an append fails. Outside this
/// crate the item lists and pack state are read-only.
///
/// # Example
///
/// ```
/// use modkit::package::{Identifier, Package};
///
/// let id = Identifier::parse("Jane.ExampleMod").unwrap();
/// let package = Package::new(id, "Jane", "ExampleMod");
///
/// assert_eq!(package.author, "Jane");
/// assert!(package.entries().is_empty());
/// assert!(!package.is_dirty());
/// ```
///
/// ```compile_fail
/// use modkit::package::{Identifier, Package};
///
/// let id = Identifier::parse("Jane.ExampleMod").unwrap();
/// let mut package = Package::new(id, "Jane", "ExampleMod");
/// package.entries.clear();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: Identifier,
    pub author: String,
    pub name: String,
    pub version: Version,
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub(crate) entries: Vec<ContentEntry>,

    #[serde(default)]
    pub(crate) records: Vec<MetadataRecord>,

    /// Changed since the last successful pack.
    #[serde(default)]
    pub(crate) dirty: bool,

    /// The most recent packed artifact, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) packed: Option<PackedArtifact>,
}

impl Package {
    /// Create an empty package.
    pub fn new(id: Identifier, author: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            author: author.into(),
            name: name.into(),
            version: INITIAL_VERSION,
            created_at: Utc::now(),
            entries: Vec::new(),
            records: Vec::new(),
            dirty: false,
            packed: None,
        }
    }

    /// Content entries in creation order.
    pub fn entries(&self) -> &[ContentEntry] {
        &self.entries
    }

    /// Metadata records in creation order.
    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    /// Whether the package changed since its last successful pack.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The most recent packed artifact, if any.
    pub fn packed(&self) -> Option<&PackedArtifact> {
        self.packed.as_ref()
    }

    /// Append a content entry and mark the package dirty.
    pub fn push_entry(&mut self, entry: ContentEntry) {
        self.entries.push(entry);
        self.dirty = true;
    }

    /// Append a metadata record and mark the package dirty.
    pub fn push_record(&mut self, record: MetadataRecord) {
        self.records.push(record);
        self.dirty = true;
    }

    /// Whether any entry or record already uses `id`.
    pub fn contains_item(&self, id: &Identifier) -> bool {
        self.entries.iter().any(|e| &e.id == id) || self.records.iter().any(|r| &r.id == id)
    }

    /// Total number of entries and records.
    pub fn item_count(&self) -> usize {
        self.entries.len() + self.records.len()
    }

    /// Whether the package has no entries and no records.
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} by {}) v{}", self.id, self.name, self.author, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetRef, AssetType};
    use crate::package::{EntryKind, RecordKind, RecordPayload};
    use std::path::PathBuf;

    fn package() -> Package {
        Package::new(Identifier::parse("Jane.ExampleMod").unwrap(), "Jane", "ExampleMod")
    }

    fn entry(pkg: &Package, title: &str) -> ContentEntry {
        ContentEntry {
            id: pkg.id.child(&["Spawnable", title]),
            title: title.to_string(),
            kind: EntryKind::Spawnable,
            asset: AssetRef::new(format!("Assets/{}.prefab", title), AssetType::Prefab),
            storage_path: PathBuf::from(format!("{}.entry.json", title)),
        }
    }

    #[test]
    fn test_package_new() {
        let pkg = package();
        assert_eq!(pkg.id.as_str(), "Jane.ExampleMod");
        assert_eq!(pkg.version, Version::new(0, 1, 0));
        assert!(pkg.is_empty());
        assert!(pkg.packed.is_none());
    }

    #[test]
    fn test_push_preserves_order_and_marks_dirty() {
        let mut pkg = package();
        let first = entry(&pkg, "Gun01");
        let second = entry(&pkg, "Gun02");
        pkg.push_entry(first.clone());
        pkg.push_entry(second.clone());

        assert!(pkg.dirty);
        assert_eq!(pkg.entries, vec![first, second]);
    }

    #[test]
    fn test_contains_item() {
        let mut pkg = package();
        let e = entry(&pkg, "Gun01");
        let record_id = pkg.id.child(&["MonoDisc", "Theme"]);
        pkg.push_entry(e.clone());
        pkg.push_record(MetadataRecord {
            id: record_id.clone(),
            title: "Theme".to_string(),
            kind: RecordKind::AudioDisc,
            payload: Some(RecordPayload::Audio(AssetRef::new(
                "Assets/Theme.ogg",
                AssetType::AudioClip,
            ))),
            storage_path: PathBuf::from("Theme.record.json"),
            packed_assets: Vec::new(),
        });

        assert!(pkg.contains_item(&e.id));
        assert!(pkg.contains_item(&record_id));
        assert!(!pkg.contains_item(&pkg.id.child(&["Level", "Arena"])));
        assert_eq!(pkg.item_count(), 2);
    }

    #[test]
    fn test_package_display() {
        assert_eq!(
            package().to_string(),
            "Jane.ExampleMod (ExampleMod by Jane) v0.1.0"
        );
    }

    #[test]
    fn test_manifest_json_roundtrip_keeps_items() {
        let mut pkg = package();
        pkg.push_entry(entry(&pkg, "Gun01"));
        let json = serde_json::to_string(&pkg).unwrap();
        let back: Package = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pkg);
    }
}
