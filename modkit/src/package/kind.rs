//! Entry and record kinds.
//!
//! Requests name a kind as free text (`"spawnable"`, `"MONODISC"`). The text
//! is resolved exactly once, at the input boundary, into an [`ItemKind`];
//! everything downstream dispatches with an exhaustive `match`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::asset::AssetType;
use crate::error::{CatalogError, CatalogResult};

/// Kinds of content entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    /// An object that can be spawned into the world.
    Spawnable,
    /// A playable level.
    Level,
    /// A player avatar.
    Avatar,
}

/// Kinds of metadata record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    /// A record carrying a single audio clip.
    #[serde(rename = "MONODISC")]
    AudioDisc,
    /// A descriptive tag.
    Tag,
    /// Surface/material description.
    Surface,
}

/// Requirement placed on the asset bound to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRequirement {
    /// Any resolvable asset is accepted.
    Any,
    /// The asset must have exactly this type.
    Exactly(AssetType),
}

impl AssetRequirement {
    /// Whether `asset_type` satisfies this requirement.
    pub fn accepts(&self, asset_type: AssetType) -> bool {
        match self {
            AssetRequirement::Any => true,
            AssetRequirement::Exactly(required) => *required == asset_type,
        }
    }
}

impl EntryKind {
    pub const ALL: [EntryKind; 3] = [EntryKind::Spawnable, EntryKind::Level, EntryKind::Avatar];

    /// Request keyword for this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            EntryKind::Spawnable => "SPAWNABLE",
            EntryKind::Level => "LEVEL",
            EntryKind::Avatar => "AVATAR",
        }
    }

    /// Segment used in identifiers of entries of this kind.
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Spawnable => "Spawnable",
            EntryKind::Level => "Level",
            EntryKind::Avatar => "Avatar",
        }
    }

    /// Asset type an entry of this kind must reference.
    pub fn requirement(&self) -> AssetRequirement {
        match self {
            EntryKind::Spawnable | EntryKind::Avatar => AssetRequirement::Exactly(AssetType::Prefab),
            EntryKind::Level => AssetRequirement::Exactly(AssetType::Scene),
        }
    }
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::AudioDisc, RecordKind::Tag, RecordKind::Surface];

    pub fn keyword(&self) -> &'static str {
        match self {
            RecordKind::AudioDisc => "MONODISC",
            RecordKind::Tag => "TAG",
            RecordKind::Surface => "SURFACE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::AudioDisc => "MonoDisc",
            RecordKind::Tag => "Tag",
            RecordKind::Surface => "Surface",
        }
    }

    /// Asset requirement for the record's asset reference.
    pub fn requirement(&self) -> AssetRequirement {
        match self {
            RecordKind::AudioDisc => AssetRequirement::Exactly(AssetType::AudioClip),
            RecordKind::Tag | RecordKind::Surface => AssetRequirement::Any,
        }
    }

    /// Whether records of this kind carry a typed payload.
    pub fn requires_payload(&self) -> bool {
        matches!(self, RecordKind::AudioDisc)
    }
}

/// A parsed entry or record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Entry(EntryKind),
    Record(RecordKind),
}

impl ItemKind {
    /// Parse a kind keyword, case-insensitively.
    ///
    /// # Example
    ///
    /// ```
    /// use modkit::package::{EntryKind, ItemKind, RecordKind};
    ///
    /// assert_eq!(ItemKind::parse("spawnable").unwrap(), ItemKind::Entry(EntryKind::Spawnable));
    /// assert_eq!(ItemKind::parse("MonoDisc").unwrap(), ItemKind::Record(RecordKind::AudioDisc));
    /// assert!(ItemKind::parse("BOGUS").is_err());
    /// ```
    pub fn parse(value: &str) -> CatalogResult<Self> {
        let normalized = value.trim().to_uppercase();
        let kind = match normalized.as_str() {
            "SPAWNABLE" => ItemKind::Entry(EntryKind::Spawnable),
            "LEVEL" => ItemKind::Entry(EntryKind::Level),
            "AVATAR" => ItemKind::Entry(EntryKind::Avatar),
            "MONODISC" | "AUDIODISC" => ItemKind::Record(RecordKind::AudioDisc),
            "TAG" => ItemKind::Record(RecordKind::Tag),
            "SURFACE" => ItemKind::Record(RecordKind::Surface),
            _ => return Err(CatalogError::InvalidKind(value.trim().to_string())),
        };
        Ok(kind)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ItemKind::Entry(kind) => kind.keyword(),
            ItemKind::Record(kind) => kind.keyword(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Entry(kind) => kind.label(),
            ItemKind::Record(kind) => kind.label(),
        }
    }

    pub fn requirement(&self) -> AssetRequirement {
        match self {
            ItemKind::Entry(kind) => kind.requirement(),
            ItemKind::Record(kind) => kind.requirement(),
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, ItemKind::Entry(_))
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl From<EntryKind> for ItemKind {
    fn from(kind: EntryKind) -> Self {
        ItemKind::Entry(kind)
    }
}

impl From<RecordKind> for ItemKind {
    fn from(kind: RecordKind) -> Self {
        ItemKind::Record(kind)
    }
}
