//! Package data model.
//!
//! This module provides the core data structures of the catalog: identifiers,
//! packages, and the two kinds of item a package holds.
//!
//! # Overview
//!
//! - **Identifier**: opaque, dotted, globally unique token
//! - **Package**: author, name, version, and two ordered item collections
//! - **ContentEntry**: a typed item bound to one resolved asset
//! - **MetadataRecord**: a descriptive item, optionally carrying a typed payload
//! - **ItemKind**: the closed set of entry and record kinds
//!
//! # Type Hierarchy
//!
//! ```text
//! Package
//! ├── id: Identifier                 ("Jane.ExampleMod")
//! ├── entries: Vec<ContentEntry>     ("Jane.ExampleMod.Spawnable.Gun01", ...)
//! └── records: Vec<MetadataRecord>   ("Jane.ExampleMod.MonoDisc.Theme", ...)
//! ```

mod core;
mod id;
mod item;
mod kind;
mod naming;

pub use self::core::{Package, INITIAL_VERSION};
pub use id::{identifier_segment, slugify, Identifier, IdentifierAllocator, SlugAllocator};
pub use item::{ContentEntry, MetadataRecord, RecordPayload};
pub use kind::{AssetRequirement, EntryKind, ItemKind, RecordKind};

pub use naming::{
    artifact_filename, entry_filename, package_dir_name, packed_assets_filename,
    record_filename, unique_path, ARTIFACT_EXTENSION, MANIFEST_FILENAME,
};

// Re-export semver::Version for convenience
pub use semver::Version;
