//! Post-mutation catalog events.
//!
//! Observers are notified after a mutation has fully succeeded. They cannot
//! fail the operation that produced the event.

use std::path::PathBuf;

use tracing::info;

use crate::package::{EntryKind, Identifier, RecordKind};

/// Something that changed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    PackageCreated {
        id: Identifier,
    },
    EntryAdded {
        package: Identifier,
        entry: Identifier,
        kind: EntryKind,
    },
    RecordAdded {
        package: Identifier,
        record: Identifier,
        kind: RecordKind,
    },
    PackagePacked {
        id: Identifier,
        artifact: PathBuf,
        /// False when the existing artifact was reused.
        fresh: bool,
    },
}

impl CatalogEvent {
    /// The package the event concerns.
    pub fn package_id(&self) -> &Identifier {
        match self {
            CatalogEvent::PackageCreated { id } | CatalogEvent::PackagePacked { id, .. } => id,
            CatalogEvent::EntryAdded { package, .. } | CatalogEvent::RecordAdded { package, .. } => {
                package
            }
        }
    }
}

/// Receives catalog events.
pub trait CatalogObserver: Send + Sync {
    fn on_event(&self, event: &CatalogEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl CatalogObserver for LoggingObserver {
    fn on_event(&self, event: &CatalogEvent) {
        match event {
            CatalogEvent::PackageCreated { id } => {
                info!(package = %id, "Package created");
            }
            CatalogEvent::EntryAdded {
                package,
                entry,
                kind,
            } => {
                info!(package = %package, entry = %entry, kind = %kind, "Entry added");
            }
            CatalogEvent::RecordAdded {
                package,
                record,
                kind,
            } => {
                info!(package = %package, record = %record, kind = %kind, "Record added");
            }
            CatalogEvent::PackagePacked {
                id,
                artifact,
                fresh,
            } => {
                info!(
                    package = %id,
                    artifact = %artifact.display(),
                    fresh = *fresh,
                    "Package packed"
                );
            }
        }
    }
}
