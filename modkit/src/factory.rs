//! Entry and record creation.
//!
//! [`ItemFactory`] turns a title, a kind, and an asset path into a persisted
//! item appended to a package. Callers hold the package exclusively (see
//! [`Catalog::with_package`](crate::catalog::Catalog::with_package)) for the
//! duration of a call.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::asset::{AssetRef, AssetResolver};
use crate::error::{CatalogError, CatalogResult, StoreError};
use crate::package::{
    entry_filename, identifier_segment, record_filename, AssetRequirement, ContentEntry, EntryKind,
    Identifier, MetadataRecord, Package, RecordKind, RecordPayload,
};
use crate::store::PackageStore;

/// Creates content entries and metadata records.
pub struct ItemFactory {
    resolver: Arc<dyn AssetResolver>,
    store: Arc<dyn PackageStore>,
}

impl ItemFactory {
    pub fn new(resolver: Arc<dyn AssetResolver>, store: Arc<dyn PackageStore>) -> Self {
        Self { resolver, store }
    }

    /// Create a content entry and append it to `package`.
    pub fn create_entry(
        &self,
        package: &mut Package,
        title: &str,
        kind: EntryKind,
        asset_path: &str,
    ) -> CatalogResult<ContentEntry> {
        let slug = identifier_segment("title", title)?;
        let asset = self.resolve(asset_path, kind.label(), kind.requirement())?;
        let id = self.child_id(package, kind.label(), &slug)?;

        let dir = self.store.package_dir(&package.id);
        let storage_path = self.store.unique_path(&dir.join(entry_filename(&id)));
        let entry = ContentEntry {
            id,
            title: title.trim().to_string(),
            kind,
            asset,
            storage_path,
        };
        let written = [entry.storage_path.clone()];
        if let Err(e) = self.store.write_entry(package, &entry, &entry.storage_path) {
            return Err(self.abandon(package, &entry.id, &written, e));
        }

        let was_dirty = package.dirty;
        package.push_entry(entry.clone());
        if let Err(e) = self.store.save_package(package) {
            package.entries.pop();
            package.dirty = was_dirty;
            warn!(package = %package.id, entry = %entry.id, error = %e, "Rolled back entry");
            return Err(self.abandon(package, &entry.id, &written, e));
        }

        debug!(package = %package.id, entry = %entry.id, kind = %kind, "Created entry");
        Ok(entry)
    }

    /// Create a metadata record and append it to `package`.
    ///
    /// Payload-bearing kinds require the asset to have the payload's type.
    pub fn create_record(
        &self,
        package: &mut Package,
        title: &str,
        kind: RecordKind,
        asset_path: &str,
    ) -> CatalogResult<MetadataRecord> {
        let slug = identifier_segment("title", title)?;
        let asset = self.resolve(asset_path, kind.label(), kind.requirement())?;
        let id = self.child_id(package, kind.label(), &slug)?;

        let payload = if kind.requires_payload() {
            RecordPayload::Audio(asset)
        } else {
            RecordPayload::Reference(asset)
        };

        let dir = self.store.package_dir(&package.id);
        let storage_path = self.store.unique_path(&dir.join(record_filename(&id)));
        let mut record = MetadataRecord {
            id,
            title: title.trim().to_string(),
            kind,
            payload: Some(payload),
            storage_path,
            packed_assets: Vec::new(),
        };
        let mut written = vec![record.storage_path.clone()];
        if let Err(e) = self.store.write_record(package, &record, &record.storage_path) {
            return Err(self.abandon(package, &record.id, &written, e));
        }
        match self.store.generate_packed_assets(package, &record) {
            Ok(files) => record.packed_assets = files,
            Err(e) => return Err(self.abandon(package, &record.id, &written, e)),
        }
        written.extend(record.packed_assets.iter().cloned());

        let was_dirty = package.dirty;
        package.push_record(record.clone());
        if let Err(e) = self.store.save_package(package) {
            package.records.pop();
            package.dirty = was_dirty;
            warn!(package = %package.id, record = %record.id, error = %e, "Rolled back record");
            return Err(self.abandon(package, &record.id, &written, e));
        }

        debug!(
            package = %package.id,
            record = %record.id,
            kind = %kind,
            packed = record.packed_assets.len(),
            "Created record"
        );
        Ok(record)
    }

    /// Remove the files written for an item that was not kept and convert
    /// `err` for the caller.
    fn abandon(
        &self,
        package: &Package,
        item: &Identifier,
        written: &[PathBuf],
        err: StoreError,
    ) -> CatalogError {
        if let Err(e) = self.store.discard(written) {
            warn!(package = %package.id, item = %item, error = %e, "Failed to discard item files");
        }
        err.into()
    }

    fn resolve(
        &self,
        path: &str,
        kind: &str,
        requirement: AssetRequirement,
    ) -> CatalogResult<AssetRef> {
        let path = path.trim();
        if path.is_empty() {
            return Err(CatalogError::InvalidInput("asset path is empty".to_string()));
        }

        let asset = self
            .resolver
            .resolve(path)?
            .ok_or_else(|| CatalogError::AssetNotFound(path.to_string()))?;

        match requirement {
            AssetRequirement::Exactly(expected) if expected != asset.asset_type => {
                Err(CatalogError::TypeMismatch {
                    path: path.to_string(),
                    kind: kind.to_string(),
                    expected,
                    actual: asset.asset_type,
                })
            }
            _ => Ok(asset),
        }
    }

    fn child_id(&self, package: &Package, label: &str, slug: &str) -> CatalogResult<Identifier> {
        let id = package.id.child(&[label, slug]);
        if package.contains_item(&id) {
            return Err(CatalogError::DuplicateIdentifier(id));
        }
        Ok(id)
    }
}
