//! Filesystem-backed package store.
//!
//! Layout under the store root:
//!
//! ```text
//! packages/
//! └── Jane.ExampleMod/
//!     ├── package.json
//!     ├── Jane.ExampleMod.Spawnable.Gun01.entry.json
//!     ├── Jane.ExampleMod.MonoDisc.Theme.record.json
//!     └── Jane.ExampleMod.MonoDisc.Theme.packed.json
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use super::PackageStore;
use crate::error::{StoreError, StoreResult};
use crate::package::{
    package_dir_name, packed_assets_filename, ContentEntry, Identifier, MetadataRecord, Package,
    MANIFEST_FILENAME,
};

/// Stores packages as JSON documents in per-package directories.
#[derive(Debug, Clone)]
pub struct FsPackageStore {
    root: PathBuf,
}

impl FsPackageStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(value).map_err(|e| StoreError::Serialization {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, content).map_err(|e| StoreError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn read_package(&self, manifest: &Path) -> StoreResult<Package> {
        let content = fs::read_to_string(manifest).map_err(|e| StoreError::ReadFailed {
            path: manifest.to_path_buf(),
            source: e,
        })?;
        let package: Package =
            serde_json::from_str(&content).map_err(|e| StoreError::Serialization {
                path: manifest.to_path_buf(),
                source: e,
            })?;

        let dir_name = manifest
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if dir_name != package_dir_name(&package.id) {
            return Err(StoreError::Corrupt {
                path: manifest.to_path_buf(),
                reason: format!(
                    "manifest identifier {} does not match directory {}",
                    package.id, dir_name
                ),
            });
        }
        Ok(package)
    }
}

impl PackageStore for FsPackageStore {
    fn package_dir(&self, id: &Identifier) -> PathBuf {
        self.root.join(package_dir_name(id))
    }

    fn create_package_dir(&self, id: &Identifier) -> StoreResult<PathBuf> {
        let dir = self.package_dir(id);
        fs::create_dir_all(&dir).map_err(|e| StoreError::CreateDirectoryFailed {
            path: dir.clone(),
            source: e,
        })?;
        Ok(dir)
    }

    fn save_package(&self, package: &Package) -> StoreResult<()> {
        let path = self.package_dir(&package.id).join(MANIFEST_FILENAME);
        self.write_json(&path, package)?;
        debug!(package = %package.id, path = %path.display(), "Saved package manifest");
        Ok(())
    }

    fn write_entry(
        &self,
        package: &Package,
        entry: &ContentEntry,
        path: &Path,
    ) -> StoreResult<()> {
        self.write_json(
            path,
            &json!({
                "package": package.id,
                "entry": entry,
            }),
        )
    }

    fn write_record(
        &self,
        package: &Package,
        record: &MetadataRecord,
        path: &Path,
    ) -> StoreResult<()> {
        self.write_json(
            path,
            &json!({
                "package": package.id,
                "record": record,
            }),
        )
    }

    fn generate_packed_assets(
        &self,
        package: &Package,
        record: &MetadataRecord,
    ) -> StoreResult<Vec<PathBuf>> {
        let dir = self.package_dir(&package.id);
        let path = dir.join(packed_assets_filename(&record.storage_path));

        let payload = record.payload.as_ref().map(|p| p.asset().path.clone());
        let written = self.write_json(
            &path,
            &json!({
                "record": record.id,
                "kind": record.kind,
                "payload": payload,
            }),
        );
        if let Err(e) = written {
            self.discard(std::slice::from_ref(&path))?;
            return Err(e);
        }
        Ok(vec![path])
    }

    fn discard(&self, paths: &[PathBuf]) -> StoreResult<()> {
        for path in paths {
            match fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "Discarded file"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(StoreError::WriteFailed {
                        path: path.clone(),
                        source: e,
                    })
                }
            }
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn load_all(&self) -> StoreResult<Vec<Package>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::ReadFailed {
            path: self.root.clone(),
            source: e,
        })?;

        let mut packages = Vec::new();
        for entry in entries.flatten() {
            let manifest = entry.path().join(MANIFEST_FILENAME);
            if !manifest.is_file() {
                continue;
            }
            match self.read_package(&manifest) {
                Ok(package) => packages.push(package),
                Err(e @ StoreError::Corrupt { .. }) => {
                    warn!(error = %e, "Skipping corrupt package manifest");
                }
                Err(e) => return Err(e),
            }
        }

        packages.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(packages)
    }
}
