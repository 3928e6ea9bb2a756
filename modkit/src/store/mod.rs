//! Package persistence.
//!
//! The catalog core never touches the filesystem directly. Everything it
//! persists goes through a [`PackageStore`]: package directories, package
//! manifests, entry and record files, and the packed sub-assets generated for
//! records.

mod fs;

pub use self::fs::FsPackageStore;

use std::path::{Path, PathBuf};

use crate::error::StoreResult;
use crate::package::{ContentEntry, Identifier, MetadataRecord, Package};

/// Persistence collaborator for packages and their items.
pub trait PackageStore: Send + Sync {
    /// Storage directory of a package. Pure path computation.
    fn package_dir(&self, id: &Identifier) -> PathBuf;

    /// Create the storage directory of a package.
    fn create_package_dir(&self, id: &Identifier) -> StoreResult<PathBuf>;

    /// Persist the package manifest.
    fn save_package(&self, package: &Package) -> StoreResult<()>;

    /// Persist a content entry at `path`.
    fn write_entry(&self, package: &Package, entry: &ContentEntry, path: &Path)
        -> StoreResult<()>;

    /// Persist a metadata record at `path`.
    fn write_record(
        &self,
        package: &Package,
        record: &MetadataRecord,
        path: &Path,
    ) -> StoreResult<()>;

    /// Generate the packed sub-assets of a record, returning the files written.
    /// A failed generation leaves none of its files behind.
    fn generate_packed_assets(
        &self,
        package: &Package,
        record: &MetadataRecord,
    ) -> StoreResult<Vec<PathBuf>>;

    /// Remove files written for an item that was not kept. Paths that do not
    /// exist are skipped.
    fn discard(&self, paths: &[PathBuf]) -> StoreResult<()>;

    /// Whether something is already stored at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// A collision-free variant of `path`.
    fn unique_path(&self, path: &Path) -> PathBuf {
        crate::package::unique_path(path, |p| self.exists(p))
    }

    /// Load every persisted package.
    fn load_all(&self) -> StoreResult<Vec<Package>>;
}
