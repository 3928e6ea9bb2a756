//! Authoring operations over a catalog.
//!
//! [`Workshop`] is the single entry point for the authoring workflow. It owns
//! no global state: the catalog and every collaborator are injected, so one
//! process can host any number of independent workshops.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use modkit::asset::{AssetType, MemoryAssetResolver};
//! use modkit::catalog::Catalog;
//! use modkit::package::EntryKind;
//! use modkit::store::FsPackageStore;
//! use modkit::workshop::Workshop;
//!
//! let temp = tempfile::tempdir().unwrap();
//! let resolver = MemoryAssetResolver::new().with_asset("Assets/Gun01.prefab", AssetType::Prefab);
//! let workshop = Workshop::new(
//!     Arc::new(Catalog::new()),
//!     Arc::new(FsPackageStore::new(temp.path().join("packages"))),
//!     Arc::new(resolver),
//!     temp.path().join("dist"),
//! );
//!
//! let package = workshop.create_package("Jane", "ExampleMod").unwrap();
//! workshop
//!     .create_entry(&package.id, "Gun01", EntryKind::Spawnable, "Assets/Gun01.prefab")
//!     .unwrap();
//! assert!(workshop.pack(&package.id).unwrap().is_fresh());
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::asset::AssetResolver;
use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};
use crate::events::{CatalogEvent, CatalogObserver};
use crate::factory::ItemFactory;
use crate::package::{
    ContentEntry, EntryKind, Identifier, IdentifierAllocator, ItemKind, MetadataRecord, Package,
    RecordKind, SlugAllocator,
};
use crate::packer::{
    ArtifactWriter, DefaultValidator, GzipArtifactWriter, PackOutcome, PackageValidator, Packer,
};
use crate::store::PackageStore;

/// An entry or record created through [`Workshop::create_item`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedItem {
    pub identifier: Identifier,
    pub kind: String,
}

/// Orchestrates package creation, item creation and packing.
pub struct Workshop {
    catalog: Arc<Catalog>,
    allocator: Arc<dyn IdentifierAllocator>,
    resolver: Arc<dyn AssetResolver>,
    store: Arc<dyn PackageStore>,
    validator: Arc<dyn PackageValidator>,
    writer: Arc<dyn ArtifactWriter>,
    output_dir: PathBuf,
    observers: Vec<Arc<dyn CatalogObserver>>,
}

impl Workshop {
    /// Create a workshop with the default allocator, validator and artifact
    /// writer, and no observers.
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn PackageStore>,
        resolver: Arc<dyn AssetResolver>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            allocator: Arc::new(SlugAllocator::new()),
            validator: Arc::new(DefaultValidator::new(resolver.clone())),
            resolver,
            store,
            writer: Arc::new(GzipArtifactWriter::new()),
            output_dir: output_dir.into(),
            observers: Vec::new(),
        }
    }

    /// Create a workshop whose catalog is loaded from `store`.
    pub fn open(
        store: Arc<dyn PackageStore>,
        resolver: Arc<dyn AssetResolver>,
        output_dir: impl Into<PathBuf>,
    ) -> CatalogResult<Self> {
        let catalog = Catalog::from_packages(store.load_all()?);
        Ok(Self::new(Arc::new(catalog), store, resolver, output_dir))
    }

    pub fn with_allocator(mut self, allocator: Arc<dyn IdentifierAllocator>) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn PackageValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_artifact_writer(mut self, writer: Arc<dyn ArtifactWriter>) -> Self {
        self.writer = writer;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn CatalogObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Create and register a new package.
    ///
    /// Nothing is persisted unless the allocated identifier is free.
    pub fn create_package(&self, author: &str, name: &str) -> CatalogResult<Package> {
        let (author, name) = (author.trim(), name.trim());
        if author.is_empty() {
            return Err(CatalogError::InvalidInput("author cannot be empty".to_string()));
        }
        if name.is_empty() {
            return Err(CatalogError::InvalidInput("name cannot be empty".to_string()));
        }

        let id = self.allocator.allocate(author, name)?;
        let package = self.catalog.register_with(id.clone(), || {
            self.store.create_package_dir(&id)?;
            let package = Package::new(id.clone(), author, name);
            self.store.save_package(&package)?;
            Ok(package)
        })?;

        self.emit(CatalogEvent::PackageCreated {
            id: package.id.clone(),
        });
        Ok(package)
    }

    /// Create a content entry in the package `package_id`.
    pub fn create_entry(
        &self,
        package_id: &Identifier,
        title: &str,
        kind: EntryKind,
        asset_path: &str,
    ) -> CatalogResult<ContentEntry> {
        let factory = self.factory();
        let entry = self.catalog.with_package(package_id, |package| {
            factory.create_entry(package, title, kind, asset_path)
        })?;

        self.emit(CatalogEvent::EntryAdded {
            package: package_id.clone(),
            entry: entry.id.clone(),
            kind,
        });
        Ok(entry)
    }

    /// Create a metadata record in the package `package_id`.
    pub fn create_record(
        &self,
        package_id: &Identifier,
        title: &str,
        kind: RecordKind,
        asset_path: &str,
    ) -> CatalogResult<MetadataRecord> {
        let factory = self.factory();
        let record = self.catalog.with_package(package_id, |package| {
            factory.create_record(package, title, kind, asset_path)
        })?;

        self.emit(CatalogEvent::RecordAdded {
            package: package_id.clone(),
            record: record.id.clone(),
            kind,
        });
        Ok(record)
    }

    /// Create an entry or a record, depending on the category of `kind`.
    pub fn create_item(
        &self,
        package_id: &Identifier,
        title: &str,
        kind: ItemKind,
        asset_path: &str,
    ) -> CatalogResult<CreatedItem> {
        let identifier = match kind {
            ItemKind::Entry(kind) => self.create_entry(package_id, title, kind, asset_path)?.id,
            ItemKind::Record(kind) => self.create_record(package_id, title, kind, asset_path)?.id,
        };
        Ok(CreatedItem {
            identifier,
            kind: kind.keyword().to_string(),
        })
    }

    /// Validate and pack the package `package_id`.
    ///
    /// The package holds its lock for the whole operation. The in-memory
    /// package only changes once the artifact and the updated manifest are
    /// both written. If the manifest cannot be saved the new artifact is
    /// removed again.
    pub fn pack(&self, package_id: &Identifier) -> CatalogResult<PackOutcome> {
        let packer = self.packer();
        let outcome = self.catalog.with_package(package_id, |package| {
            let mut staged = package.clone();
            let outcome = packer.pack(&mut staged)?;
            if outcome.is_fresh() {
                if let Err(e) = self.store.save_package(&staged) {
                    let artifact = outcome.artifact();
                    if let Err(cleanup) = self.writer.discard(artifact) {
                        warn!(
                            package = %package.id,
                            path = %artifact.path.display(),
                            error = %cleanup,
                            "Failed to discard artifact"
                        );
                    }
                    return Err(e.into());
                }
                *package = staged;
            }
            Ok(outcome)
        })?;

        self.emit(CatalogEvent::PackagePacked {
            id: package_id.clone(),
            artifact: outcome.artifact().path.clone(),
            fresh: outcome.is_fresh(),
        });
        Ok(outcome)
    }

    /// Identifiers of all packages, in identifier order.
    pub fn list_packages(&self) -> Vec<Identifier> {
        self.catalog.identifiers()
    }

    /// A snapshot of the package `package_id`.
    pub fn package_info(&self, package_id: &Identifier) -> CatalogResult<Package> {
        self.catalog.get_package(package_id)
    }

    fn factory(&self) -> ItemFactory {
        ItemFactory::new(self.resolver.clone(), self.store.clone())
    }

    fn packer(&self) -> Packer {
        Packer::new(
            self.validator.clone(),
            self.writer.clone(),
            self.output_dir.clone(),
        )
    }

    fn emit(&self, event: CatalogEvent) {
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetType, MemoryAssetResolver};
    use crate::error::{ErrorCode, StoreError, StoreResult};
    use crate::store::FsPackageStore;
    use parking_lot::Mutex;
    use std::io;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<CatalogEvent>>,
    }

    impl CatalogObserver for RecordingObserver {
        fn on_event(&self, event: &CatalogEvent) {
            self.events.lock().push(event.clone());
        }
    }

    fn setup() -> (TempDir, Workshop, Arc<RecordingObserver>) {
        let temp = TempDir::new().unwrap();
        let resolver = MemoryAssetResolver::new()
            .with_asset("Assets/Gun01.prefab", AssetType::Prefab)
            .with_asset("Assets/Theme.ogg", AssetType::AudioClip);
        let observer = Arc::new(RecordingObserver::default());
        let workshop = Workshop::new(
            Arc::new(Catalog::new()),
            Arc::new(FsPackageStore::new(temp.path().join("packages"))),
            Arc::new(resolver),
            temp.path().join("dist"),
        )
        .with_observer(observer.clone());
        (temp, workshop, observer)
    }

    #[test]
    fn test_create_package_persists_and_registers() {
        let (temp, workshop, observer) = setup();
        let package = workshop.create_package("Jane", "ExampleMod").unwrap();

        assert_eq!(package.id.as_str(), "Jane.ExampleMod");
        assert_eq!(package.name, "ExampleMod");
        assert!(workshop.catalog().has_package(&package.id));
        assert!(temp
            .path()
            .join("packages/Jane.ExampleMod/package.json")
            .is_file());
        assert_eq!(
            observer.events.lock().as_slice(),
            &[CatalogEvent::PackageCreated { id: package.id }]
        );
    }

    #[test]
    fn test_create_package_keeps_lossy_names_apart() {
        let (_temp, workshop, _) = setup();
        let plain = workshop.create_package("Jane", "ExampleMod").unwrap();
        let spaced = workshop.create_package("Jane", "Example Mod").unwrap();
        let dashed = workshop.create_package("Jane", "Example-Mod").unwrap();

        assert_ne!(spaced.id, plain.id);
        assert_ne!(spaced.id, dashed.id);
        assert_eq!(spaced.name, "Example Mod");
        assert_eq!(workshop.list_packages().len(), 3);
    }

    #[test]
    fn test_create_package_non_ascii() {
        let (temp, workshop, _) = setup();
        let package = workshop.create_package("山田", "モッド").unwrap();

        assert_eq!(package.author, "山田");
        assert!(workshop.catalog().has_package(&package.id));
        assert!(temp
            .path()
            .join("packages")
            .join(package.id.as_str())
            .join("package.json")
            .is_file());
    }

    #[test]
    fn test_create_package_empty_fields() {
        let (temp, workshop, observer) = setup();
        for (author, name) in [("", "Mod"), ("Jane", ""), ("  ", "  ")] {
            let err = workshop.create_package(author, name).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidInput);
        }
        assert!(workshop.list_packages().is_empty());
        assert!(!temp.path().join("packages").exists());
        assert!(observer.events.lock().is_empty());
    }

    #[test]
    fn test_create_package_duplicate_touches_nothing() {
        let (temp, workshop, _) = setup();
        workshop.create_package("Jane", "ExampleMod").unwrap();
        let manifest = temp.path().join("packages/Jane.ExampleMod/package.json");
        let before = std::fs::read_to_string(&manifest).unwrap();

        let err = workshop.create_package("Jane", " ExampleMod ").unwrap_err();

        assert_eq!(err.code(), ErrorCode::DuplicateIdentifier);
        assert_eq!(workshop.list_packages().len(), 1);
        assert_eq!(std::fs::read_to_string(&manifest).unwrap(), before);
    }

    #[test]
    fn test_create_item_dispatches_by_category() {
        let (_temp, workshop, _) = setup();
        let package = workshop.create_package("Jane", "ExampleMod").unwrap();

        let entry = workshop
            .create_item(
                &package.id,
                "Gun01",
                ItemKind::parse("spawnable").unwrap(),
                "Assets/Gun01.prefab",
            )
            .unwrap();
        let record = workshop
            .create_item(
                &package.id,
                "Theme",
                ItemKind::parse("MonoDisc").unwrap(),
                "Assets/Theme.ogg",
            )
            .unwrap();

        assert_eq!(entry.kind, "SPAWNABLE");
        assert_eq!(record.kind, "MONODISC");
        let info = workshop.package_info(&package.id).unwrap();
        assert_eq!(info.entries.len(), 1);
        assert_eq!(info.records.len(), 1);
    }

    #[test]
    fn test_create_entry_unknown_package() {
        let (_temp, workshop, observer) = setup();
        let id = Identifier::parse("Nobody.Nothing").unwrap();
        let err = workshop
            .create_entry(&id, "Gun01", EntryKind::Spawnable, "Assets/Gun01.prefab")
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(observer.events.lock().is_empty());
    }

    #[test]
    fn test_pack_persists_artifact_on_manifest() {
        let (temp, workshop, observer) = setup();
        let package = workshop.create_package("Jane", "ExampleMod").unwrap();
        workshop
            .create_entry(&package.id, "Gun01", EntryKind::Spawnable, "Assets/Gun01.prefab")
            .unwrap();

        let outcome = workshop.pack(&package.id).unwrap();
        assert!(outcome.is_fresh());

        let reopened = Workshop::open(
            Arc::new(FsPackageStore::new(temp.path().join("packages"))),
            Arc::new(MemoryAssetResolver::new()),
            temp.path().join("dist"),
        )
        .unwrap();
        let info = reopened.package_info(&package.id).unwrap();
        assert!(!info.dirty);
        assert_eq!(info.packed.as_ref(), Some(outcome.artifact()));
        assert!(matches!(
            observer.events.lock().last(),
            Some(CatalogEvent::PackagePacked { fresh: true, .. })
        ));
    }

    #[test]
    fn test_pack_failure_leaves_package_untouched() {
        let (_temp, workshop, _) = setup();
        let package = workshop.create_package("Jane", "ExampleMod").unwrap();

        let err = workshop.pack(&package.id).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PackingFailed);
        assert_eq!(workshop.package_info(&package.id).unwrap(), package);
    }

    struct FlakyStore {
        inner: FsPackageStore,
        fail_saves: AtomicBool,
    }

    impl PackageStore for FlakyStore {
        fn package_dir(&self, id: &Identifier) -> PathBuf {
            self.inner.package_dir(id)
        }
        fn create_package_dir(&self, id: &Identifier) -> StoreResult<PathBuf> {
            self.inner.create_package_dir(id)
        }
        fn save_package(&self, package: &Package) -> StoreResult<()> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(StoreError::WriteFailed {
                    path: self.package_dir(&package.id),
                    source: io::Error::new(io::ErrorKind::Other, "disk full"),
                });
            }
            self.inner.save_package(package)
        }
        fn write_entry(&self, p: &Package, e: &ContentEntry, path: &Path) -> StoreResult<()> {
            self.inner.write_entry(p, e, path)
        }
        fn write_record(&self, p: &Package, r: &MetadataRecord, path: &Path) -> StoreResult<()> {
            self.inner.write_record(p, r, path)
        }
        fn generate_packed_assets(
            &self,
            p: &Package,
            r: &MetadataRecord,
        ) -> StoreResult<Vec<PathBuf>> {
            self.inner.generate_packed_assets(p, r)
        }
        fn discard(&self, paths: &[PathBuf]) -> StoreResult<()> {
            self.inner.discard(paths)
        }
        fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path)
        }
        fn load_all(&self) -> StoreResult<Vec<Package>> {
            self.inner.load_all()
        }
    }

    #[test]
    fn test_pack_failed_save_removes_artifact() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(FlakyStore {
            inner: FsPackageStore::new(temp.path().join("packages")),
            fail_saves: AtomicBool::new(false),
        });
        let dist = temp.path().join("dist");
        let workshop = Workshop::new(
            Arc::new(Catalog::new()),
            store.clone(),
            Arc::new(MemoryAssetResolver::new().with_asset("Assets/Gun01.prefab", AssetType::Prefab)),
            &dist,
        );
        let package = workshop.create_package("Jane", "ExampleMod").unwrap();
        workshop
            .create_entry(&package.id, "Gun01", EntryKind::Spawnable, "Assets/Gun01.prefab")
            .unwrap();

        store.fail_saves.store(true, Ordering::SeqCst);
        let err = workshop.pack(&package.id).unwrap_err();

        assert_eq!(err.code(), ErrorCode::Internal);
        let leftovers: Vec<_> = std::fs::read_dir(&dist)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".modpack.gz"))
            .collect();
        assert!(leftovers.is_empty(), "artifact left behind: {:?}", leftovers);
        let info = workshop.package_info(&package.id).unwrap();
        assert!(info.dirty);
        assert!(info.packed.is_none());

        store.fail_saves.store(false, Ordering::SeqCst);
        assert!(workshop.pack(&package.id).unwrap().is_fresh());
    }
}
