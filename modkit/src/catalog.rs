//! The package catalog.
//!
//! The catalog is the process-wide index from identifier to package. The
//! outer map is guarded by a read-write lock; each package sits behind its own
//! mutex so appends to different packages never contend.
//!
//! Registration is check-then-admit under the write lock. Whatever needs to be
//! persisted for a new package runs inside [`Catalog::register_with`], after
//! the duplicate check and before the insert, so a duplicate never reaches
//! storage.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::{CatalogError, CatalogResult};
use crate::package::{Identifier, Package};

type Slot = Arc<Mutex<Package>>;

/// Registry of all packages known to the process.
#[derive(Debug, Default)]
pub struct Catalog {
    packages: RwLock<BTreeMap<Identifier, Slot>>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from packages loaded at startup.
    ///
    /// Later packages with an identifier already seen are ignored.
    pub fn from_packages(packages: impl IntoIterator<Item = Package>) -> Self {
        let mut map = BTreeMap::new();
        for package in packages {
            map.entry(package.id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(package)));
        }
        Self {
            packages: RwLock::new(map),
        }
    }

    pub fn has_package(&self, id: &Identifier) -> bool {
        self.packages.read().contains_key(id)
    }

    /// A snapshot of the package with `id`.
    pub fn get_package(&self, id: &Identifier) -> CatalogResult<Package> {
        let slot = self.slot(id)?;
        let package = slot.lock().clone();
        Ok(package)
    }

    /// Admit a package.
    ///
    /// Fails with [`CatalogError::DuplicateIdentifier`] and leaves the catalog
    /// unchanged if the identifier is taken.
    pub fn register_package(&self, package: Package) -> CatalogResult<()> {
        self.register_with(package.id.clone(), move || Ok(package))
            .map(|_| ())
    }

    /// Atomically check `id`, build the package, and admit it.
    ///
    /// `build` runs under the catalog write lock and only when `id` is free.
    /// If it fails, nothing is admitted and its error is returned.
    pub fn register_with<F>(&self, id: Identifier, build: F) -> CatalogResult<Package>
    where
        F: FnOnce() -> CatalogResult<Package>,
    {
        let mut packages = self.packages.write();
        if packages.contains_key(&id) {
            return Err(CatalogError::DuplicateIdentifier(id));
        }

        let package = build()?;
        if package.id != id {
            return Err(CatalogError::internal(format!(
                "built package {} does not match reserved identifier {}",
                package.id, id
            )));
        }

        packages.insert(id, Arc::new(Mutex::new(package.clone())));
        Ok(package)
    }

    /// Run `f` with exclusive access to the package with `id`.
    ///
    /// The catalog lock is released before `f` runs, so long operations on
    /// one package do not block the rest of the catalog.
    pub fn with_package<F, T>(&self, id: &Identifier, f: F) -> CatalogResult<T>
    where
        F: FnOnce(&mut Package) -> CatalogResult<T>,
    {
        let slot = self.slot(id)?;
        let mut package = slot.lock();
        f(&mut package)
    }

    /// Snapshots of all packages, in identifier order.
    pub fn list_packages(&self) -> Vec<Package> {
        let slots: Vec<Slot> = self.packages.read().values().cloned().collect();
        slots.iter().map(|slot| slot.lock().clone()).collect()
    }

    /// All identifiers, in identifier order.
    pub fn identifiers(&self) -> Vec<Identifier> {
        self.packages.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.packages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.read().is_empty()
    }

    fn slot(&self, id: &Identifier) -> CatalogResult<Slot> {
        self.packages
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }
}
