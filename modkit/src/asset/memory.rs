use std::collections::HashMap;

use parking_lot::RwLock;

use super::{AssetRef, AssetResolver, AssetType};
use crate::error::StoreResult;

/// In-memory asset table.
#[derive(Debug, Default)]
pub struct MemoryAssetResolver {
    assets: RwLock<HashMap<String, AssetType>>,
}

impl MemoryAssetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset, replacing any previous asset at the same path.
    pub fn insert(&self, path: impl Into<String>, asset_type: AssetType) {
        self.assets.write().insert(path.into(), asset_type);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_asset(self, path: impl Into<String>, asset_type: AssetType) -> Self {
        self.insert(path, asset_type);
        self
    }

    /// Remove an asset. Returns true if it was present.
    pub fn remove(&self, path: &str) -> bool {
        self.assets.write().remove(path).is_some()
    }
}

impl AssetResolver for MemoryAssetResolver {
    fn resolve(&self, path: &str) -> StoreResult<Option<AssetRef>> {
        Ok(self
            .assets
            .read()
            .get(path)
            .map(|asset_type| AssetRef::new(path, *asset_type)))
    }
}
