use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::{AssetRef, AssetResolver, AssetType};
use crate::error::StoreResult;

/// Resolves asset paths against files under a project root.
///
/// Paths are interpreted relative to the root. References that escape the
/// root resolve to nothing: absolute paths, `..` components, and symlinks
/// whose target lies outside the root.
#[derive(Debug, Clone)]
pub struct ProjectAssetResolver {
    root: PathBuf,
}

impl ProjectAssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the project.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || !contained {
            return None;
        }

        let root = fs::canonicalize(&self.root).ok()?;
        let target = fs::canonicalize(self.root.join(relative)).ok()?;
        if !target.starts_with(&root) {
            debug!(path, target = %target.display(), "Asset resolves outside project root");
            return None;
        }
        Some(target)
    }
}

impl AssetResolver for ProjectAssetResolver {
    fn resolve(&self, path: &str) -> StoreResult<Option<AssetRef>> {
        let Some(target) = self.locate(path) else {
            return Ok(None);
        };
        if !target.is_file() {
            return Ok(None);
        }

        let asset_type = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(AssetType::from_extension)
            .unwrap_or(AssetType::Other);

        Ok(Some(AssetRef::new(path, asset_type)))
    }
}
