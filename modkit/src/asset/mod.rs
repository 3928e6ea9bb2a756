//! Asset resolution.
//!
//! The catalog never loads assets itself. A caller-supplied [`AssetResolver`]
//! turns a path-like reference into a typed [`AssetRef`], or reports that
//! nothing lives at that path. Two resolvers are provided:
//!
//! - [`ProjectAssetResolver`] - files under a project directory, typed by extension
//! - [`MemoryAssetResolver`] - an in-memory table, for embedding and tests

mod memory;
mod project;

pub use memory::MemoryAssetResolver;
pub use project::ProjectAssetResolver;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// Concrete type of a resolved asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Prefab,
    Scene,
    AudioClip,
    Texture,
    Material,
    Other,
}

impl AssetType {
    /// Infer an asset type from a file extension (case-insensitive).
    ///
    /// # Example
    ///
    /// ```
    /// use modkit::asset::AssetType;
    ///
    /// assert_eq!(AssetType::from_extension("prefab"), AssetType::Prefab);
    /// assert_eq!(AssetType::from_extension("OGG"), AssetType::AudioClip);
    /// assert_eq!(AssetType::from_extension("txt"), AssetType::Other);
    /// ```
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "prefab" => AssetType::Prefab,
            "unity" | "scene" => AssetType::Scene,
            "wav" | "ogg" | "mp3" | "flac" | "aiff" => AssetType::AudioClip,
            "png" | "jpg" | "jpeg" | "tga" | "psd" | "exr" => AssetType::Texture,
            "mat" => AssetType::Material,
            _ => AssetType::Other,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            AssetType::Prefab => "prefab",
            AssetType::Scene => "scene",
            AssetType::AudioClip => "audio clip",
            AssetType::Texture => "texture",
            AssetType::Material => "material",
            AssetType::Other => "asset",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved reference to an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    /// The path the asset was resolved from.
    pub path: String,

    /// Concrete type of the asset.
    pub asset_type: AssetType,
}

impl AssetRef {
    pub fn new(path: impl Into<String>, asset_type: AssetType) -> Self {
        Self {
            path: path.into(),
            asset_type,
        }
    }
}

/// Maps path-like references to typed asset handles.
pub trait AssetResolver: Send + Sync {
    /// Resolve `path`.
    ///
    /// Returns `Ok(None)` when nothing exists at `path`. Errors are reserved
    /// for failures of the resolver itself.
    fn resolve(&self, path: &str) -> StoreResult<Option<AssetRef>>;
}
