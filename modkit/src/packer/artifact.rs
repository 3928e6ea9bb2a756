//! Packed artifacts.
//!
//! A [`PackManifest`] is the distributable view of a package. An
//! [`ArtifactWriter`] turns it into a file in the output directory and
//! describes the result as a [`PackedArtifact`].

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use semver::Version;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::package::{artifact_filename, ContentEntry, Identifier, MetadataRecord, Package};

/// Format version written into every manifest.
pub const MANIFEST_FORMAT: u32 = 1;

/// Serialized form of a package handed to the artifact writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackManifest {
    pub format: u32,
    pub id: Identifier,
    pub author: String,
    pub name: String,
    pub version: Version,
    pub entries: Vec<ContentEntry>,
    pub records: Vec<MetadataRecord>,
}

impl PackManifest {
    pub fn from_package(package: &Package) -> Self {
        Self {
            format: MANIFEST_FORMAT,
            id: package.id.clone(),
            author: package.author.clone(),
            name: package.name.clone(),
            version: package.version.clone(),
            entries: package.entries.clone(),
            records: package.records.clone(),
        }
    }
}

/// A written artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedArtifact {
    pub path: PathBuf,
    /// SHA-256 of the artifact file, lowercase hex.
    pub checksum: String,
    pub size: u64,
    pub entry_count: usize,
    pub record_count: usize,
    pub packed_at: DateTime<Utc>,
}

/// Writes a manifest into an output directory.
pub trait ArtifactWriter: Send + Sync {
    fn write(&self, manifest: &PackManifest, out_dir: &Path) -> StoreResult<PackedArtifact>;

    /// Remove an artifact this writer produced. A missing file is not an error.
    fn discard(&self, artifact: &PackedArtifact) -> StoreResult<()> {
        match fs::remove_file(&artifact.path) {
            Ok(()) => {
                debug!(path = %artifact.path.display(), "Discarded artifact");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::WriteFailed {
                path: artifact.path.clone(),
                source: e,
            }),
        }
    }
}

/// Compression level for gzip artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    Fast,
    #[default]
    Default,
    Best,
}

impl CompressionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionLevel::Fast => "fast",
            CompressionLevel::Default => "default",
            CompressionLevel::Best => "best",
        }
    }

    fn flate2(&self) -> Compression {
        match self {
            CompressionLevel::Fast => Compression::fast(),
            CompressionLevel::Default => Compression::default(),
            CompressionLevel::Best => Compression::best(),
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(CompressionLevel::Fast),
            "default" => Ok(CompressionLevel::Default),
            "best" => Ok(CompressionLevel::Best),
            other => Err(format!(
                "unknown compression '{}' (expected fast, default or best)",
                other
            )),
        }
    }
}

/// Writes gzip-compressed JSON manifests.
///
/// The artifact is written to `<name>.partial`, synced, then renamed into
/// place. A failed write leaves no file behind.
#[derive(Debug, Clone, Default)]
pub struct GzipArtifactWriter {
    compression: CompressionLevel,
}

impl GzipArtifactWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compression(mut self, compression: CompressionLevel) -> Self {
        self.compression = compression;
        self
    }

    fn encode(&self, manifest: &PackManifest, path: &Path) -> StoreResult<Vec<u8>> {
        let json = serde_json::to_vec_pretty(manifest).map_err(|e| StoreError::Serialization {
            path: path.to_path_buf(),
            source: e,
        })?;

        let write_failed = |e| StoreError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        };
        let mut encoder = GzEncoder::new(Vec::new(), self.compression.flate2());
        encoder.write_all(&json).map_err(write_failed)?;
        encoder.finish().map_err(write_failed)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl ArtifactWriter for GzipArtifactWriter {
    fn write(&self, manifest: &PackManifest, out_dir: &Path) -> StoreResult<PackedArtifact> {
        fs::create_dir_all(out_dir).map_err(|e| StoreError::CreateDirectoryFailed {
            path: out_dir.to_path_buf(),
            source: e,
        })?;

        let path = out_dir.join(artifact_filename(&manifest.id, &manifest.version));
        let partial = path.with_extension("gz.partial");
        let bytes = self.encode(manifest, &path)?;

        let written = write_synced(&partial, &bytes).and_then(|_| fs::rename(&partial, &path));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&partial) {
                warn!(path = %partial.display(), error = %cleanup, "Failed to remove partial artifact");
            }
            return Err(StoreError::WriteFailed { path, source: e });
        }

        let checksum = format!("{:x}", Sha256::digest(&bytes));
        debug!(
            package = %manifest.id,
            path = %path.display(),
            size = bytes.len(),
            "Wrote packed artifact"
        );

        Ok(PackedArtifact {
            path,
            checksum,
            size: bytes.len() as u64,
            entry_count: manifest.entries.len(),
            record_count: manifest.records.len(),
            packed_at: Utc::now(),
        })
    }
}
