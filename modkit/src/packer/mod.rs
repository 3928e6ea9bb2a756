//! Package packing.
//!
//! Packing validates a package and, if it is valid, writes a distributable
//! artifact for it:
//!
//! ```text
//! Package ──► PackageValidator ──► PackManifest ──► ArtifactWriter ──► PackedArtifact
//!                  │
//!                  └── errors ──► PackingFailed (nothing written)
//! ```
//!
//! A package that has not changed since its last pack, and whose artifact is
//! still on disk, is not written again.

mod artifact;
mod validation;

pub use artifact::{
    ArtifactWriter, CompressionLevel, GzipArtifactWriter, PackManifest, PackedArtifact,
    MANIFEST_FORMAT,
};
pub use validation::{DefaultValidator, PackageValidator, ValidationReport};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::package::Package;

/// Result of a successful pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackOutcome {
    /// A new artifact was written.
    Packed(PackedArtifact),
    /// The package was already packed and unchanged; the existing artifact is
    /// returned.
    Unchanged(PackedArtifact),
}

impl PackOutcome {
    pub fn artifact(&self) -> &PackedArtifact {
        match self {
            PackOutcome::Packed(artifact) | PackOutcome::Unchanged(artifact) => artifact,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, PackOutcome::Packed(_))
    }
}

/// Validates packages and writes their artifacts.
pub struct Packer {
    validator: Arc<dyn PackageValidator>,
    writer: Arc<dyn ArtifactWriter>,
    output_dir: PathBuf,
}

impl Packer {
    pub fn new(
        validator: Arc<dyn PackageValidator>,
        writer: Arc<dyn ArtifactWriter>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            validator,
            writer,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Validate without packing.
    pub fn validate(&self, package: &Package) -> ValidationReport {
        self.validator.validate(package)
    }

    /// Pack `package`.
    ///
    /// On success the package is marked clean and records the artifact. On
    /// validation failure the package is left untouched.
    pub fn pack(&self, package: &mut Package) -> CatalogResult<PackOutcome> {
        let report = self.validator.validate(package);
        for warning in &report.warnings {
            warn!(package = %package.id, warning = %warning, "Validation warning");
        }
        if !report.is_valid() {
            debug!(package = %package.id, report = %report, "Validation failed");
            return Err(CatalogError::PackingFailed {
                id: package.id.clone(),
                errors: report.errors,
            });
        }

        if !package.dirty {
            if let Some(artifact) = package.packed.as_ref().filter(|a| a.path.is_file()) {
                debug!(package = %package.id, path = %artifact.path.display(), "Package unchanged");
                return Ok(PackOutcome::Unchanged(artifact.clone()));
            }
        }

        let manifest = PackManifest::from_package(package);
        let artifact = self.writer.write(&manifest, &self.output_dir)?;

        package.dirty = false;
        package.packed = Some(artifact.clone());
        info!(
            package = %package.id,
            path = %artifact.path.display(),
            checksum = %artifact.checksum,
            "Packed package"
        );
        Ok(PackOutcome::Packed(artifact))
    }
}
