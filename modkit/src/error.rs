//! Error types for catalog operations.
//!
//! Every public operation of the catalog core reports failure as a
//! [`CatalogError`]. Collaborator failures (persistence, artifact I/O) arrive
//! as [`StoreError`] and are translated into [`CatalogError::Internal`] with a
//! captured diagnostic trace, so nothing crosses the core boundary untranslated.

use std::backtrace::Backtrace;
use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::asset::AssetType;
use crate::package::Identifier;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type for persistence collaborators.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required field was empty or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The identifier does not resolve to a package.
    #[error("could not find a package with identifier {0}")]
    NotFound(Identifier),

    /// The identifier is already taken.
    #[error("identifier {0} already exists")]
    DuplicateIdentifier(Identifier),

    /// The requested kind is neither an entry kind nor a record kind.
    #[error("invalid kind '{0}'")]
    InvalidKind(String),

    /// The asset reference did not resolve.
    #[error("could not find asset at {0}")]
    AssetNotFound(String),

    /// The resolved asset has the wrong concrete type for the kind.
    #[error("asset {path} is a {actual} but {kind} requires a {expected}")]
    TypeMismatch {
        path: String,
        kind: String,
        expected: AssetType,
        actual: AssetType,
    },

    /// Validation failed while packing. Packing must not be retried until the
    /// reported errors are resolved.
    #[error(
        "unable to pack {id}: {}; do not try packing again until these errors are fixed",
        .errors.join("; ")
    )]
    PackingFailed { id: Identifier, errors: Vec<String> },

    /// Unexpected failure from an external collaborator.
    #[error("internal error: {message}")]
    Internal { message: String, trace: String },
}

impl CatalogError {
    /// Build an internal error, capturing the current backtrace.
    pub fn internal(message: impl Into<String>) -> Self {
        CatalogError::Internal {
            message: message.into(),
            trace: Backtrace::force_capture().to_string(),
        }
    }

    /// Stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::InvalidInput(_) => ErrorCode::InvalidInput,
            CatalogError::NotFound(_) => ErrorCode::NotFound,
            CatalogError::DuplicateIdentifier(_) => ErrorCode::DuplicateIdentifier,
            CatalogError::InvalidKind(_) => ErrorCode::InvalidKind,
            CatalogError::AssetNotFound(_) => ErrorCode::AssetNotFound,
            CatalogError::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            CatalogError::PackingFailed { .. } => ErrorCode::PackingFailed,
            CatalogError::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// Diagnostic trace, present only for internal errors.
    pub fn trace(&self) -> Option<&str> {
        match self {
            CatalogError::Internal { trace, .. } => Some(trace),
            _ => None,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(e: StoreError) -> Self {
        CatalogError::internal(e.to_string())
    }
}

/// Wire-level error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    DuplicateIdentifier,
    InvalidKind,
    AssetNotFound,
    TypeMismatch,
    PackingFailed,
    Internal,
}

impl ErrorCode {
    /// Wire representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::DuplicateIdentifier => "DUPLICATE_IDENTIFIER",
            ErrorCode::InvalidKind => "INVALID_KIND",
            ErrorCode::AssetNotFound => "ASSET_NOT_FOUND",
            ErrorCode::TypeMismatch => "TYPE_MISMATCH",
            ErrorCode::PackingFailed => "PACKING_FAILED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by persistence and artifact collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create directory.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDirectoryFailed { path: PathBuf, source: io::Error },

    /// Failed to read file.
    #[error("failed to read {}: {source}", .path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write file.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to (de)serialize a stored object.
    #[error("failed to serialize {}: {source}", .path.display())]
    Serialization {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A stored object is structurally invalid.
    #[error("corrupt store object {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
}
