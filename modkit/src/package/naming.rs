//! Centralized package naming conventions.
//!
//! This module is the single source of truth for on-disk names:
//! - Package directories (e.g., `Jane.ExampleMod/`)
//! - Package manifests (`package.json`)
//! - Entry and record files (e.g., `Jane.ExampleMod.Spawnable.Gun01.entry.json`)
//! - Packed artifacts (e.g., `Jane.ExampleMod-0.1.0.modpack.gz`)
//!
//! All other modules should use these functions rather than constructing names directly.

use std::path::{Path, PathBuf};

use semver::Version;

use super::Identifier;

/// Filename of the package manifest inside a package directory.
pub const MANIFEST_FILENAME: &str = "package.json";

/// Extension of packed artifacts.
pub const ARTIFACT_EXTENSION: &str = "modpack.gz";

/// Directory name for a package.
///
/// # Examples
///
/// ```
/// use modkit::package::{package_dir_name, Identifier};
///
/// let id = Identifier::parse("Jane.ExampleMod").unwrap();
/// assert_eq!(package_dir_name(&id), "Jane.ExampleMod");
/// ```
pub fn package_dir_name(id: &Identifier) -> String {
    id.as_str().to_string()
}

/// Filename for a content entry.
pub fn entry_filename(id: &Identifier) -> String {
    format!("{}.entry.json", id)
}

/// Filename for a metadata record.
pub fn record_filename(id: &Identifier) -> String {
    format!("{}.record.json", id)
}

/// Filename for the packed sub-asset descriptor generated for a record.
///
/// Derived from the record's actual storage path, so de-duplicated records
/// get de-duplicated descriptors.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use modkit::package::packed_assets_filename;
///
/// assert_eq!(
///     packed_assets_filename(Path::new("pkg/A.B.Tag.X 1.record.json")),
///     "A.B.Tag.X 1.packed.json"
/// );
/// ```
pub fn packed_assets_filename(record_path: &Path) -> String {
    let file_name = record_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let stem = file_name.strip_suffix(".record.json").unwrap_or(file_name);
    format!("{}.packed.json", stem)
}

/// Filename for a packed artifact.
///
/// # Format
///
/// `{identifier}-{version}.modpack.gz`
///
/// # Examples
///
/// ```
/// use semver::Version;
/// use modkit::package::{artifact_filename, Identifier};
///
/// let id = Identifier::parse("Jane.ExampleMod").unwrap();
/// assert_eq!(
///     artifact_filename(&id, &Version::new(1, 0, 0)),
///     "Jane.ExampleMod-1.0.0.modpack.gz"
/// );
/// ```
pub fn artifact_filename(id: &Identifier, version: &Version) -> String {
    format!("{}-{}.{}", id, version, ARTIFACT_EXTENSION)
}

/// Split a filename into stem and extension. Store extensions are treated as
/// one unit: `"A.B.entry.json"` becomes `("A.B", ".entry.json")`.
fn split_known_extension(file_name: &str) -> (&str, &str) {
    for ext in [".entry.json", ".record.json", ".packed.json", ".json"] {
        if let Some(stem) = file_name.strip_suffix(ext) {
            return (stem, &file_name[stem.len()..]);
        }
    }
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => (&file_name[..idx], &file_name[idx..]),
        _ => (file_name, ""),
    }
}

/// Generate a collision-free path.
///
/// Returns `path` unchanged when `exists(path)` is false. Otherwise a numeric
/// suffix is inserted before the extension (`Name 1.entry.json`,
/// `Name 2.entry.json`, ...) until a free path is found.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use modkit::package::unique_path;
///
/// let taken = [PathBuf::from("pkg/A.entry.json"), PathBuf::from("pkg/A 1.entry.json")];
/// let free = unique_path(Path::new("pkg/A.entry.json"), |p| taken.iter().any(|t| t == p));
/// assert_eq!(free, PathBuf::from("pkg/A 2.entry.json"));
/// ```
pub fn unique_path(path: &Path, exists: impl Fn(&Path) -> bool) -> PathBuf {
    if !exists(path) {
        return path.to_path_buf();
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let (stem, extension) = split_known_extension(&file_name);
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 1u32;
    loop {
        let candidate = parent.join(format!("{} {}{}", stem, counter, extension));
        if !exists(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
