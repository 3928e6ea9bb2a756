//! Identifiers and identifier allocation.
//!
//! Identifiers are dotted, alphanumeric tokens such as `Jane.ExampleMod` for a
//! package or `Jane.ExampleMod.Spawnable.Gun01` for an entry inside it. They
//! are opaque to callers: the only contract is that they are stable,
//! comparable keys that never change once assigned.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CatalogError, CatalogResult};

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9]+(\.[A-Za-z0-9]+)*$").expect("identifier pattern is valid")
    })
}

/// Globally unique identifier of a package, entry, or record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Parse an identifier from text.
    ///
    /// # Example
    ///
    /// ```
    /// use modkit::package::Identifier;
    ///
    /// let id = Identifier::parse("Jane.ExampleMod").unwrap();
    /// assert_eq!(id.as_str(), "Jane.ExampleMod");
    /// assert!(Identifier::parse("Jane..Mod").is_err());
    /// ```
    pub fn parse(value: &str) -> CatalogResult<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CatalogError::InvalidInput(
                "identifier cannot be empty".to_string(),
            ));
        }
        if !identifier_pattern().is_match(value) {
            return Err(CatalogError::InvalidInput(format!(
                "'{}' is not a valid identifier",
                value
            )));
        }
        Ok(Self(value.to_string()))
    }

    /// Derive a child identifier by appending already-sanitized segments.
    pub(crate) fn child(&self, segments: &[&str]) -> Self {
        let mut value = self.0.clone();
        for segment in segments {
            value.push('.');
            value.push_str(segment);
        }
        Self(value)
    }

    /// The textual form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identifier::parse(s)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Identifier::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Reduce free text to an identifier segment.
///
/// Keeps ASCII alphanumerics only, so `"Example Mod!"` becomes `"ExampleMod"`.
pub fn slugify(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Hex digits of the digest appended to lossy segments.
const DIGEST_LEN: usize = 8;

/// Turn a required field into an identifier segment.
///
/// A field made only of ASCII letters and digits is used as is. Any other
/// field keeps its slug followed by a short SHA-256 digest of the trimmed
/// text, so `"Example Mod"` and `"Example-Mod"` get different segments and
/// a field with no ASCII alphanumerics at all (`"山田"`) still gets one.
///
/// # Example
///
/// ```
/// use modkit::package::identifier_segment;
///
/// assert_eq!(identifier_segment("author", "Jane").unwrap(), "Jane");
/// let spaced = identifier_segment("name", "Example Mod").unwrap();
/// let dashed = identifier_segment("name", "Example-Mod").unwrap();
/// assert!(spaced.starts_with("ExampleMod"));
/// assert_ne!(spaced, dashed);
/// assert!(identifier_segment("name", "  ").is_err());
/// ```
pub fn identifier_segment(field: &str, value: &str) -> CatalogResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::InvalidInput(format!(
            "{} cannot be empty",
            field
        )));
    }

    let slug = slugify(value);
    if slug == value {
        return Ok(slug);
    }
    let digest = format!("{:x}", Sha256::digest(value.as_bytes()));
    Ok(format!("{}{}", slug, &digest[..DIGEST_LEN]))
}

/// Derives identifiers for new packages.
pub trait IdentifierAllocator: Send + Sync {
    /// Allocate an identifier for a package authored by `author` named `name`.
    fn allocate(&self, author: &str, name: &str) -> CatalogResult<Identifier>;
}

/// Allocates `{Author}.{Name}` identifiers, one [`identifier_segment`] per
/// field.
///
/// Allocation is deterministic, so the same author/name pair always maps to
/// the same identifier and a second creation is caught by the catalog's
/// duplicate guard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlugAllocator;

impl SlugAllocator {
    pub fn new() -> Self {
        Self
    }
}

impl IdentifierAllocator for SlugAllocator {
    fn allocate(&self, author: &str, name: &str) -> CatalogResult<Identifier> {
        let author = identifier_segment("author", author)?;
        let name = identifier_segment("name", name)?;
        Ok(Identifier(format!("{}.{}", author, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_accepts_dotted_segments() {
        let id = Identifier::parse("Jane.ExampleMod.Spawnable.Gun01").unwrap();
        assert_eq!(id.to_string(), "Jane.ExampleMod.Spawnable.Gun01");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "   ", ".Jane", "Jane.", "Jane Mod", "Jane/Mod", "Jane..Mod"] {
            assert!(
                matches!(Identifier::parse(bad), Err(CatalogError::InvalidInput(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_slug_allocator() {
        let id = SlugAllocator.allocate("Jane", "ExampleMod").unwrap();
        assert_eq!(id.as_str(), "Jane.ExampleMod");
    }

    #[test]
    fn test_slug_allocator_keeps_lossy_names_apart() {
        let spaced = SlugAllocator.allocate("Jane", "Example Mod").unwrap();
        let dashed = SlugAllocator.allocate("Jane", "Example-Mod").unwrap();
        let plain = SlugAllocator.allocate("Jane", "ExampleMod").unwrap();

        assert_ne!(spaced, dashed);
        assert_ne!(spaced, plain);
        assert!(spaced.as_str().starts_with("Jane.ExampleMod"));
        assert_eq!(spaced.as_str().len(), "Jane.ExampleMod".len() + DIGEST_LEN);
    }

    #[test]
    fn test_slug_allocator_non_ascii_fields() {
        let id = SlugAllocator.allocate("山田", "モッド").unwrap();
        assert!(Identifier::parse(id.as_str()).is_ok());
        assert_eq!(SlugAllocator.allocate("山田", "モッド").unwrap(), id);
        assert_ne!(SlugAllocator.allocate("山田", "ゲーム").unwrap(), id);
    }

    #[test]
    fn test_segment_ignores_surrounding_whitespace() {
        assert_eq!(
            identifier_segment("name", "  Example Mod ").unwrap(),
            identifier_segment("name", "Example Mod").unwrap()
        );
        assert_eq!(identifier_segment("name", " Jane\t").unwrap(), "Jane");
    }

    #[test]
    fn test_slug_allocator_rejects_empty() {
        assert!(matches!(
            SlugAllocator.allocate("", "ExampleMod"),
            Err(CatalogError::InvalidInput(_))
        ));
        assert!(matches!(
            SlugAllocator.allocate("Jane", "  "),
            Err(CatalogError::InvalidInput(_))
        ));
        assert!(SlugAllocator.allocate("Jane", "!!!").is_ok());
    }

    #[test]
    fn test_child_identifier() {
        let id = Identifier::parse("Jane.ExampleMod").unwrap();
        let child = id.child(&["Level", "Arena"]);
        assert_eq!(child.as_str(), "Jane.ExampleMod.Level.Arena");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Identifier = serde_json::from_str("\"Jane.ExampleMod\"").unwrap();
        assert_eq!(ok.as_str(), "Jane.ExampleMod");
        assert!(serde_json::from_str::<Identifier>("\"not valid\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_allocated_ids_parse(author in "[A-Za-z][A-Za-z0-9 _-]{0,12}", name in "[A-Za-z0-9][A-Za-z0-9 !]{0,12}") {
            let id = SlugAllocator.allocate(&author, &name).unwrap();
            prop_assert!(Identifier::parse(id.as_str()).is_ok());
        }

        #[test]
        fn prop_non_empty_fields_always_allocate(author in "\\PC{1,16}", name in "\\PC{1,16}") {
            prop_assume!(!author.trim().is_empty() && !name.trim().is_empty());
            let id = SlugAllocator.allocate(&author, &name).unwrap();
            prop_assert!(Identifier::parse(id.as_str()).is_ok());
        }

        #[test]
        fn prop_distinct_names_get_distinct_ids(a in "\\PC{1,16}", b in "\\PC{1,16}") {
            prop_assume!(!a.trim().is_empty() && !b.trim().is_empty());
            prop_assume!(a.trim() != b.trim());
            prop_assert_ne!(
                SlugAllocator.allocate("Jane", &a).unwrap(),
                SlugAllocator.allocate("Jane", &b).unwrap()
            );
        }

        #[test]
        fn prop_empty_field_rejected(other in "[A-Za-z]{1,10}", blank in " {0,4}") {
            prop_assert!(SlugAllocator.allocate(&blank, &other).is_err());
            prop_assert!(SlugAllocator.allocate(&other, &blank).is_err());
        }
    }
}
