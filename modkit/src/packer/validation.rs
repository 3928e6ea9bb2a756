//! Package validation rules.
//!
//! Validation is a pluggable concern: the packer only invokes a
//! [`PackageValidator`] and interprets the resulting [`ValidationReport`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::asset::{AssetResolver, AssetType};
use crate::package::{Package, RecordKind};

/// Result of validating a package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Validation errors. Any error blocks packing.
    pub errors: Vec<String>,
    /// Non-fatal findings.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the package may be packed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Merge another report into this one.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error(s), {} warning(s)",
            self.errors.len(),
            self.warnings.len()
        )
    }
}

/// Validates a package before it is packed.
pub trait PackageValidator: Send + Sync {
    fn validate(&self, package: &Package) -> ValidationReport;
}

/// Built-in validation rules.
///
/// - author and name are present
/// - the package has at least one entry or record
/// - item identifiers are unique
/// - every bound asset still resolves and still satisfies its kind
/// - payload-bearing records carry their payload
/// - a tag without any payload is reported as a warning
pub struct DefaultValidator {
    resolver: Arc<dyn AssetResolver>,
}

impl DefaultValidator {
    pub fn new(resolver: Arc<dyn AssetResolver>) -> Self {
        Self { resolver }
    }

    fn check_asset(
        &self,
        report: &mut ValidationReport,
        item: &str,
        path: &str,
        accepts: impl Fn(AssetType) -> bool,
    ) {
        match self.resolver.resolve(path) {
            Ok(Some(asset)) if accepts(asset.asset_type) => {}
            Ok(Some(asset)) => report.add_error(format!(
                "{}: asset {} is now a {}",
                item, path, asset.asset_type
            )),
            Ok(None) => report.add_error(format!("{}: asset {} no longer exists", item, path)),
            Err(e) => report.add_error(format!("{}: could not resolve {}: {}", item, path, e)),
        }
    }
}

impl PackageValidator for DefaultValidator {
    fn validate(&self, package: &Package) -> ValidationReport {
        let mut report = ValidationReport::new();

        if package.author.trim().is_empty() {
            report.add_error("package author is empty");
        }
        if package.name.trim().is_empty() {
            report.add_error("package name is empty");
        }
        if package.is_empty() {
            report.add_error("package has no entries or records");
        }

        let mut seen = HashSet::new();
        let ids = package
            .entries
            .iter()
            .map(|e| &e.id)
            .chain(package.records.iter().map(|r| &r.id));
        for id in ids {
            if !seen.insert(id) {
                report.add_error(format!("duplicate item identifier {}", id));
            }
        }

        for entry in &package.entries {
            if entry.title.trim().is_empty() {
                report.add_error(format!("{}: title is empty", entry.id));
            }
            let requirement = entry.kind.requirement();
            self.check_asset(
                &mut report,
                entry.id.as_str(),
                &entry.asset.path,
                |t| requirement.accepts(t),
            );
        }

        for record in &package.records {
            if record.title.trim().is_empty() {
                report.add_error(format!("{}: title is empty", record.id));
            }
            match (&record.payload, record.kind.requires_payload()) {
                (Some(payload), _) => {
                    let requirement = record.kind.requirement();
                    self.check_asset(
                        &mut report,
                        record.id.as_str(),
                        &payload.asset().path,
                        |t| requirement.accepts(t),
                    );
                }
                (None, true) => {
                    report.add_error(format!("{}: {} record has no payload", record.id, record.kind));
                }
                (None, false) if record.kind == RecordKind::Tag => {
                    report.add_warning(format!("{}: tag has no payload", record.id));
                }
                (_, false) => {}
            }
        }

        report
    }
}
