//! Version validation for composite resource definitions.
//!
//! CRD generation projects versions as given. A definition with no storage
//! version, several storage versions, or repeated version names still
//! generates, but the API server will reject the result. [`validate_versions`]
//! reports those problems up front for callers that want to refuse such
//! definitions early.
//!
//! # Examples
//!
//! ```
//! use xrd_crd_core::*;
//!
//! let xrd = CompositeResourceDefinition::new(
//!     "xdatabases.example.org",
//!     "example.org",
//!     ResourceNames::new("XDatabase", "xdatabases"),
//! )
//! .with_version(DefinitionVersion::new("v1alpha1").with_referenceable(true));
//! assert!(validate_versions(&xrd).is_empty());
//!
//! let unreferenced = CompositeResourceDefinition::new(
//!     "xdatabases.example.org",
//!     "example.org",
//!     ResourceNames::new("XDatabase", "xdatabases"),
//! )
//! .with_version(DefinitionVersion::new("v1alpha1"));
//! assert_eq!(validate_versions(&unreferenced), vec![VersionIssue::NoReferenceableVersion]);
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::CompositeResourceDefinition;

/// A problem with the versions of a composite resource definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionIssue {
    /// The definition declares no versions at all.
    #[error("definition declares no versions")]
    NoVersions,
    /// A version name is empty or whitespace-only.
    #[error("version name cannot be empty")]
    EmptyVersionName,
    /// Two versions share a name.
    #[error("duplicate version: {0}")]
    DuplicateVersion(String),
    /// No version is marked referenceable.
    #[error("no version is marked referenceable")]
    NoReferenceableVersion,
    /// More than one version is marked referenceable.
    #[error("multiple referenceable versions: {}", .0.join(", "))]
    MultipleReferenceableVersions(Vec<String>),
}

/// Checks that versions are named, unique, and that exactly one is
/// referenceable.
///
/// Returns every issue found, in version order, followed by at most one
/// referenceable-count issue.
pub fn validate_versions(xrd: &CompositeResourceDefinition) -> Vec<VersionIssue> {
    let versions = &xrd.spec.versions;
    if versions.is_empty() {
        return vec![VersionIssue::NoVersions];
    }

    let mut issues = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for version in versions {
        let name = version.name.trim();
        if name.is_empty() {
            issues.push(VersionIssue::EmptyVersionName);
            continue;
        }
        if !seen.insert(name) {
            issues.push(VersionIssue::DuplicateVersion(name.to_string()));
        }
    }

    let referenceable: Vec<String> = versions
        .iter()
        .filter(|v| v.referenceable)
        .map(|v| v.name.clone())
        .collect();

    match referenceable.len() {
        0 => issues.push(VersionIssue::NoReferenceableVersion),
        1 => {}
        _ => issues.push(VersionIssue::MultipleReferenceableVersions(referenceable)),
    }

    issues
}
