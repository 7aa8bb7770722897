//! Claim name validation.
//!
//! A claim CRD is a separate registry entry in the same API group as its
//! composite resource CRD, so none of its names may repeat the composite
//! resource's names.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CompositeResourceDefinition;
use crate::ResourceNames;
use crate::error::ClaimNameError;

/// The name field a [`ClaimNameError::NameConflict`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NameField {
    Kind,
    Plural,
    Singular,
    ListKind,
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Kind => "kind",
            Self::Plural => "plural",
            Self::Singular => "singular",
            Self::ListKind => "listKind",
        };
        f.write_str(name)
    }
}

/// Validates the claim names of `xrd` and returns them.
///
/// Checks run in order and stop at the first conflict: kind, plural, then
/// singular and list kind when the claim declares them.
///
/// # Errors
///
/// Returns [`ClaimNameError::MissingClaimNames`] if no claim names are
/// declared, or [`ClaimNameError::NameConflict`] naming the first colliding
/// field and its value.
///
/// # Examples
///
/// ```
/// use xrd_crd_core::*;
///
/// let xrd = CompositeResourceDefinition::new(
///     "xdatabases.example.org",
///     "example.org",
///     ResourceNames::new("XDatabase", "xdatabases"),
/// )
/// .with_claim_names(ResourceNames::new("XDatabase", "databases"));
///
/// let err = validate_claim_names(&xrd).unwrap_err();
/// assert_eq!(
///     err,
///     ClaimNameError::NameConflict { field: NameField::Kind, value: "XDatabase".into() }
/// );
/// ```
pub fn validate_claim_names(
    xrd: &CompositeResourceDefinition,
) -> Result<&ResourceNames, ClaimNameError> {
    let claim = xrd
        .spec
        .claim_names
        .as_ref()
        .ok_or(ClaimNameError::MissingClaimNames)?;
    let composite = &xrd.spec.names;

    let checks = [
        (NameField::Kind, &claim.kind, &composite.kind, false),
        (NameField::Plural, &claim.plural, &composite.plural, false),
        (NameField::Singular, &claim.singular, &composite.singular, true),
        (NameField::ListKind, &claim.list_kind, &composite.list_kind, true),
    ];

    for (field, claimed, existing, optional) in checks {
        if optional && claimed.is_empty() {
            continue;
        }
        if claimed == existing {
            return Err(ClaimNameError::NameConflict {
                field,
                value: claimed.clone(),
            });
        }
    }

    Ok(claim)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composite_names() -> ResourceNames {
        ResourceNames::new("XDatabase", "xdatabases")
            .with_singular("xdatabase")
            .with_list_kind("XDatabaseList")
    }

    fn xrd_with_claim(claim: Option<ResourceNames>) -> CompositeResourceDefinition {
        let xrd = CompositeResourceDefinition::new(
            "xdatabases.example.org",
            "example.org",
            composite_names(),
        );
        match claim {
            Some(names) => xrd.with_claim_names(names),
            None => xrd,
        }
    }

    fn conflict(field: NameField, value: &str) -> ClaimNameError {
        ClaimNameError::NameConflict {
            field,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_missing_claim_names() {
        let xrd = xrd_with_claim(None);
        assert_eq!(
            validate_claim_names(&xrd),
            Err(ClaimNameError::MissingClaimNames)
        );
    }

    #[test]
    fn test_conflicting_kind() {
        let xrd = xrd_with_claim(Some(ResourceNames::new("XDatabase", "databases")));
        assert_eq!(
            validate_claim_names(&xrd),
            Err(conflict(NameField::Kind, "XDatabase"))
        );
    }

    #[test]
    fn test_conflicting_plural() {
        let xrd = xrd_with_claim(Some(ResourceNames::new("Database", "xdatabases")));
        assert_eq!(
            validate_claim_names(&xrd),
            Err(conflict(NameField::Plural, "xdatabases"))
        );
    }

    #[test]
    fn test_conflicting_singular() {
        let xrd = xrd_with_claim(Some(
            ResourceNames::new("Database", "databases").with_singular("xdatabase"),
        ));
        assert_eq!(
            validate_claim_names(&xrd),
            Err(conflict(NameField::Singular, "xdatabase"))
        );
    }

    #[test]
    fn test_conflicting_list_kind() {
        let xrd = xrd_with_claim(Some(
            ResourceNames::new("Database", "databases").with_list_kind("XDatabaseList"),
        ));
        assert_eq!(
            validate_claim_names(&xrd),
            Err(conflict(NameField::ListKind, "XDatabaseList"))
        );
    }

    #[test]
    fn test_empty_optional_names_never_conflict() {
        let mut xrd = xrd_with_claim(Some(ResourceNames::new("Database", "databases")));
        xrd.spec.names.singular.clear();
        xrd.spec.names.list_kind.clear();
        assert!(validate_claim_names(&xrd).is_ok());
    }

    #[test]
    fn test_first_conflict_wins() {
        let xrd = xrd_with_claim(Some(composite_names()));
        assert_eq!(
            validate_claim_names(&xrd),
            Err(conflict(NameField::Kind, "XDatabase"))
        );
    }

    #[test]
    fn test_distinct_names_are_returned() {
        let claim = ResourceNames::new("Database", "databases")
            .with_singular("database")
            .with_list_kind("DatabaseList");
        let xrd = xrd_with_claim(Some(claim.clone()));
        assert_eq!(validate_claim_names(&xrd), Ok(&claim));
    }

    #[test]
    fn test_conflict_message_names_field_and_value() {
        let err = conflict(NameField::Plural, "xdatabases");
        assert_eq!(
            err.to_string(),
            "claim plural \"xdatabases\" conflicts with composite resource name"
        );
    }
}
