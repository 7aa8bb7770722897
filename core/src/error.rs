//! Error types for CRD generation.
//!
//! Context errors carry their cause as a [`source`](std::error::Error::source)
//! so callers can match on the inner failure instead of the message text.

use thiserror::Error;

use crate::names::NameField;

/// Claim names are missing or collide with the composite resource names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimNameError {
    /// The definition declares no claim names.
    #[error("missing names")]
    MissingClaimNames,
    /// A claim name equals the corresponding composite resource name.
    #[error("claim {field} {value:?} conflicts with composite resource name")]
    NameConflict { field: NameField, value: String },
}

/// A raw validation schema could not be decoded.
#[derive(Debug, Error)]
#[error("cannot parse validation schema")]
pub struct SchemaDecodeFailure(#[source] pub serde_json::Error);

/// Errors that abort CRD generation.
///
/// Generation either returns a complete definition or one of these; no
/// partially assembled output is ever returned.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Claim name validation failed while generating a claim CRD.
    #[error("invalid resource claim names")]
    InvalidClaimNames(#[from] ClaimNameError),

    /// The validation schema of `version` could not be decoded.
    #[error("cannot get spec properties from validation schema")]
    GetSpecPropsFailure {
        version: String,
        #[source]
        source: SchemaDecodeFailure,
    },
}

/// Convenience alias for results with [`GenerateError`].
pub type Result<T> = std::result::Result<T, GenerateError>;
