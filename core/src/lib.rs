//! CustomResourceDefinition generation for composite resource definitions.
//!
//! A [`CompositeResourceDefinition`] (XRD) describes a new kind of resource
//! once. This crate derives the two CRDs needed to serve it:
//!
//! - [`for_composite_resource`] — the cluster scoped composite resource,
//!   named after the XRD and tagged with the `composite` category.
//! - [`for_composite_resource_claim`] — the namespaced claim, named
//!   `<claim plural>.<group>` and tagged with the `claim` category. Its names
//!   are checked against the composite names first
//!   ([`validate_claim_names`]).
//!
//! Each generated version's OpenAPI v3 schema is the base object envelope,
//! overlaid with the caller's `spec` properties ([`spec_properties`]), the
//! standard `spec` properties of the variant, and the standard `status`
//! properties ([`merge_into`]).
//!
//! [`is_established`] tells whether a registered CRD is ready for instances.
//!
//! Everything here is a pure, synchronous transform; no function touches
//! shared mutable state, so all of them may be called from any thread.
//!
//! # Example
//!
//! ```
//! use xrd_crd_core::*;
//!
//! let schema = RawSchema::from_bytes(
//!     r#"{"properties":{"spec":{"properties":{"storageGB":{"type":"integer"}}}}}"#,
//! );
//! let xrd = CompositeResourceDefinition::new(
//!     "xpostgresqlinstances.database.example.org",
//!     "database.example.org",
//!     ResourceNames::new("XPostgreSQLInstance", "xpostgresqlinstances"),
//! )
//! .with_claim_names(ResourceNames::new("PostgreSQLInstance", "postgresqlinstances"))
//! .with_version(
//!     DefinitionVersion::new("v1alpha1")
//!         .with_referenceable(true)
//!         .with_schema(schema),
//! );
//!
//! let composite = for_composite_resource(&xrd).unwrap();
//! let claim = for_composite_resource_claim(&xrd).unwrap();
//!
//! assert_eq!(composite.spec.scope, ResourceScope::Cluster);
//! assert_eq!(claim.metadata.name, "postgresqlinstances.database.example.org");
//!
//! let spec = &claim.spec.versions[0].open_api_schema().properties["spec"];
//! assert!(spec.properties.contains_key("storageGB"));
//! assert!(spec.properties.contains_key("resourceRef"));
//! ```

mod condition;
mod crd;
mod error;
mod generate;
mod merge;
mod names;
mod schema;
mod standard;
mod types;
mod validate;

pub use condition::{
    Condition, ConditionStatus, CustomResourceDefinitionStatus, ESTABLISHED, is_established,
};
pub use crd::{
    CRD_API_VERSION, CRD_KIND, CustomResourceDefinition, CustomResourceDefinitionSpec,
    CustomResourceDefinitionVersion, CustomResourceValidation, ResourceScope, StatusSubresource,
    Subresources,
};
pub use error::{ClaimNameError, GenerateError, Result, SchemaDecodeFailure};
pub use generate::{
    CATEGORY_CLAIM, CATEGORY_COMPOSITE, DefinitionVariant, for_composite_resource,
    for_composite_resource_claim, generate,
};
pub use merge::merge_into;
pub use names::{NameField, validate_claim_names};
pub use schema::{JsonSchemaProps, PropertyTree, SchemaOrArray, SchemaOrBool, spec_properties};
pub use standard::{
    base_props, claim_printer_columns, claim_spec_props, composite_printer_columns,
    composite_spec_props, status_props,
};
pub use types::*;
pub use validate::{VersionIssue, validate_versions};
