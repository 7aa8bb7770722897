//! CustomResourceDefinition generation.
//!
//! A composite resource definition yields two CRDs: a cluster scoped one for
//! the composite resource itself and, when claim names are declared, a
//! namespaced one for its claim. Both share the definition's versions and
//! caller schema but differ in scope, names, category and the standard
//! properties and printer columns they add. [`DefinitionVariant`] selects
//! which one to build.
//!
//! Every generated version schema is assembled in the same order, later
//! layers overwriting earlier ones property by property:
//!
//! 1. the base object properties,
//! 2. the caller's `spec` properties,
//! 3. the variant's standard `spec` properties,
//! 4. the standard `status` properties.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crd::{
    CRD_API_VERSION, CRD_KIND, CustomResourceDefinition, CustomResourceDefinitionSpec,
    CustomResourceDefinitionVersion, CustomResourceValidation, ResourceScope, StatusSubresource,
    Subresources,
};
use crate::error::{GenerateError, Result};
use crate::merge::merge_into;
use crate::names::validate_claim_names;
use crate::schema::{JsonSchemaProps, PropertyTree, spec_properties};
use crate::standard;
use crate::types::{CompositeResourceDefinition, DefinitionVersion, ObjectMeta, PrinterColumn};

/// Category appended to composite resource CRDs.
pub const CATEGORY_COMPOSITE: &str = "composite";

/// Category appended to claim CRDs.
pub const CATEGORY_CLAIM: &str = "claim";

/// Which CRD to derive from a composite resource definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionVariant {
    /// The cluster scoped composite resource.
    Composite,
    /// The namespaced claim for the composite resource.
    Claim,
}

impl DefinitionVariant {
    pub const ALL: [DefinitionVariant; 2] = [Self::Composite, Self::Claim];

    pub fn scope(self) -> ResourceScope {
        match self {
            Self::Composite => ResourceScope::Cluster,
            Self::Claim => ResourceScope::Namespaced,
        }
    }

    /// Category tag added to the generated CRD's names.
    pub fn category(self) -> &'static str {
        match self {
            Self::Composite => CATEGORY_COMPOSITE,
            Self::Claim => CATEGORY_CLAIM,
        }
    }

    /// Standard `spec` properties layered over the caller's.
    pub fn spec_props(self) -> &'static PropertyTree {
        match self {
            Self::Composite => standard::composite_spec_props(),
            Self::Claim => standard::claim_spec_props(),
        }
    }

    /// Printer columns appended after the caller's.
    pub fn printer_columns(self) -> &'static [PrinterColumn] {
        match self {
            Self::Composite => standard::composite_printer_columns(),
            Self::Claim => standard::claim_printer_columns(),
        }
    }
}

impl fmt::Display for DefinitionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

/// Derives the CRD for a composite resource.
///
/// # Errors
///
/// Returns [`GenerateError::GetSpecPropsFailure`] if any version's schema
/// cannot be decoded.
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
/// .with_version(DefinitionVersion::new("v1alpha1").with_referenceable(true));
///
/// let crd = for_composite_resource(&xrd).unwrap();
/// assert_eq!(crd.metadata.name, "xdatabases.example.org");
/// assert_eq!(crd.spec.scope, ResourceScope::Cluster);
/// assert_eq!(crd.spec.names.categories, vec!["composite"]);
/// assert!(crd.spec.versions[0].storage);
/// ```
pub fn for_composite_resource(xrd: &CompositeResourceDefinition) -> Result<CustomResourceDefinition> {
    generate(xrd, DefinitionVariant::Composite)
}

/// Derives the CRD for a composite resource claim.
///
/// The CRD is named `<claim plural>.<group>`.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidClaimNames`] if claim names are missing or
/// collide with the composite resource names, or
/// [`GenerateError::GetSpecPropsFailure`] if any version's schema cannot be
/// decoded.
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
/// .with_claim_names(ResourceNames::new("Database", "databases"))
/// .with_version(DefinitionVersion::new("v1alpha1").with_referenceable(true));
///
/// let crd = for_composite_resource_claim(&xrd).unwrap();
/// assert_eq!(crd.metadata.name, "databases.example.org");
/// assert_eq!(crd.spec.scope, ResourceScope::Namespaced);
/// assert_eq!(crd.spec.names.kind, "Database");
/// ```
pub fn for_composite_resource_claim(
    xrd: &CompositeResourceDefinition,
) -> Result<CustomResourceDefinition> {
    generate(xrd, DefinitionVariant::Claim)
}

/// Derives the CRD for `variant` from `xrd`.
///
/// Versions are projected one to one and in order. Whether exactly one
/// version is referenceable, or version names are unique, is not checked
/// here; see [`validate_versions`](crate::validate_versions).
///
/// # Errors
///
/// See [`for_composite_resource`] and [`for_composite_resource_claim`].
pub fn generate(
    xrd: &CompositeResourceDefinition,
    variant: DefinitionVariant,
) -> Result<CustomResourceDefinition> {
    debug!(
        definition = %xrd.metadata.name,
        %variant,
        versions = xrd.spec.versions.len(),
        "Generating CustomResourceDefinition"
    );

    let (name, mut names) = match variant {
        DefinitionVariant::Composite => (xrd.metadata.name.clone(), xrd.spec.names.clone()),
        DefinitionVariant::Claim => {
            let claim = validate_claim_names(xrd)?;
            (format!("{}.{}", claim.plural, xrd.spec.group), claim.clone())
        }
    };
    names.categories.push(variant.category().to_string());

    let versions = xrd
        .spec
        .versions
        .iter()
        .map(|version| project_version(version, variant))
        .collect::<Result<Vec<_>>>()?;

    Ok(CustomResourceDefinition {
        api_version: CRD_API_VERSION.to_string(),
        kind: CRD_KIND.to_string(),
        metadata: ObjectMeta {
            name,
            uid: None,
            labels: xrd.metadata.labels.clone(),
            annotations: xrd.metadata.annotations.clone(),
            owner_references: vec![xrd.controller_reference()],
        },
        spec: CustomResourceDefinitionSpec {
            group: xrd.spec.group.clone(),
            names,
            scope: variant.scope(),
            versions,
        },
        status: None,
    })
}

fn project_version(
    version: &DefinitionVersion,
    variant: DefinitionVariant,
) -> Result<CustomResourceDefinitionVersion> {
    let caller_props = spec_properties(version.raw_schema()).map_err(|source| {
        GenerateError::GetSpecPropsFailure {
            version: version.name.clone(),
            source,
        }
    })?;

    debug!(
        version = %version.name,
        %variant,
        spec_properties = caller_props.len(),
        "Assembling version schema"
    );

    let mut columns = version.additional_printer_columns.clone();
    columns.extend_from_slice(variant.printer_columns());

    Ok(CustomResourceDefinitionVersion {
        name: version.name.clone(),
        served: version.served,
        storage: version.referenceable,
        additional_printer_columns: columns,
        schema: CustomResourceValidation {
            open_api_v3_schema: assemble_schema(&caller_props, variant),
        },
        subresources: Subresources {
            status: Some(StatusSubresource {}),
        },
    })
}

fn assemble_schema(caller_props: &PropertyTree, variant: DefinitionVariant) -> JsonSchemaProps {
    let mut schema = JsonSchemaProps {
        properties: standard::base_props().clone(),
        ..JsonSchemaProps::object()
    };

    merge_into(&mut schema, caller_props, "spec");
    merge_into(&mut schema, variant.spec_props(), "spec");
    merge_into(&mut schema, standard::status_props(), "status");

    schema
}
