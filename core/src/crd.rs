//! Generated CustomResourceDefinition types.
//!
//! These mirror the `apiextensions.k8s.io/v1` object closely enough to be
//! serialized and submitted to an API server as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::CustomResourceDefinitionStatus;
use crate::schema::JsonSchemaProps;
use crate::types::{ObjectMeta, PrinterColumn, ResourceNames};

/// `apiVersion` of generated CRDs.
pub const CRD_API_VERSION: &str = "apiextensions.k8s.io/v1";

/// `kind` of generated CRDs.
pub const CRD_KIND: &str = "CustomResourceDefinition";

/// Whether instances of a CRD live in a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceScope {
    Cluster,
    Namespaced,
}

impl fmt::Display for ResourceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cluster => f.write_str("Cluster"),
            Self::Namespaced => f.write_str("Namespaced"),
        }
    }
}

/// Validation of a CRD version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomResourceValidation {
    #[serde(rename = "openAPIV3Schema")]
    pub open_api_v3_schema: JsonSchemaProps,
}

/// Marker enabling the `/status` subresource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSubresource {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subresources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusSubresource>,
}

/// One version of a generated CRD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResourceDefinitionVersion {
    pub name: String,
    pub served: bool,
    pub storage: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_printer_columns: Vec<PrinterColumn>,
    pub schema: CustomResourceValidation,
    #[serde(default)]
    pub subresources: Subresources,
}

impl CustomResourceDefinitionVersion {
    /// Returns the root OpenAPI v3 schema of this version.
    pub fn open_api_schema(&self) -> &JsonSchemaProps {
        &self.schema.open_api_v3_schema
    }

    /// Returns `true` if the `/status` subresource is enabled.
    pub fn status_subresource_enabled(&self) -> bool {
        self.subresources.status.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomResourceDefinitionSpec {
    pub group: String,
    pub names: ResourceNames,
    pub scope: ResourceScope,
    pub versions: Vec<CustomResourceDefinitionVersion>,
}

/// A CustomResourceDefinition derived from a composite resource definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResourceDefinition {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: CustomResourceDefinitionSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CustomResourceDefinitionStatus>,
}

impl CustomResourceDefinition {
    /// Looks up a version by name.
    pub fn version(&self, name: &str) -> Option<&CustomResourceDefinitionVersion> {
        self.spec.versions.iter().find(|v| v.name == name)
    }

    /// Returns the first version marked for storage.
    pub fn storage_version(&self) -> Option<&CustomResourceDefinitionVersion> {
        self.spec.versions.iter().find(|v| v.storage)
    }

    /// Returns `true` if the reported status says the CRD is established.
    pub fn is_established(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(CustomResourceDefinitionStatus::is_established)
    }
}
