//! Input type definitions for composite resource definitions.
//!
//! A [`CompositeResourceDefinition`] describes a new resource kind in the
//! abstract: its API group, the names under which it is served, an optional
//! second set of names for the namespaced claim, and one or more versions
//! each carrying an OpenAPI v3 validation schema. The types serialize to the
//! usual Kubernetes object shape (`apiVersion`, `kind`, `metadata`, `spec`)
//! with camelCase field names, so definitions can be read straight from YAML
//! or JSON manifests.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// API group of composite resource definitions.
pub const XRD_GROUP: &str = "apiextensions.crossplane.io";

/// API version of composite resource definitions.
pub const XRD_VERSION: &str = "v1alpha1";

/// Kind of composite resource definitions.
pub const XRD_KIND: &str = "CompositeResourceDefinition";

fn xrd_api_version() -> String {
    format!("{XRD_GROUP}/{XRD_VERSION}")
}

fn xrd_kind() -> String {
    XRD_KIND.to_string()
}

/// Identity metadata shared by input definitions and generated CRDs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Object name.
    pub name: String,
    /// Unique identifier assigned by the API server, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    /// Objects that own this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerReference>,
}

impl ObjectMeta {
    /// Creates metadata carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A value-type reference from an owned object to its owner.
///
/// Used by generated CRDs to point back at the definition they were derived
/// from. It describes the owner; it does not keep it alive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub uid: String,
    /// Marks the owner as the managing controller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_owner_deletion: Option<bool>,
}

impl OwnerReference {
    /// Returns the API group portion of `api_version` (empty for the core
    /// group).
    pub fn group(&self) -> &str {
        self.api_version
            .rsplit_once('/')
            .map(|(group, _)| group)
            .unwrap_or("")
    }

    /// Returns the version portion of `api_version`.
    pub fn version(&self) -> &str {
        self.api_version
            .rsplit_once('/')
            .map(|(_, version)| version)
            .unwrap_or(&self.api_version)
    }
}

/// Names under which a resource kind is served.
///
/// # Examples
///
/// ```
/// use xrd_crd_core::ResourceNames;
///
/// let names = ResourceNames::new("XPostgreSQLInstance", "xpostgresqlinstances")
///     .with_singular("xpostgresqlinstance")
///     .with_category("sql");
/// assert_eq!(names.kind, "XPostgreSQLInstance");
/// assert_eq!(names.categories, vec!["sql"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNames {
    pub kind: String,
    pub plural: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub singular: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub list_kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub short_names: Vec<String>,
    /// Groupings such as `all` that clients may use to list several kinds
    /// at once.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl ResourceNames {
    /// Creates a name set from its required kind and plural forms.
    pub fn new(kind: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            plural: plural.into(),
            ..Self::default()
        }
    }

    pub fn with_singular(mut self, singular: impl Into<String>) -> Self {
        self.singular = singular.into();
        self
    }

    pub fn with_list_kind(mut self, list_kind: impl Into<String>) -> Self {
        self.list_kind = list_kind.into();
        self
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_names.push(short_name.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }
}

/// A display-only column shown when listing resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterColumn {
    pub name: String,
    /// Column data type (`string`, `integer`, `date`, ...).
    #[serde(rename = "type")]
    pub column_type: String,
    /// JSONPath into the resource selecting the displayed value.
    #[serde(rename = "jsonPath")]
    pub json_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl PrinterColumn {
    /// Creates a column with the given name, type and JSONPath.
    ///
    /// # Examples
    ///
    /// ```
    /// use xrd_crd_core::PrinterColumn;
    ///
    /// let col = PrinterColumn::new("SIZE", "integer", ".spec.storageGB");
    /// assert_eq!(col.column_type, "integer");
    /// assert!(col.priority.is_none());
    /// ```
    pub fn new(
        name: impl Into<String>,
        column_type: impl Into<String>,
        json_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            json_path: json_path.into(),
            description: None,
            format: None,
            priority: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// An undecoded OpenAPI v3 schema document.
///
/// The bytes are kept as supplied and only decoded when spec properties are
/// extracted during generation, so a malformed schema surfaces as a
/// generation error rather than a load error. In manifests the document is
/// embedded as a plain object.
///
/// # Examples
///
/// ```
/// use xrd_crd_core::RawSchema;
///
/// let raw = RawSchema::from_value(&serde_json::json!({"type": "object"}));
/// assert_eq!(raw.as_bytes(), br#"{"type":"object"}"#);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct RawSchema(Vec<u8>);

impl RawSchema {
    /// Wraps raw JSON bytes without decoding them.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Encodes an already-parsed JSON document.
    pub fn from_value(value: &serde_json::Value) -> Self {
        Self(value.to_string().into_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for RawSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawSchema")
            .field(&String::from_utf8_lossy(&self.0))
            .finish()
    }
}

impl Serialize for RawSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value: serde_json::Value = serde_json::from_slice(&self.0).map_err(S::Error::custom)?;
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.is_null() {
            return Err(D::Error::custom("validation schema cannot be null"));
        }
        Ok(Self::from_value(&value))
    }
}

/// Validation attached to a definition version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeResourceValidation {
    #[serde(rename = "openAPIV3Schema")]
    pub open_api_v3_schema: RawSchema,
}

/// One served version of a composite resource definition.
///
/// # Examples
///
/// ```
/// use xrd_crd_core::{DefinitionVersion, PrinterColumn};
///
/// let v = DefinitionVersion::new("v1alpha1")
///     .with_referenceable(true)
///     .with_printer_column(PrinterColumn::new("SIZE", "integer", ".spec.storageGB"));
/// assert!(v.served);
/// assert!(v.referenceable);
/// assert!(v.schema.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionVersion {
    pub name: String,
    /// Whether the version is served through the REST API.
    pub served: bool,
    /// Whether this is the version composed resources and claims refer to,
    /// and therefore the version persisted in storage.
    pub referenceable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_printer_columns: Vec<PrinterColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<CompositeResourceValidation>,
}

impl DefinitionVersion {
    /// Creates a served, non-referenceable version with no schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            served: true,
            referenceable: false,
            additional_printer_columns: Vec::new(),
            schema: None,
        }
    }

    pub fn with_served(mut self, served: bool) -> Self {
        self.served = served;
        self
    }

    pub fn with_referenceable(mut self, referenceable: bool) -> Self {
        self.referenceable = referenceable;
        self
    }

    pub fn with_printer_column(mut self, column: PrinterColumn) -> Self {
        self.additional_printer_columns.push(column);
        self
    }

    /// Attaches an OpenAPI v3 validation schema.
    pub fn with_schema(mut self, schema: RawSchema) -> Self {
        self.schema = Some(CompositeResourceValidation {
            open_api_v3_schema: schema,
        });
        self
    }

    /// Returns the raw validation schema, if one is attached.
    pub fn raw_schema(&self) -> Option<&RawSchema> {
        self.schema.as_ref().map(|s| &s.open_api_v3_schema)
    }
}

/// Desired state of a composite resource definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeResourceDefinitionSpec {
    /// API group of the defined composite resource and its claim.
    pub group: String,
    /// Names of the cluster scoped composite resource.
    pub names: ResourceNames,
    /// Names of the namespaced claim, if the resource offers one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_names: Option<ResourceNames>,
    #[serde(default)]
    pub versions: Vec<DefinitionVersion>,
}

/// Abstract definition of a composite resource and, optionally, its claim.
///
/// # Examples
///
/// ```
/// use xrd_crd_core::*;
///
/// let xrd = CompositeResourceDefinition::new(
///     "xpostgresqlinstances.example.org",
///     "example.org",
///     ResourceNames::new("XPostgreSQLInstance", "xpostgresqlinstances"),
/// )
/// .with_claim_names(ResourceNames::new("PostgreSQLInstance", "postgresqlinstances"))
/// .with_version(DefinitionVersion::new("v1alpha1").with_referenceable(true));
///
/// assert_eq!(xrd.api_version, "apiextensions.crossplane.io/v1alpha1");
/// assert!(xrd.offers_claim());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeResourceDefinition {
    #[serde(default = "xrd_api_version")]
    pub api_version: String,
    #[serde(default = "xrd_kind")]
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: CompositeResourceDefinitionSpec,
}

impl CompositeResourceDefinition {
    /// Creates a definition with no versions and no claim names.
    pub fn new(name: impl Into<String>, group: impl Into<String>, names: ResourceNames) -> Self {
        Self {
            api_version: xrd_api_version(),
            kind: xrd_kind(),
            metadata: ObjectMeta::named(name),
            spec: CompositeResourceDefinitionSpec {
                group: group.into(),
                names,
                claim_names: None,
                versions: Vec::new(),
            },
        }
    }

    pub fn with_claim_names(mut self, names: ResourceNames) -> Self {
        self.spec.claim_names = Some(names);
        self
    }

    pub fn with_version(mut self, version: DefinitionVersion) -> Self {
        self.spec.versions.push(version);
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.annotations.insert(key.into(), value.into());
        self
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.metadata.uid = Some(uid.into());
        self
    }

    /// Returns `true` if claim names are declared.
    pub fn offers_claim(&self) -> bool {
        self.spec.claim_names.is_some()
    }

    /// Builds a controller owner reference pointing at this definition.
    ///
    /// The reference always names the composite resource definition kind,
    /// whatever `api_version` and `kind` the value was read with.
    pub fn controller_reference(&self) -> OwnerReference {
        OwnerReference {
            api_version: xrd_api_version(),
            kind: xrd_kind(),
            name: self.metadata.name.clone(),
            uid: self.metadata.uid.clone().unwrap_or_default(),
            controller: Some(true),
            block_owner_deletion: Some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_definition_deserializes_from_manifest() {
        let yaml = r#"
apiVersion: apiextensions.crossplane.io/v1alpha1
kind: CompositeResourceDefinition
metadata:
  name: xpostgresqlinstances.example.org
  labels:
    team: data
spec:
  group: example.org
  names:
    kind: XPostgreSQLInstance
    plural: xpostgresqlinstances
  claimNames:
    kind: PostgreSQLInstance
    plural: postgresqlinstances
  versions:
  - name: v1alpha1
    served: true
    referenceable: true
    additionalPrinterColumns:
    - name: SIZE
      type: integer
      jsonPath: .spec.storageGB
    schema:
      openAPIV3Schema:
        type: object
        properties:
          spec:
            type: object
            properties:
              storageGB:
                type: integer
"#;
        let xrd: CompositeResourceDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(xrd.metadata.name, "xpostgresqlinstances.example.org");
        assert_eq!(xrd.metadata.labels["team"], "data");
        assert_eq!(xrd.spec.claim_names.as_ref().unwrap().kind, "PostgreSQLInstance");
        assert_eq!(xrd.spec.versions.len(), 1);

        let version = &xrd.spec.versions[0];
        assert_eq!(version.additional_printer_columns[0].json_path, ".spec.storageGB");
        let raw: serde_json::Value =
            serde_json::from_slice(version.raw_schema().unwrap().as_bytes()).unwrap();
        assert_eq!(
            raw["properties"]["spec"]["properties"]["storageGB"]["type"],
            "integer"
        );
    }

    #[test]
    fn test_raw_schema_serializes_as_embedded_object() {
        let version = DefinitionVersion::new("v1")
            .with_schema(RawSchema::from_value(&json!({"type": "object"})));
        let value = serde_json::to_value(&version).unwrap();
        assert_eq!(value["schema"]["openAPIV3Schema"], json!({"type": "object"}));
    }

    #[test]
    fn test_raw_schema_keeps_undecodable_bytes() {
        let raw = RawSchema::from_bytes("{not json");
        assert_eq!(raw.as_bytes(), b"{not json");
        assert!(serde_json::to_value(&raw).is_err());
    }

    #[test]
    fn test_missing_type_meta_defaults_to_xrd() {
        let xrd: CompositeResourceDefinition = serde_json::from_value(json!({
            "metadata": {"name": "xs.example.org"},
            "spec": {"group": "example.org", "names": {"kind": "X", "plural": "xs"}}
        }))
        .unwrap();
        assert_eq!(xrd.api_version, "apiextensions.crossplane.io/v1alpha1");
        assert_eq!(xrd.kind, "CompositeResourceDefinition");
        assert!(xrd.spec.versions.is_empty());
        assert!(!xrd.offers_claim());
    }

    #[test]
    fn test_controller_reference_describes_definition() {
        let xrd = CompositeResourceDefinition::new(
            "xs.example.org",
            "example.org",
            ResourceNames::new("X", "xs"),
        )
        .with_uid("1234");
        let owner = xrd.controller_reference();
        assert_eq!(owner.group(), "apiextensions.crossplane.io");
        assert_eq!(owner.version(), "v1alpha1");
        assert_eq!(owner.kind, "CompositeResourceDefinition");
        assert_eq!(owner.name, "xs.example.org");
        assert_eq!(owner.uid, "1234");
        assert_eq!(owner.controller, Some(true));
    }
}
