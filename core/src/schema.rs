//! OpenAPI v3 schema nodes and spec property extraction.
//!
//! [`JsonSchemaProps`] models the structural schema subset used by
//! CustomResourceDefinitions. Keywords the model does not name are kept in
//! [`JsonSchemaProps::extra`], so a caller's schema survives decoding and
//! re-encoding unchanged.
//!
//! [`spec_properties`] decodes a version's raw schema and returns only the
//! properties declared under `properties.spec.properties`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::RawSchema;
use crate::error::SchemaDecodeFailure;

/// Properties of an object schema keyed by property name.
///
/// Ordered so generated schemas serialize deterministically.
pub type PropertyTree = BTreeMap<String, JsonSchemaProps>;

/// A single OpenAPI v3 schema node.
///
/// # Examples
///
/// ```
/// use xrd_crd_core::JsonSchemaProps;
///
/// let secret_ref = JsonSchemaProps::object()
///     .with_property("name", JsonSchemaProps::string())
///     .with_required(["name"]);
/// assert_eq!(secret_ref.schema_type.as_deref(), Some("object"));
/// assert!(secret_ref.properties.contains_key("name"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchemaProps {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(
        default,
        deserialize_with = "property_tree",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub properties: PropertyTree,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<SchemaOrArray>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<SchemaOrBool>,
    #[serde(
        rename = "enum",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub enum_values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub nullable: bool,
    #[serde(
        rename = "x-kubernetes-preserve-unknown-fields",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub preserve_unknown_fields: Option<bool>,
    /// Any other schema keywords, carried through verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The `items` keyword: one schema for every element, or one per position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrArray {
    Schema(Box<JsonSchemaProps>),
    Array(Vec<JsonSchemaProps>),
}

/// The `additionalProperties` keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrBool {
    Bool(bool),
    Schema(Box<JsonSchemaProps>),
}

/// Decodes an explicit `null` as the field's default, as for an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes `properties`, reading a `null` map or a `null` entry as empty.
fn property_tree<'de, D>(deserializer: D) -> Result<PropertyTree, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<BTreeMap<String, Option<JsonSchemaProps>>> =
        Option::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(|(name, schema)| (name, schema.unwrap_or_default()))
        .collect())
}

impl JsonSchemaProps {
    /// Creates a node of the given `type`.
    pub fn typed(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            ..Self::default()
        }
    }

    pub fn object() -> Self {
        Self::typed("object")
    }

    pub fn string() -> Self {
        Self::typed("string")
    }

    /// Creates an array whose elements all match `items`.
    pub fn array(items: JsonSchemaProps) -> Self {
        Self {
            items: Some(SchemaOrArray::Schema(Box::new(items))),
            ..Self::typed("array")
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, schema: JsonSchemaProps) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    pub fn with_required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Restricts the values of undeclared keys to `schema`.
    pub fn with_additional_properties(mut self, schema: JsonSchemaProps) -> Self {
        self.additional_properties = Some(SchemaOrBool::Schema(Box::new(schema)));
        self
    }

    /// Returns the schema applied to every array element, if there is one.
    pub fn item_schema(&self) -> Option<&JsonSchemaProps> {
        match &self.items {
            Some(SchemaOrArray::Schema(schema)) => Some(schema),
            _ => None,
        }
    }
}

/// Extracts the properties declared under `properties.spec.properties`.
///
/// An absent or `null` schema, or a schema that declares no `spec`
/// properties, yields an empty tree. Keywords set to `null` read as unset. The extracted subtree is returned as decoded, nested
/// structure included.
///
/// # Errors
///
/// Returns [`SchemaDecodeFailure`] if `raw` is not a decodable schema
/// document.
///
/// # Examples
///
/// ```
/// use xrd_crd_core::{RawSchema, spec_properties};
///
/// let raw = RawSchema::from_bytes(
///     r#"{"properties":{"spec":{"properties":{"foo":{"type":"string"}}}}}"#,
/// );
/// let props = spec_properties(Some(&raw)).unwrap();
/// assert_eq!(props["foo"].schema_type.as_deref(), Some("string"));
///
/// assert!(spec_properties(None).unwrap().is_empty());
/// ```
pub fn spec_properties(raw: Option<&RawSchema>) -> Result<PropertyTree, SchemaDecodeFailure> {
    let Some(raw) = raw else {
        return Ok(PropertyTree::new());
    };

    let schema: Option<JsonSchemaProps> =
        serde_json::from_slice(raw.as_bytes()).map_err(SchemaDecodeFailure)?;
    let Some(mut schema) = schema else {
        return Ok(PropertyTree::new());
    };

    Ok(schema
        .properties
        .remove("spec")
        .map(|spec| spec.properties)
        .unwrap_or_default())
}
