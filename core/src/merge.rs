//! Layered property merging.
//!
//! A generated version schema is assembled by laying property sets over a
//! base object schema, one layer at a time. Each layer targets one named
//! property of the root (`spec` or `status`) and is merged shallowly by
//! key: a later layer replaces an earlier definition of the same property
//! wholesale, and properties the layer does not mention are left alone.
//!
//! # Example
//!
//! ```
//! use xrd_crd_core::*;
//!
//! let mut root = JsonSchemaProps::object()
//!     .with_property("spec", JsonSchemaProps::object());
//!
//! let mut caller = PropertyTree::new();
//! caller.insert("engine".into(), JsonSchemaProps::typed("integer"));
//! merge_into(&mut root, &caller, "spec");
//!
//! let mut standard = PropertyTree::new();
//! standard.insert("engine".into(), JsonSchemaProps::string());
//! merge_into(&mut root, &standard, "spec");
//!
//! assert_eq!(
//!     root.properties["spec"].properties["engine"].schema_type.as_deref(),
//!     Some("string"),
//! );
//! ```

use crate::schema::{JsonSchemaProps, PropertyTree};

/// Sets every property of `layer` on `target.properties[under_key]`.
///
/// Existing properties with the same name are overwritten; others are kept.
/// If `target` has no `under_key` property yet, an empty object schema is
/// created for it first.
pub fn merge_into(target: &mut JsonSchemaProps, layer: &PropertyTree, under_key: &str) {
    let node = target
        .properties
        .entry(under_key.to_string())
        .or_insert_with(JsonSchemaProps::object);

    for (key, schema) in layer {
        node.properties.insert(key.clone(), schema.clone());
    }
}
