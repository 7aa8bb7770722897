//! Standard properties and printer columns added to every generated CRD.
//!
//! The tables are built once on first use and are read-only afterwards.

use std::sync::LazyLock;

use crate::PrinterColumn;
use crate::schema::{JsonSchemaProps, PropertyTree};

fn tree<const N: usize>(entries: [(&str, JsonSchemaProps); N]) -> PropertyTree {
    entries
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect()
}

fn strings<const N: usize>(names: [&str; N]) -> JsonSchemaProps {
    names.into_iter().fold(JsonSchemaProps::object(), |node, name| {
        node.with_property(name, JsonSchemaProps::string())
    })
}

fn composition_ref() -> JsonSchemaProps {
    strings(["name"]).with_required(["name"])
}

fn composition_selector() -> JsonSchemaProps {
    JsonSchemaProps::object()
        .with_property(
            "matchLabels",
            JsonSchemaProps::object().with_additional_properties(JsonSchemaProps::string()),
        )
        .with_required(["matchLabels"])
}

fn date_time() -> JsonSchemaProps {
    JsonSchemaProps::string().with_format("date-time")
}

static BASE: LazyLock<PropertyTree> = LazyLock::new(|| {
    tree([
        ("apiVersion", JsonSchemaProps::string()),
        ("kind", JsonSchemaProps::string()),
        // Validated by the API server itself.
        ("metadata", JsonSchemaProps::object()),
        ("spec", JsonSchemaProps::object()),
        ("status", JsonSchemaProps::object()),
    ])
});

static COMPOSITE_SPEC: LazyLock<PropertyTree> = LazyLock::new(|| {
    tree([
        ("compositionRef", composition_ref()),
        ("compositionSelector", composition_selector()),
        (
            "claimRef",
            strings(["apiVersion", "kind", "namespace", "name"])
                .with_required(["apiVersion", "kind", "namespace", "name"]),
        ),
        (
            "resourceRefs",
            JsonSchemaProps::array(
                strings(["apiVersion", "name", "kind", "uid"])
                    .with_required(["apiVersion", "kind", "name"]),
            ),
        ),
        (
            "writeConnectionSecretToRef",
            strings(["name", "namespace"]).with_required(["name", "namespace"]),
        ),
    ])
});

static CLAIM_SPEC: LazyLock<PropertyTree> = LazyLock::new(|| {
    tree([
        ("compositionRef", composition_ref()),
        ("compositionSelector", composition_selector()),
        (
            "resourceRef",
            strings(["apiVersion", "kind", "name"]).with_required(["apiVersion", "kind", "name"]),
        ),
        (
            "writeConnectionSecretToRef",
            strings(["name"]).with_required(["name"]),
        ),
    ])
});

static STATUS: LazyLock<PropertyTree> = LazyLock::new(|| {
    tree([
        (
            "conditions",
            JsonSchemaProps::array(
                JsonSchemaProps::object()
                    .with_property("lastTransitionTime", date_time())
                    .with_property("message", JsonSchemaProps::string())
                    .with_property("reason", JsonSchemaProps::string())
                    .with_property("status", JsonSchemaProps::string())
                    .with_property("type", JsonSchemaProps::string())
                    .with_required(["lastTransitionTime", "reason", "status", "type"]),
            )
            .with_description("Conditions of the resource."),
        ),
        (
            "connectionDetails",
            JsonSchemaProps::object().with_property("lastPublishedTime", date_time()),
        ),
    ])
});

fn ready_column() -> PrinterColumn {
    PrinterColumn::new(
        "READY",
        "string",
        ".status.conditions[?(@.type=='Ready')].status",
    )
}

fn age_column() -> PrinterColumn {
    PrinterColumn::new("AGE", "date", ".metadata.creationTimestamp")
}

static COMPOSITE_COLUMNS: LazyLock<Vec<PrinterColumn>> = LazyLock::new(|| {
    vec![
        ready_column(),
        PrinterColumn::new("COMPOSITION", "string", ".spec.compositionRef.name"),
        age_column(),
    ]
});

static CLAIM_COLUMNS: LazyLock<Vec<PrinterColumn>> = LazyLock::new(|| {
    vec![
        ready_column(),
        PrinterColumn::new(
            "CONNECTION-SECRET",
            "string",
            ".spec.writeConnectionSecretToRef.name",
        ),
        age_column(),
    ]
});

/// Properties every generated schema starts from.
pub fn base_props() -> &'static PropertyTree {
    &BASE
}

/// Standard `spec` properties of a composite resource.
pub fn composite_spec_props() -> &'static PropertyTree {
    &COMPOSITE_SPEC
}

/// Standard `spec` properties of a composite resource claim.
pub fn claim_spec_props() -> &'static PropertyTree {
    &CLAIM_SPEC
}

/// Standard `status` properties shared by composite resources and claims.
pub fn status_props() -> &'static PropertyTree {
    &STATUS
}

pub fn composite_printer_columns() -> &'static [PrinterColumn] {
    &COMPOSITE_COLUMNS
}

pub fn claim_printer_columns() -> &'static [PrinterColumn] {
    &CLAIM_COLUMNS
}
