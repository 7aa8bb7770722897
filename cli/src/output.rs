//! Output formatting for generated CRDs.

use serde::{Deserialize, Serialize};
use xrd_crd_core::CustomResourceDefinition;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl OutputFormat {
    /// File extension for files written in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

/// Formats a single CRD.
pub fn format_crd(crd: &CustomResourceDefinition, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(crd)
            .map(|mut out| {
                out.push('\n');
                out
            })
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(crd).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

/// Formats several CRDs as one document stream.
///
/// YAML documents are separated by `---`. JSON output is a single object: the
/// CRD itself when there is one, otherwise a `v1` `List` holding them all.
pub fn format_stream(
    crds: &[CustomResourceDefinition],
    format: OutputFormat,
) -> Result<String, String> {
    if format == OutputFormat::Json && crds.len() > 1 {
        let list = serde_json::json!({
            "apiVersion": "v1",
            "kind": "List",
            "items": crds,
        });
        return serde_json::to_string_pretty(&list)
            .map(|mut out| {
                out.push('\n');
                out
            })
            .map_err(|e| format!("JSON serialization failed: {e}"));
    }

    let mut out = String::new();
    for (i, crd) in crds.iter().enumerate() {
        if format == OutputFormat::Yaml && i > 0 {
            out.push_str("---\n");
        }
        out.push_str(&format_crd(crd, format)?);
    }
    Ok(out)
}
