//! Render configuration.
//!
//! Optional YAML file controlling which CRDs `xrd-crd render` produces and
//! how it writes them. Every key may be omitted; missing keys take their
//! default. Command-line flags override file values.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! variants:
//!   - composite
//!   - claim
//! format: yaml
//! strict_versions: true
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xrd_crd_core::DefinitionVariant;

use crate::output::OutputFormat;

/// Errors reading or writing a [`RenderConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Configuration format version.
    pub version: String,
    /// CRDs to generate for each definition.
    pub variants: Vec<DefinitionVariant>,
    pub format: OutputFormat,
    /// Refuse definitions whose versions fail validation.
    pub strict_versions: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            variants: DefinitionVariant::ALL.to_vec(),
            format: OutputFormat::Yaml,
            strict_versions: false,
        }
    }
}

impl RenderConfig {
    /// Loads configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}
