//! Driver configuration loaded from TOML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options controlling a lowering run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct DriverConfig {
    /// Name shown for the source in diagnostics
    pub file_name: String,

    /// Lower even when the grammar reported syntax errors
    ///
    /// Error regions then surface as lowering errors instead.
    pub lower_despite_syntax_errors: bool,

    /// Render one-line diagnostics instead of source excerpts
    pub short_diagnostics: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            lower_despite_syntax_errors: false,
            short_diagnostics: false,
        }
    }
}

fn default_file_name() -> String {
    "<input>".to_string()
}

impl DriverConfig {
    /// Parse a configuration document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or has unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid driver configuration")
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Same configuration with a different source name
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}
