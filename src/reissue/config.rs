//! Load-time configuration for the re-issue pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Layout, NumberFormat, ReissueError};
use crate::vat::DEFAULT_COUNTRY;

/// Everything the pipeline reads at startup. Missing keys take the built-in
/// defaults, so `{}` is a valid configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReissueConfig {
    /// Anchor literals and extraction options.
    pub layout: Layout,
    /// VAT resolution.
    pub vat: VatConfig,
    /// Currency symbol, separators and precision.
    pub format: NumberFormat,
    /// Markup inserted between the lines of address and details blocks.
    pub line_break: String,
}

impl Default for ReissueConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            vat: VatConfig::default(),
            format: NumberFormat::default(),
            line_break: "<br/>".into(),
        }
    }
}

/// VAT resolution options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VatConfig {
    /// Country whose base rate applies to unknown billing countries;
    /// `null` turns unknown countries into errors.
    pub default_country: Option<String>,
}

impl Default for VatConfig {
    fn default() -> Self {
        Self {
            default_country: Some(DEFAULT_COUNTRY.into()),
        }
    }
}

impl ReissueConfig {
    /// Parse a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ReissueError> {
        serde_json::from_str(json).map_err(|e| ReissueError::Config(e.to_string()))
    }

    /// Load a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ReissueError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReissueError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
    }
}
