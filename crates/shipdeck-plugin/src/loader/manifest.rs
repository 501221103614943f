//! `plugin.toml` — the marker file that makes a directory a plugin package.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::DiscoveryError;

/// Name of the marker file inside a plugin package directory.
pub const MANIFEST_FILE: &str = "plugin.toml";

/// Parsed plugin manifest. An empty file is a valid manifest.
///
/// ```toml
/// entry = "custom_integration"   # defaults to the directory name
/// enabled = true
///
/// [settings]
/// endpoint = "https://partner.example"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PluginManifest {
    /// Catalog entry or library name; the directory name when absent.
    #[serde(default)]
    pub entry: Option<String>,
    /// Whether the package should be activated.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Free-form settings handed to the plugin.
    #[serde(default)]
    pub settings: Map<String, Value>,
}

impl Default for PluginManifest {
    fn default() -> Self {
        Self {
            entry: None,
            enabled: true,
            settings: Map::new(),
        }
    }
}

impl PluginManifest {
    /// Reads and parses a manifest file.
    pub fn load(path: &Path) -> Result<Self, DiscoveryError> {
        let invalid = |reason: String| DiscoveryError::InvalidManifest {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        toml::from_str(&content).map_err(|e| invalid(e.message().to_string()))
    }

    /// Entry name, falling back to the package directory name.
    pub fn entry_or<'a>(&'a self, directory_name: &'a str) -> &'a str {
        self.entry
            .as_deref()
            .filter(|entry| !entry.is_empty())
            .unwrap_or(directory_name)
    }
}

fn default_true() -> bool {
    true
}
