//! Plugin system configuration.

use serde::{Deserialize, Serialize};

/// What the host does when two plugins claim the same identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Abort startup with a conflict error.
    #[default]
    Abort,
    /// Keep the first plugin, report the second as a discovery failure.
    Skip,
}

/// Plugin system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Directory scanned for plugin packages.
    #[serde(default = "default_plugin_directory")]
    pub directory: String,
    /// Plugin identifiers that are never activated.
    #[serde(default)]
    pub disabled: Vec<String>,
    /// Duplicate identifier policy.
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
    /// Surface event handler failures to the publisher.
    #[serde(default)]
    pub strict_dispatch: bool,
    /// Prefix for plugin entries in the host activation list.
    #[serde(default = "default_app_prefix")]
    pub app_prefix: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            directory: default_plugin_directory(),
            disabled: Vec::new(),
            on_duplicate: DuplicatePolicy::default(),
            strict_dispatch: false,
            app_prefix: default_app_prefix(),
        }
    }
}

fn default_plugin_directory() -> String {
    "/karrio/plugins".to_string()
}

fn default_app_prefix() -> String {
    "plugins".to_string()
}
