//! Plugin registry — stores loaded plugin instances keyed by identifier.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{info, warn};

use shipdeck_core::error::AppError;

use crate::descriptor::{Plugin, PluginInfo};

/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Another plugin already holds this identifier.
    #[error("Plugin '{id}' is already registered (existing version {existing_version})")]
    DuplicateIdentifier {
        /// The contested identifier.
        id: String,
        /// Version of the plugin that keeps the identifier.
        existing_version: String,
    },
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        AppError::conflict(err.to_string())
    }
}

/// A registered plugin and its metadata snapshot.
#[derive(Debug, Clone)]
struct RegisteredPlugin {
    /// The plugin instance.
    plugin: Arc<dyn Plugin>,
    /// Metadata captured at registration.
    info: PluginInfo,
}

/// Registry of all loaded plugins.
///
/// Plugins are registered once per process; there is no public removal.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    /// Plugin ID → plugin, ordered by ID.
    plugins: RwLock<BTreeMap<String, RegisteredPlugin>>,
}

impl PluginRegistry {
    /// Creates a new empty plugin registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin. Fails if its identifier is taken; the existing
    /// plugin is left in place.
    pub fn register(&self, plugin: Arc<dyn Plugin>) -> Result<(), RegistryError> {
        let info = plugin.info();

        let mut plugins = self.plugins.write();
        if let Some(existing) = plugins.get(&info.id) {
            warn!(
                plugin_id = %info.id,
                existing_version = %existing.info.version,
                rejected_version = %info.version,
                "Duplicate plugin identifier"
            );
            return Err(RegistryError::DuplicateIdentifier {
                id: info.id,
                existing_version: existing.info.version.clone(),
            });
        }

        info!(
            plugin_id = %info.id,
            name = %info.name,
            version = %info.version,
            "Registering plugin"
        );

        plugins.insert(info.id.clone(), RegisteredPlugin { plugin, info });
        Ok(())
    }

    /// Undoes a registration whose initialization failed.
    pub(crate) fn rollback(&self, plugin_id: &str) {
        if self.plugins.write().remove(plugin_id).is_some() {
            info!(plugin_id = %plugin_id, "Plugin registration rolled back");
        }
    }

    /// Gets a plugin by ID.
    pub fn get(&self, plugin_id: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins
            .read()
            .get(plugin_id)
            .map(|entry| Arc::clone(&entry.plugin))
    }

    /// Gets a plugin's metadata by ID.
    pub fn info(&self, plugin_id: &str) -> Option<PluginInfo> {
        self.plugins
            .read()
            .get(plugin_id)
            .map(|entry| entry.info.clone())
    }

    /// Lists all registered plugin metadata, sorted by identifier.
    pub fn list_all(&self) -> Vec<PluginInfo> {
        self.plugins
            .read()
            .values()
            .map(|entry| entry.info.clone())
            .collect()
    }

    /// Lists registered identifiers, sorted.
    pub fn ids(&self) -> Vec<String> {
        self.plugins.read().keys().cloned().collect()
    }

    /// Checks whether a plugin is registered.
    pub fn contains(&self, plugin_id: &str) -> bool {
        self.plugins.read().contains_key(plugin_id)
    }

    /// Returns plugin count.
    pub fn len(&self) -> usize {
        self.plugins.read().len()
    }

    /// Returns whether no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.read().is_empty()
    }
}
