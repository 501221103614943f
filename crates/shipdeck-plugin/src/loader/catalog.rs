//! Plugin catalog — startup-time table of plugin factories.
//!
//! A discovered package names an entry; the catalog turns that entry into a
//! plugin instance. Compiled-in plugins are registered here by the host
//! binary. With the `dynamic` feature, an entry missing from the table can
//! also be satisfied by a shared library inside the package directory.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::descriptor::Plugin;

use super::error::DiscoveryError;

/// Builds a fresh plugin instance.
pub type PluginFactory = Arc<dyn Fn() -> Arc<dyn Plugin> + Send + Sync>;

/// Table of entry name → plugin factory.
#[derive(Default)]
pub struct PluginCatalog {
    /// Entry name → factory.
    factories: BTreeMap<String, PluginFactory>,
    /// Shared libraries backing dynamically loaded plugins.
    #[cfg(feature = "dynamic")]
    dynamic: super::dynamic::DynamicLoader,
}

impl PluginCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a factory under an entry name, replacing any previous one.
    pub fn insert<F>(&mut self, entry: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn Plugin> + Send + Sync + 'static,
    {
        self.factories.insert(entry.into(), Arc::new(factory));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<F>(mut self, entry: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn Plugin> + Send + Sync + 'static,
    {
        self.insert(entry, factory);
        self
    }

    /// Whether an entry is known.
    pub fn contains(&self, entry: &str) -> bool {
        self.factories.contains_key(entry)
    }

    /// Known entry names, sorted.
    pub fn entries(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Produces the plugin for an entry.
    pub fn resolve(
        &self,
        entry: &str,
        directory: &Path,
    ) -> Result<Arc<dyn Plugin>, DiscoveryError> {
        if let Some(factory) = self.factories.get(entry) {
            debug!(entry = %entry, "Resolving plugin from catalog");
            return catch_unwind(AssertUnwindSafe(|| factory())).map_err(|_| {
                DiscoveryError::Unresolved {
                    entry: entry.to_string(),
                    reason: "plugin factory panicked".to_string(),
                }
            });
        }

        self.resolve_dynamic(entry, directory)
    }

    #[cfg(feature = "dynamic")]
    fn resolve_dynamic(
        &self,
        entry: &str,
        directory: &Path,
    ) -> Result<Arc<dyn Plugin>, DiscoveryError> {
        let Some(path) = super::dynamic::library_path(directory, entry) else {
            return Err(DiscoveryError::Unresolved {
                entry: entry.to_string(),
                reason: format!(
                    "not in catalog and no shared library found in {}",
                    directory.display()
                ),
            });
        };

        // SAFETY: the library sits in the operator-configured plugin
        // directory and is checked for the plugin API version before its
        // constructor is called.
        unsafe { self.dynamic.load(entry, &path) }
    }

    #[cfg(not(feature = "dynamic"))]
    fn resolve_dynamic(
        &self,
        entry: &str,
        _directory: &Path,
    ) -> Result<Arc<dyn Plugin>, DiscoveryError> {
        Err(DiscoveryError::Unresolved {
            entry: entry.to_string(),
            reason: "no plugin registered under this entry".to_string(),
        })
    }
}

impl fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginCatalog")
            .field("entries", &self.entries())
            .finish()
    }
}
