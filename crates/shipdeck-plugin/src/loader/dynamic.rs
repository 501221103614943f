//! Dynamic plugin loading using `libloading` (feature-gated).
//!
//! A dynamic plugin is a shared library built against this crate that
//! exports the symbols generated by [`declare_plugin!`](crate::declare_plugin):
//!
//! - `_shipdeck_plugin_api_version() -> u32`
//! - `_shipdeck_plugin_create() -> *mut dyn Plugin`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::{Library, Symbol};
use parking_lot::Mutex;
use tracing::info;

use crate::API_VERSION;
use crate::descriptor::Plugin;

use super::error::DiscoveryError;

/// Type of the plugin creation function exported by dynamic plugins.
///
/// Uses the Rust ABI: host and plugin must be built by the same compiler.
pub type CreatePluginFn = unsafe fn() -> *mut dyn Plugin;

/// Type of the API version function exported by dynamic plugins.
pub type ApiVersionFn = unsafe fn() -> u32;

/// Finds `<entry>.<ext>` or `lib<entry>.<ext>` in a package directory.
pub fn library_path(directory: &Path, entry: &str) -> Option<PathBuf> {
    let extension = std::env::consts::DLL_EXTENSION;
    [
        format!("{entry}.{extension}"),
        format!("{}{entry}.{extension}", std::env::consts::DLL_PREFIX),
    ]
    .into_iter()
    .map(|file| directory.join(file))
    .find(|path| path.is_file())
}

/// Keeps loaded libraries alive for the lifetime of the process.
///
/// Must be dropped after every plugin and handler created from them.
#[derive(Debug, Default)]
pub struct DynamicLoader {
    /// Loaded libraries.
    libraries: Mutex<Vec<Library>>,
}

impl DynamicLoader {
    /// Loads a plugin from the given shared library path.
    ///
    /// # Safety
    /// This function runs arbitrary code from a shared library.
    /// Only load trusted plugins.
    pub unsafe fn load(&self, entry: &str, path: &Path) -> Result<Arc<dyn Plugin>, DiscoveryError> {
        let unresolved = |reason: String| DiscoveryError::Unresolved {
            entry: entry.to_string(),
            reason,
        };

        let library = unsafe { Library::new(path) }
            .map_err(|e| unresolved(format!("failed to load '{}': {e}", path.display())))?;

        let version: Symbol<ApiVersionFn> = unsafe { library.get(b"_shipdeck_plugin_api_version") }
            .map_err(|e| unresolved(format!("missing API version symbol: {e}")))?;
        let found = unsafe { version() };
        if found != API_VERSION {
            return Err(unresolved(format!(
                "API version mismatch: host expects {API_VERSION}, plugin has {found}"
            )));
        }

        let create: Symbol<CreatePluginFn> = unsafe { library.get(b"_shipdeck_plugin_create") }
            .map_err(|e| unresolved(format!("missing create symbol: {e}")))?;

        let raw = unsafe { create() };
        if raw.is_null() {
            return Err(unresolved("plugin constructor returned null".to_string()));
        }
        let plugin: Arc<dyn Plugin> = Arc::from(unsafe { Box::from_raw(raw) });

        info!(entry = %entry, path = %path.display(), "Dynamic plugin library loaded");

        self.libraries.lock().push(library);
        Ok(plugin)
    }

    /// Number of libraries held open.
    pub fn loaded_count(&self) -> usize {
        self.libraries.lock().len()
    }
}
