//! Plugin loader — discovers plugin packages in a directory and activates them.
//!
//! Each immediate subdirectory holding a [`MANIFEST_FILE`] is a candidate.
//! Candidates are processed in lexicographic order. A candidate goes through
//! manifest parsing, catalog resolution, descriptor validation, registration
//! and `initialize`; any failure is recorded in the [`LoadReport`] and
//! discovery moves on to the next candidate.

pub mod catalog;
#[cfg(feature = "dynamic")]
pub mod dynamic;
pub mod error;
pub mod manifest;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Map;
use tracing::{debug, error, info, warn};

use shipdeck_core::config::{DuplicatePolicy, PluginConfig};
use shipdeck_core::error::AppError;
use shipdeck_core::result::AppResult;

use crate::context::PluginContext;
use crate::descriptor::Plugin;
use crate::events::EventBus;
use crate::events::bus::panic_message;
use crate::registry::PluginRegistry;

pub use catalog::{PluginCatalog, PluginFactory};
pub use error::DiscoveryError;
pub use manifest::{MANIFEST_FILE, PluginManifest};

/// Loader options derived from the `[plugins]` configuration section.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Plugin identifiers that must not be activated.
    pub disabled: Vec<String>,
    /// What to do when two candidates share an identifier.
    pub on_duplicate: DuplicatePolicy,
}

impl From<&PluginConfig> for LoadOptions {
    fn from(config: &PluginConfig) -> Self {
        Self {
            disabled: config.disabled.clone(),
            on_duplicate: config.on_duplicate,
        }
    }
}

impl LoadOptions {
    fn is_disabled(&self, plugin_id: &str) -> bool {
        self.disabled.iter().any(|id| id == plugin_id)
    }
}

/// A candidate that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFailure {
    /// Candidate directory name, or plugin id for static registration.
    pub candidate: String,
    /// What went wrong.
    pub error: DiscoveryError,
}

impl CandidateFailure {
    /// Stable error kind, see [`DiscoveryError::kind`].
    pub fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

/// Why a directory entry was passed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A plain file, not a package directory.
    NotADirectory,
    /// A directory without a `plugin.toml` marker.
    NoManifest,
    /// The manifest sets `enabled = false`.
    DisabledByManifest,
    /// The plugin id is listed in `plugins.disabled`.
    DisabledByConfig,
}

impl SkipReason {
    /// Stable snake_case name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotADirectory => "not_a_directory",
            Self::NoManifest => "no_manifest",
            Self::DisabledByManifest => "disabled_by_manifest",
            Self::DisabledByConfig => "disabled_by_config",
        }
    }
}

/// A directory entry that was deliberately not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCandidate {
    /// Entry name.
    pub candidate: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Outcome of a discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Identifiers of plugins registered and initialized, in load order.
    pub loaded: Vec<String>,
    /// Candidates that failed.
    pub failures: Vec<CandidateFailure>,
    /// Entries passed over without error.
    pub skipped: Vec<SkippedCandidate>,
}

impl LoadReport {
    fn fail(&mut self, candidate: &str, error: DiscoveryError) {
        warn!(
            candidate = %candidate,
            kind = error.kind(),
            error = %error,
            "Plugin candidate failed"
        );
        self.failures.push(CandidateFailure {
            candidate: candidate.to_string(),
            error,
        });
    }

    fn skip(&mut self, candidate: &str, reason: SkipReason) {
        debug!(candidate = %candidate, reason = ?reason, "Skipping plugin candidate");
        self.skipped.push(SkippedCandidate {
            candidate: candidate.to_string(),
            reason,
        });
    }
}

/// One-shot loader over a catalog, a registry and a bus.
#[derive(Debug)]
pub struct PluginLoader<'a> {
    catalog: &'a PluginCatalog,
    registry: &'a PluginRegistry,
    bus: &'a EventBus,
    options: LoadOptions,
}

impl<'a> PluginLoader<'a> {
    /// Creates a loader.
    pub fn new(
        catalog: &'a PluginCatalog,
        registry: &'a PluginRegistry,
        bus: &'a EventBus,
        options: LoadOptions,
    ) -> Self {
        Self {
            catalog,
            registry,
            bus,
            options,
        }
    }

    /// Discovers and activates every plugin package under `path`.
    ///
    /// A missing directory yields an empty report. The only error returned
    /// is a duplicate identifier under [`DuplicatePolicy::Abort`]; plugins
    /// activated earlier in the same pass are rolled back before it is
    /// returned.
    pub fn load_directory(&self, path: &Path) -> AppResult<LoadReport> {
        let mut report = LoadReport::default();

        if !path.exists() {
            info!(path = %path.display(), "Plugin directory does not exist, no plugins loaded");
            return Ok(report);
        }

        let entries = match std::fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                report.fail(
                    &path.display().to_string(),
                    DiscoveryError::Io {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    },
                );
                return Ok(report);
            }
        };

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    report.fail(
                        &path.display().to_string(),
                        DiscoveryError::Io {
                            path: path.to_path_buf(),
                            reason: e.to_string(),
                        },
                    );
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let dir = entry.path();

            if !dir.is_dir() {
                report.skip(&name, SkipReason::NotADirectory);
            } else if !dir.join(MANIFEST_FILE).is_file() {
                report.skip(&name, SkipReason::NoManifest);
            } else {
                candidates.push((name, dir));
            }
        }
        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        info!(
            path = %path.display(),
            candidates = candidates.len(),
            "Discovering plugins"
        );

        for (name, dir) in &candidates {
            if let Err(e) = self.load_candidate(name, dir, &mut report) {
                self.abandon(&report);
                return Err(e);
            }
        }

        info!(
            loaded = report.loaded.len(),
            failed = report.failures.len(),
            skipped = report.skipped.len(),
            "Plugin discovery complete"
        );

        Ok(report)
    }

    /// Registers and initializes compiled-in plugins without a directory.
    pub fn load_static(&self, plugins: Vec<Arc<dyn Plugin>>) -> AppResult<LoadReport> {
        let mut report = LoadReport::default();
        let settings = Map::new();

        for plugin in plugins {
            let candidate = plugin.info().id;
            if let Err(e) = self.activate(&candidate, plugin, None, &settings, &mut report) {
                self.abandon(&report);
                return Err(e);
            }
        }

        Ok(report)
    }

    /// Undoes every plugin activated by an aborted pass, newest first.
    ///
    /// Plugins registered by earlier passes are left alone.
    fn abandon(&self, report: &LoadReport) {
        for id in report.loaded.iter().rev() {
            let removed = self.bus.unsubscribe_plugin(id);
            self.registry.rollback(id);
            warn!(
                plugin_id = %id,
                handlers_removed = removed,
                "Rolled back plugin after aborted load"
            );
        }
    }

    fn load_candidate(&self, name: &str, dir: &Path, report: &mut LoadReport) -> AppResult<()> {
        let manifest = match PluginManifest::load(&dir.join(MANIFEST_FILE)) {
            Ok(manifest) => manifest,
            Err(e) => {
                report.fail(name, e);
                return Ok(());
            }
        };

        if !manifest.enabled {
            report.skip(name, SkipReason::DisabledByManifest);
            return Ok(());
        }

        let entry = manifest.entry_or(name);
        let plugin = match self.catalog.resolve(entry, dir) {
            Ok(plugin) => plugin,
            Err(e) => {
                report.fail(name, e);
                return Ok(());
            }
        };

        self.activate(name, plugin, Some(dir), &manifest.settings, report)
    }

    fn activate(
        &self,
        candidate: &str,
        plugin: Arc<dyn Plugin>,
        directory: Option<&Path>,
        settings: &Map<String, serde_json::Value>,
        report: &mut LoadReport,
    ) -> AppResult<()> {
        let info = plugin.info();
        if let Err(e) = info.validate() {
            report.fail(candidate, e.into());
            return Ok(());
        }

        if self.options.is_disabled(&info.id) {
            report.skip(candidate, SkipReason::DisabledByConfig);
            return Ok(());
        }

        if let Err(e) = self.registry.register(Arc::clone(&plugin)) {
            return match self.options.on_duplicate {
                DuplicatePolicy::Abort => {
                    error!(candidate = %candidate, error = %e, "Aborting plugin discovery");
                    Err(AppError::from(e))
                }
                DuplicatePolicy::Skip => {
                    report.fail(candidate, e.into());
                    Ok(())
                }
            };
        }

        let ctx = PluginContext::new(&info.id, self.bus, directory, settings);
        let outcome = catch_unwind(AssertUnwindSafe(|| plugin.initialize(&ctx)));
        let reason = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(panic) => Some(panic_message(panic.as_ref())),
        };

        if let Some(reason) = reason {
            let removed = self.bus.unsubscribe_plugin(&info.id);
            self.registry.rollback(&info.id);
            debug!(plugin_id = %info.id, handlers_removed = removed, "Rolled back failed plugin");
            report.fail(
                candidate,
                DiscoveryError::InitFailed {
                    id: info.id,
                    reason,
                },
            );
            return Ok(());
        }

        info!(
            plugin_id = %info.id,
            name = %info.name,
            version = %info.version,
            "Plugin loaded"
        );
        report.loaded.push(info.id);
        Ok(())
    }
}
