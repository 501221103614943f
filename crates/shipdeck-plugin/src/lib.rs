//! # shipdeck-plugin
//!
//! Plugin framework for Shipdeck. Provides:
//!
//! - Directory-based plugin discovery with per-candidate error isolation
//! - A registry of loaded plugins keyed by identifier
//! - A synchronous named-event bus with failure-isolated handlers
//! - A host layer wiring discovery into the platform activation list
//! - Optional dynamic loading via `libloading` (`dynamic` feature)

pub mod context;
pub mod descriptor;
pub mod events;
pub mod host;
pub mod loader;
pub mod macros;
pub mod prelude;
pub mod registry;

pub use context::PluginContext;
pub use descriptor::{DescriptorError, Plugin, PluginInfo};
pub use events::{DispatchReport, EventBus, EventHandler, EventPayload, HandlerFailure};
pub use host::PluginHost;
pub use loader::{
    CandidateFailure, DiscoveryError, LoadOptions, LoadReport, PluginCatalog, PluginLoader,
    PluginManifest, SkipReason, SkippedCandidate,
};
pub use registry::{PluginRegistry, RegistryError};

/// Version of the dynamic plugin interface. Bumped on any breaking change
/// to [`Plugin`] or [`PluginContext`].
pub const API_VERSION: u32 = 1;
