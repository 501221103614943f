//! Discovery errors — per-candidate failures recorded by the loader.

use std::path::PathBuf;

use thiserror::Error;

use crate::descriptor::DescriptorError;
use crate::registry::RegistryError;

/// Why a candidate could not be loaded.
///
/// These are recovered locally: the candidate is skipped and discovery
/// continues with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// The `plugin.toml` marker could not be read or parsed.
    #[error("invalid manifest {}: {reason}", path.display())]
    InvalidManifest {
        /// Manifest path.
        path: PathBuf,
        /// Parser or I/O message.
        reason: String,
    },
    /// No plugin could be produced for the candidate's entry.
    #[error("cannot resolve plugin entry '{entry}': {reason}")]
    Unresolved {
        /// Entry name looked up in the catalog.
        entry: String,
        /// What went wrong.
        reason: String,
    },
    /// The plugin's descriptor is incomplete or malformed.
    #[error("malformed descriptor: {0}")]
    MalformedDescriptor(#[from] DescriptorError),
    /// Another plugin already holds the identifier.
    #[error(transparent)]
    Duplicate(#[from] RegistryError),
    /// `initialize` returned an error or panicked.
    #[error("initialization of '{id}' failed: {reason}")]
    InitFailed {
        /// Plugin identifier.
        id: String,
        /// Error or panic message.
        reason: String,
    },
    /// The plugin directory itself could not be listed.
    #[error("cannot read plugin directory {}: {reason}", path.display())]
    Io {
        /// Directory path.
        path: PathBuf,
        /// I/O message.
        reason: String,
    },
}

impl DiscoveryError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidManifest { .. } => "invalid_manifest",
            Self::Unresolved { .. } => "unresolved",
            Self::MalformedDescriptor(_) => "malformed_descriptor",
            Self::Duplicate(_) => "duplicate_identifier",
            Self::InitFailed { .. } => "init_failed",
            Self::Io { .. } => "io",
        }
    }
}
