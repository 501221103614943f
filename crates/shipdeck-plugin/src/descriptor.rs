//! Plugin descriptor — identity metadata and the lifecycle contract.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shipdeck_core::result::AppResult;

use crate::context::PluginContext;

/// Metadata about a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Unique plugin identifier; stable across versions.
    pub id: String,
    /// Human-readable plugin name.
    pub name: String,
    /// Semantic version string, informational only.
    pub version: String,
    /// Plugin description.
    pub description: String,
}

/// Why a descriptor was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// A required field is empty.
    #[error("descriptor field '{0}' is empty")]
    MissingField(&'static str),
    /// The identifier contains characters outside `[a-z0-9_-]`.
    #[error("invalid plugin identifier '{0}': expected lowercase letters, digits, '_' or '-'")]
    InvalidIdentifier(String),
    /// The version is not a semantic version.
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion {
        /// The offending version string.
        version: String,
        /// Parser message.
        reason: String,
    },
}

impl PluginInfo {
    /// Creates plugin metadata.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            description: description.into(),
        }
    }

    /// Checks the descriptor is complete and well-formed.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.id.is_empty() {
            return Err(DescriptorError::MissingField("id"));
        }
        if !self
            .id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(DescriptorError::InvalidIdentifier(self.id.clone()));
        }
        if self.name.trim().is_empty() {
            return Err(DescriptorError::MissingField("name"));
        }
        if self.version.is_empty() {
            return Err(DescriptorError::MissingField("version"));
        }
        semver::Version::parse(&self.version).map_err(|e| DescriptorError::InvalidVersion {
            version: self.version.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

/// Trait that all plugins implement.
///
/// A plugin is constructed once, registered, then initialized exactly once.
/// There is no teardown: plugins live as long as the host.
pub trait Plugin: Send + Sync + std::fmt::Debug {
    /// Returns plugin metadata.
    fn info(&self) -> PluginInfo;

    /// One-time setup, called by the loader after registration.
    ///
    /// Typically subscribes event handlers through the context. Must not
    /// block indefinitely; host startup waits for it.
    fn initialize(&self, ctx: &PluginContext<'_>) -> AppResult<()>;
}
