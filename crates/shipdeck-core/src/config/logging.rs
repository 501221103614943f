//! Logging configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Log format: `"json"` or `"pretty"`.
    #[serde(default = "default_format")]
    pub format: String,
    /// Directory for the log file. Console-only logging when unset.
    #[serde(default)]
    pub directory: Option<String>,
    /// Log file name inside `directory`.
    #[serde(default = "default_file")]
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            directory: None,
            file: default_file(),
        }
    }
}

impl LoggingConfig {
    /// Full path of the log file, if file output is configured.
    pub fn file_path(&self) -> Option<PathBuf> {
        self.directory
            .as_deref()
            .filter(|dir| !dir.is_empty())
            .map(|dir| PathBuf::from(dir).join(&self.file))
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

fn default_file() -> String {
    "shipdeck.log".to_string()
}
