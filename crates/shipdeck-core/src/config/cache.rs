//! Cache provider configuration.

use serde::{Deserialize, Serialize};

/// Redis settings shared by the cache and the worker broker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis host.
    #[serde(default = "default_host")]
    pub host: String,
    /// Redis port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Redis logical database index.
    #[serde(default)]
    pub db: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db: 0,
        }
    }
}

impl CacheConfig {
    /// Redis connection URL.
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6379
}
