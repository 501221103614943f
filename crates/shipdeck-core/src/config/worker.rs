//! Background worker configuration.

use serde::{Deserialize, Serialize};

use super::cache::CacheConfig;

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of platform worker processes.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Number of background job workers.
    #[serde(default = "default_workers")]
    pub background_workers: usize,
    /// Whether background workers run detached from the web process.
    #[serde(default)]
    pub detached: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            background_workers: default_workers(),
            detached: false,
        }
    }
}

impl WorkerConfig {
    /// Message broker URL; the worker queue lives in the cache's Redis.
    pub fn broker_url(&self, cache: &CacheConfig) -> String {
        cache.url()
    }

    /// Result backend URL.
    pub fn result_backend_url(&self, cache: &CacheConfig) -> String {
        cache.url()
    }
}

fn default_workers() -> usize {
    2
}
