use std::time::Duration;

use anyhow::{Result, bail};
use sluice_runtime::{DEFAULT_ADDRESS, DEFAULT_FLUSH_BYTES, DEFAULT_FLUSH_INTERVAL, default_workers};

/// Settings for the batching and dispatch side of a run.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Target index name.
    pub index: String,
    /// Number of concurrent dispatch workers.
    pub workers: usize,
    /// Pending bytes that trigger a flush.
    pub flush_bytes: usize,
    /// Age of a pending batch that triggers a flush.
    pub flush_interval: Duration,
    /// Extra attempts for a bulk request that failed in transport.
    pub retries: u32,
}

impl IndexerConfig {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            workers: default_workers(),
            flush_bytes: DEFAULT_FLUSH_BYTES,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            retries: 0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.index.trim().is_empty() {
            bail!("index is required");
        }
        if self.workers == 0 {
            bail!("workers must be at least 1");
        }
        if self.flush_bytes == 0 {
            bail!("flush-bytes must be at least 1");
        }
        if self.flush_interval.is_zero() {
            bail!("flush-interval must be greater than zero");
        }
        Ok(())
    }
}

/// Connection settings for [crate::HttpBackend].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub address: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Per-request timeout. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            username: None,
            password: None,
            timeout: None,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
