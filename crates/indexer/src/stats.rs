use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

/// Per-run counters shared by all dispatch workers.
#[derive(Debug, Default)]
pub struct RunStats {
    flushed: AtomicU64,
    failed: AtomicU64,
    requests: AtomicU64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_flushed(&self, n: u64) {
        self.flushed.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_failed(&self, n: u64) {
        self.failed.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters. Only meaningful once the workers have been joined.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            flushed: self.flushed.load(Ordering::Acquire),
            failed: self.failed.load(Ordering::Acquire),
            requests: self.requests.load(Ordering::Acquire),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Items the backend accepted.
    pub flushed: u64,
    /// Items that failed in transport or were rejected by the backend.
    pub failed: u64,
    /// Bulk requests issued, retries included.
    pub requests: u64,
}

/// Final outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    pub stats: StatsSnapshot,
    /// From the first accepted record to the end of the drain.
    pub elapsed: Duration,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.stats.failed == 0
    }

    /// Throughput of successfully flushed items.
    pub fn docs_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.stats.flushed as f64 / secs
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
