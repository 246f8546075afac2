use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::{Context, Error, Result};
use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, error, warn};
use sluice_protocol::{BulkResponse, ItemOutcome};
use sluice_runtime::RETRY_BASE_DELAY;

use crate::{Backend, BackendError, Batch, RunStats, StatsSnapshot};

/// Fixed set of threads that send sealed batches to the backend.
///
/// Batches travel through a bounded queue sized to the worker count, so a
/// slow backend blocks [DispatchPool::submit] instead of growing memory.
pub struct DispatchPool {
    queue: Sender<Batch>,
    workers: Vec<JoinHandle<()>>,
    stats: Arc<RunStats>,
}

struct Worker {
    id: usize,
    index: Arc<str>,
    backend: Arc<dyn Backend>,
    stats: Arc<RunStats>,
    retries: u32,
}

impl DispatchPool {
    pub fn start(
        num_workers: usize,
        index: &str,
        backend: Arc<dyn Backend>,
        retries: u32,
    ) -> Result<Self> {
        let num_workers = num_workers.max(1);
        let (queue, batches) = channel::bounded::<Batch>(num_workers);
        let stats = Arc::new(RunStats::new());
        let index: Arc<str> = Arc::from(index);

        let mut workers = Vec::with_capacity(num_workers);
        for id in 0..num_workers {
            let worker = Worker {
                id,
                index: Arc::clone(&index),
                backend: Arc::clone(&backend),
                stats: Arc::clone(&stats),
                retries,
            };
            let batches = batches.clone();

            let handle = thread::Builder::new()
                .name(format!("sluice-worker-{id}"))
                .spawn(move || worker.run(batches))
                .with_context(|| format!("failed to spawn dispatch worker {id}"))?;
            workers.push(handle);
        }

        debug!("[pool] started {} workers for index {}", num_workers, index);

        Ok(Self {
            queue,
            workers,
            stats,
        })
    }

    /// A handle for submitting batches from another thread.
    pub fn sender(&self) -> Sender<Batch> {
        self.queue.clone()
    }

    /// Queue a sealed batch, blocking while every worker is busy and the queue is full.
    pub fn submit(&self, batch: Batch) -> Result<()> {
        self.queue
            .send(batch)
            .map_err(|_| Error::msg("dispatch pool has shut down"))
    }

    /// Close the queue, wait for in-flight batches and return the final counts.
    pub fn shutdown(self) -> Result<StatsSnapshot> {
        let DispatchPool {
            queue,
            workers,
            stats,
        } = self;
        drop(queue);

        let mut panicked = 0;
        for handle in workers {
            if handle.join().is_err() {
                panicked += 1;
            }
        }
        if panicked > 0 {
            return Err(Error::msg(format!("{panicked} dispatch worker(s) panicked")));
        }

        Ok(stats.snapshot())
    }
}

impl Worker {
    fn run(self, batches: Receiver<Batch>) {
        while let Ok(batch) = batches.recv() {
            self.dispatch(&batch);
        }
        debug!("[worker {}] queue closed", self.id);
    }

    fn dispatch(&self, batch: &Batch) {
        debug!(
            "[worker {}] flushing {} items ({} bytes)",
            self.id,
            batch.len(),
            batch.bytes()
        );

        match self.send_with_retry(batch) {
            Ok(response) => self.record_outcomes(batch, &response),
            Err(err) => {
                for env in batch.iter() {
                    error!("[worker {}] {}: {}", self.id, env.id(), err);
                }
                self.stats.add_failed(batch.len() as u64);
            }
        }
    }

    fn send_with_retry(&self, batch: &Batch) -> Result<BulkResponse, BackendError> {
        let mut attempt = 0;
        loop {
            self.stats.record_request();
            match self.backend.bulk(&self.index, batch) {
                Ok(response) => return Ok(response),
                Err(err) if attempt < self.retries && err.is_transient() => {
                    let delay = backoff(attempt);
                    warn!(
                        "[worker {}] bulk request failed ({}), retrying in {:?}",
                        self.id, err, delay
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Items and response entries are matched by position.
    fn record_outcomes(&self, batch: &Batch, response: &BulkResponse) {
        let mut flushed = 0u64;
        let mut failed = 0u64;

        for (pos, env) in batch.iter().enumerate() {
            match response.items.get(pos).map(|item| &item.outcome) {
                Some(outcome) if !outcome.is_failure() => flushed += 1,
                Some(outcome) => {
                    error!("[worker {}] {}: {}", self.id, env.id(), failure_detail(outcome));
                    failed += 1;
                }
                None => {
                    error!("[worker {}] {}: missing from bulk response", self.id, env.id());
                    failed += 1;
                }
            }
        }

        self.stats.add_flushed(flushed);
        self.stats.add_failed(failed);
    }
}

fn failure_detail(outcome: &ItemOutcome) -> String {
    match &outcome.error {
        Some(cause) => cause.to_string(),
        None => format!("rejected with status {}", outcome.status),
    }
}

fn backoff(attempt: u32) -> Duration {
    RETRY_BASE_DELAY.saturating_mul(1 << attempt.min(10))
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
