use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread::{self, JoinHandle},
    time::Instant,
};

use anyhow::{Context, Error, Result};
use crossbeam::channel::{self, RecvTimeoutError, Sender};
use log::debug;
use sluice_protocol::UpsertEnvelope;

use crate::{
    Accumulator, Backend, Batch, DispatchPool, IndexerConfig, StatsSnapshot, batch::Tick,
};

/// Accepts envelopes one at a time and keeps the dispatch pool fed.
///
/// Size-triggered flushes happen on the caller's thread inside [BulkIndexer::add];
/// a background ticker seals batches that outlive the flush interval even when
/// no new input arrives.
pub struct BulkIndexer {
    accumulator: Arc<Mutex<Accumulator>>,
    pool: DispatchPool,
    ticker: Option<Ticker>,
}

struct Ticker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

fn lock(acc: &Mutex<Accumulator>) -> MutexGuard<'_, Accumulator> {
    // The accumulator holds no invariants that a panicking holder could break.
    acc.lock().unwrap_or_else(PoisonError::into_inner)
}

impl BulkIndexer {
    pub fn start(config: &IndexerConfig, backend: Arc<dyn Backend>) -> Result<Self> {
        config.validate()?;

        let pool = DispatchPool::start(config.workers, &config.index, backend, config.retries)?;
        let accumulator = Arc::new(Mutex::new(Accumulator::new(
            config.flush_bytes,
            config.flush_interval,
        )));

        let (stop, stopped) = channel::bounded::<()>(0);
        let handle = {
            let accumulator = Arc::clone(&accumulator);
            let queue = pool.sender();
            let interval = config.flush_interval;

            thread::Builder::new()
                .name("sluice-ticker".into())
                .spawn(move || {
                    let mut wait = interval;
                    loop {
                        match stopped.recv_timeout(wait) {
                            Err(RecvTimeoutError::Timeout) => {}
                            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                        }

                        let tick = lock(&accumulator).poll(Instant::now());
                        wait = match tick {
                            Tick::Wait(d) => d,
                            Tick::Flush(batch) => {
                                debug!("[ticker] interval flush of {} items", batch.len());
                                if queue.send(batch).is_err() {
                                    break;
                                }
                                interval
                            }
                        };
                    }
                })
                .context("failed to spawn flush ticker")?
        };

        Ok(Self {
            accumulator,
            pool,
            ticker: Some(Ticker { stop, handle }),
        })
    }

    /// Accept one envelope. Blocks while the dispatch queue is full.
    pub fn add(&self, env: UpsertEnvelope) -> Result<()> {
        let sealed = lock(&self.accumulator).push(env);

        match sealed {
            Some(batch) => {
                debug!("[indexer] size flush of {} items ({} bytes)", batch.len(), batch.bytes());
                self.pool.submit(batch)
            }
            None => Ok(()),
        }
    }

    /// Flush the remainder, wait for every batch to be answered and return the counts.
    pub fn close(mut self) -> Result<StatsSnapshot> {
        if let Some(Ticker { stop, handle }) = self.ticker.take() {
            drop(stop);
            handle
                .join()
                .map_err(|_| Error::msg("flush ticker thread panicked"))?;
        }

        let remainder: Option<Batch> = lock(&self.accumulator).drain();
        if let Some(batch) = remainder {
            debug!("[indexer] final flush of {} items", batch.len());
            self.pool.submit(batch)?;
        }

        self.pool.shutdown()
    }
}

#[cfg(test)]
#[path = "bulk_indexer_tests.rs"]
mod tests;
