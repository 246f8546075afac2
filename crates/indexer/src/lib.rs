mod backend;
mod batch;
mod bulk_indexer;
mod config;
mod ingest;
mod pool;
mod stats;

use std::{io::BufRead, sync::Arc, time::Instant};

use anyhow::{Context, Result};
use log::info;

pub use backend::{Backend, BackendError, HttpBackend};
pub use batch::{Accumulator, Batch, Tick};
pub use bulk_indexer::BulkIndexer;
pub use config::{ClientConfig, IndexerConfig};
pub use ingest::{InputRecord, prepare, read_documents};
pub use pool::DispatchPool;
pub use stats::{RunReport, RunStats, StatsSnapshot};

/// Upsert every record of `input` into `config.index`.
///
/// All input is parsed and every envelope built before the first bulk
/// request, so a malformed line or an unresolvable identity aborts the run
/// without touching the backend. Per-item backend failures do not abort;
/// they are counted in the returned report.
pub fn run<R: BufRead>(
    input: R,
    config: &IndexerConfig,
    backend: Arc<dyn Backend>,
) -> Result<RunReport> {
    config.validate()?;

    let records = read_documents(input).context("failed to read input")?;
    let envelopes = prepare(records)?;

    info!(
        "indexing {} records into {} with {} workers",
        envelopes.len(),
        config.index,
        config.workers
    );

    let start = Instant::now();
    let indexer = BulkIndexer::start(config, backend)?;
    for env in envelopes {
        indexer.add(env)?;
    }
    let stats = indexer.close()?;

    Ok(RunReport {
        stats,
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
