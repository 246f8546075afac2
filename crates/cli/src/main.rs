use std::{io, process::ExitCode, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use log::error;

mod printer;

use printer::{StderrWriter, print_summary};
use sluice_indexer::{ClientConfig, HttpBackend, IndexerConfig, RunReport};
use sluice_runtime::{
    DEFAULT_ADDRESS, DEFAULT_FLUSH_BYTES, PROGRAM_PASSWORD, PROGRAM_USERNAME, default_workers,
    logging, parse_duration,
};

/// Upsert newline-delimited JSON from stdin into a search index.
///
/// Each record must carry an `_id`, `id`, `ID` or `Id` field; it is written
/// as a partial update with `doc_as_upsert`, so re-running the same input
/// updates documents instead of duplicating them.
///
/// Example:
///   cat people.ndjson | sluice --index people
///   sluice --index logs --workers 8 --flush-bytes 1000000 --flush-interval 5s < logs.ndjson
#[derive(Debug, Parser)]
#[command(name = "sluice", version)]
pub struct Cli {
    /// Target index name
    #[arg(long)]
    pub index: String,

    /// Backend endpoint
    #[arg(long, default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// Number of concurrent bulk workers [default: available CPUs]
    #[arg(long)]
    pub workers: Option<usize>,

    /// Flush a batch once its request body reaches this many bytes
    #[arg(long, default_value_t = DEFAULT_FLUSH_BYTES)]
    pub flush_bytes: usize,

    /// Flush a batch once it has been open this long (e.g. 500ms, 30s, 1m)
    #[arg(long, default_value = "30s", value_parser = parse_duration)]
    pub flush_interval: Duration,

    /// Basic auth user
    #[arg(long, env = PROGRAM_USERNAME)]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long, env = PROGRAM_PASSWORD, hide_env_values = true)]
    pub password: Option<String>,

    /// Give up on a bulk request after this long [default: wait forever]
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Retry a bulk request this many times on transport errors
    #[arg(long, default_value_t = 0)]
    pub retries: u32,
}

impl Cli {
    fn indexer_config(&self) -> IndexerConfig {
        IndexerConfig {
            index: self.index.clone(),
            workers: self.workers.unwrap_or_else(default_workers),
            flush_bytes: self.flush_bytes,
            flush_interval: self.flush_interval,
            retries: self.retries,
        }
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            address: self.address.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: self.timeout,
        }
    }
}

fn main() -> ExitCode {
    logging::init().ok();

    let cli = Cli::parse();
    match execute(&cli) {
        Ok(report) => {
            let _ = print_summary(&mut StderrWriter, &report);
            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!("[error] {e:#}");
            eprintln!("[sluice] {e:#}");
            ExitCode::from(2)
        }
    }
}

fn execute(cli: &Cli) -> Result<RunReport> {
    let config = cli.indexer_config();
    config.validate()?;

    let backend = HttpBackend::new(&cli.client_config())?;

    let stdin = io::stdin();
    sluice_indexer::run(stdin.lock(), &config, Arc::new(backend))
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
