use std::io::BufRead;

use anyhow::{Context, Result};
use log::debug;
use sluice_protocol::{Document, RecordError, UpsertEnvelope};

/// A parsed input line.
#[derive(Debug, Clone)]
pub struct InputRecord {
    /// 1-based line number in the input stream.
    pub line: usize,
    pub doc: Document,
}

/// Read newline-delimited JSON objects. Blank lines are skipped.
///
/// Stops at the first malformed line; nothing is returned in that case.
pub fn read_documents<R: BufRead>(input: R) -> Result<Vec<InputRecord>, RecordError> {
    let mut records = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let doc = Document::from_json(trimmed).map_err(|source| RecordError::Parse {
            line: idx + 1,
            source,
        })?;
        records.push(InputRecord {
            line: idx + 1,
            doc,
        });
    }

    debug!("[ingest] read {} records", records.len());
    Ok(records)
}

/// Resolve identities and serialize every record up front, so that a bad
/// record aborts the run before anything reaches the backend.
pub fn prepare(records: Vec<InputRecord>) -> Result<Vec<UpsertEnvelope>> {
    records
        .into_iter()
        .map(|rec| {
            UpsertEnvelope::build(&rec.doc).with_context(|| format!("record on line {}", rec.line))
        })
        .collect()
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
