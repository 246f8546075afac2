//! In-process backend with upsert semantics, for tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicU32, AtomicUsize, Ordering},
    },
};

use serde_json::{Map, Value};
use sluice_protocol::{BulkResponse, BulkResponseItem, ErrorCause, ItemOutcome};

use super::{Backend, BackendError};
use crate::Batch;

#[derive(Debug, Default)]
pub(crate) struct MemoryBackend {
    docs: Mutex<HashMap<(String, String), Map<String, Value>>>,
    /// Ids that the backend rejects with a mapping error.
    reject: HashSet<String>,
    /// Number of upcoming calls that fail in transport.
    transport_failures: AtomicU32,
    calls: AtomicUsize,
}

impl MemoryBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn rejecting(ids: &[&str]) -> Self {
        Self {
            reject: ids.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub(crate) fn failing_transport(times: u32) -> Self {
        Self {
            transport_failures: AtomicU32::new(times),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn doc(&self, index: &str, id: &str) -> Option<Map<String, Value>> {
        let docs = self.docs.lock().unwrap();
        docs.get(&(index.to_string(), id.to_string())).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }
}

impl Backend for MemoryBackend {
    fn bulk(&self, index: &str, batch: &Batch) -> Result<BulkResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let pending_failure = self
            .transport_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if pending_failure.is_ok() {
            return Err(BackendError::Transport("connection refused".into()));
        }

        let mut docs = self.docs.lock().unwrap();
        let mut response = BulkResponse::default();

        for env in batch.iter() {
            let id = env.id().to_string();

            let outcome = if self.reject.contains(&id) {
                response.errors = true;
                ItemOutcome {
                    id: Some(id),
                    status: 400,
                    error: Some(ErrorCause {
                        kind: "mapper_parsing_exception".into(),
                        reason: Some("failed to parse".into()),
                        caused_by: None,
                    }),
                    ..ItemOutcome::default()
                }
            } else {
                let body: Value = serde_json::from_slice(env.body()).map_err(BackendError::Decode)?;
                let partial = match body.get("doc") {
                    Some(Value::Object(map)) => map.clone(),
                    _ => Map::new(),
                };

                let key = (index.to_string(), id.clone());
                let (status, result) = match docs.get_mut(&key) {
                    Some(existing) => {
                        existing.extend(partial);
                        (200, "updated")
                    }
                    None => {
                        docs.insert(key, partial);
                        (201, "created")
                    }
                };

                ItemOutcome {
                    index: Some(index.to_string()),
                    id: Some(id),
                    status,
                    result: Some(result.into()),
                    error: None,
                }
            };

            response.items.push(BulkResponseItem { outcome });
        }

        Ok(response)
    }
}
