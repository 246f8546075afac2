mod http;
#[cfg(test)]
pub(crate) mod memory;

use std::error::Error as StdError;

use sluice_protocol::BulkResponse;

use crate::Batch;

pub use http::HttpBackend;

/// Errors that fail a whole bulk request. Per-item rejections are reported
/// inside a successful [BulkResponse] instead.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("undecodable bulk response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl BackendError {
    /// Whether sending the same request again could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Transport(_) => true,
            BackendError::Status { status, .. } => *status == 429 || *status >= 500,
            BackendError::Decode(_) => false,
        }
    }
}

/// The document store a run writes into.
///
/// One call submits one batch as a single ordered bulk request of `update`
/// actions addressed by each envelope's id.
pub trait Backend: Send + Sync {
    fn bulk(&self, index: &str, batch: &Batch) -> Result<BulkResponse, BackendError>;
}
