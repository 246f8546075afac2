use anyhow::{Context, Result, anyhow};
use log::debug;
use reqwest::{Url, blocking::Client, header::CONTENT_TYPE};
use sluice_protocol::BulkResponse;

use super::{Backend, BackendError};
use crate::{Batch, ClientConfig};

const NDJSON: &str = "application/x-ndjson";

/// Bulk API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
    username: Option<String>,
    password: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.address)
            .with_context(|| format!("invalid backend address {:?}", config.address))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("invalid backend address {:?}", config.address));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// `{address}/{index}/_bulk`, with the index name percent-encoded.
    fn bulk_url(&self, index: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(index).push("_bulk");
        }
        url
    }
}

impl Backend for HttpBackend {
    fn bulk(&self, index: &str, batch: &Batch) -> Result<BulkResponse, BackendError> {
        let url = self.bulk_url(index);
        debug!("[http] POST {} ({} items, {} bytes)", url, batch.len(), batch.bytes());

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, NDJSON)
            .body(batch.encode());
        if let Some(user) = &self.username {
            request = request.basic_auth(user, self.password.as_deref());
        }

        let response = request
            .send()
            .map_err(|e| BackendError::Transport(Box::new(e)))?;
        let status = response.status();
        let body = response
            .bytes()
            .map_err(|e| BackendError::Transport(Box::new(e)))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice(&body).map_err(BackendError::Decode)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
