use std::fmt;

use serde::Deserialize;

/// Decoded body of a `_bulk` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub took: u64,
    /// True when at least one item failed.
    #[serde(default)]
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<BulkResponseItem>,
}

/// One entry of `items`: a single-key object named after the action.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkResponseItem {
    #[serde(rename = "update", alias = "index", alias = "create", alias = "delete")]
    pub outcome: ItemOutcome,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemOutcome {
    #[serde(rename = "_index", default)]
    pub index: Option<String>,
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: u16,
    /// `created`, `updated` or `noop` on success.
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<ErrorCause>,
}

/// Backend-reported reason for a failed item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorCause {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub caused_by: Option<Box<ErrorCause>>,
}

impl ItemOutcome {
    pub fn is_failure(&self) -> bool {
        self.error.is_some() || self.status >= 300
    }
}

impl fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}: {}", self.kind, reason)?,
            None => f.write_str(&self.kind)?,
        }
        if let Some(cause) = &self.caused_by {
            write!(f, " (caused by {cause})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "bulk_tests.rs"]
mod tests;
