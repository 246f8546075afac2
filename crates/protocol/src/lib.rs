//! Wire-level model for upserting JSON documents through a bulk API.

pub mod bulk;
mod envelope;
mod error;
mod record;

pub use bulk::{BulkResponse, BulkResponseItem, ErrorCause, ItemOutcome};
pub use envelope::UpsertEnvelope;
pub use error::RecordError;
pub use record::{DocId, Document, ID_FIELDS, IdValue};
