use serde::Serialize;

use crate::{DocId, Document, RecordError};

/// Partial update that creates the document when it does not exist yet.
#[derive(Serialize)]
struct UpdateBody<'a> {
    doc: &'a Document,
    doc_as_upsert: bool,
}

#[derive(Serialize)]
struct ActionLine<'a> {
    update: ActionTarget<'a>,
}

#[derive(Serialize)]
struct ActionTarget<'a> {
    #[serde(rename = "_id")]
    id: &'a str,
}

/// A document ready for the bulk API: its identity, the `update` action line
/// and the `{"doc": .., "doc_as_upsert": true}` body, both pre-serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertEnvelope {
    id: DocId,
    action: Vec<u8>,
    body: Vec<u8>,
}

impl UpsertEnvelope {
    /// Resolve the identity of `doc` and serialize it as an upsert.
    pub fn build(doc: &Document) -> Result<Self, RecordError> {
        let id = doc.doc_id()?;
        Self::with_id(id, doc)
    }

    /// Serialize `doc` as an upsert addressed by an already resolved `id`.
    pub fn with_id(id: DocId, doc: &Document) -> Result<Self, RecordError> {
        let action = serde_json::to_vec(&ActionLine {
            update: ActionTarget { id: id.as_str() },
        })
        .map_err(RecordError::Serialize)?;

        let body = serde_json::to_vec(&UpdateBody {
            doc,
            doc_as_upsert: true,
        })
        .map_err(RecordError::Serialize)?;

        Ok(Self { id, action, body })
    }

    pub fn id(&self) -> &DocId {
        &self.id
    }

    /// Serialized `{"doc": .., "doc_as_upsert": true}` payload.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Bytes this envelope adds to a bulk request body.
    pub fn encoded_len(&self) -> usize {
        self.action.len() + self.body.len() + 2
    }

    /// Append the NDJSON action and body lines to `buf`.
    pub fn write_bulk_lines(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.action);
        buf.push(b'\n');
        buf.extend_from_slice(&self.body);
        buf.push(b'\n');
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
