use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::RecordError;

/// Recognized identity fields, highest priority first.
pub const ID_FIELDS: &[&str] = &["_id", "id", "ID", "Id"];

/// One input document: a JSON object with arbitrary fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

/// Stable key used to address a document for upsert. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocId(String);

/// The supported shapes of an identity value.
#[derive(Debug, Clone, PartialEq)]
pub enum IdValue {
    Signed(i64),
    Unsigned(u64),
    /// Rounded to the nearest integer when rendered. Lossy for real fractions.
    Float(f64),
    Text(String),
}

impl Document {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Parse one JSON object. Non-object JSON is rejected.
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Resolve the identity of this document.
    ///
    /// The first field of [ID_FIELDS] present in the document decides; later
    /// ones are ignored even when the winner has an unsupported type.
    pub fn doc_id(&self) -> Result<DocId, RecordError> {
        let (field, value) = ID_FIELDS
            .iter()
            .find_map(|&field| self.0.get(field).map(|v| (field, v)))
            .ok_or(RecordError::MissingIdentity)?;

        let id = IdValue::decode(field, value)?.to_string();
        if id.is_empty() {
            return Err(RecordError::EmptyIdentity { field });
        }

        Ok(DocId(id))
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl IdValue {
    fn decode(field: &'static str, value: &Value) -> Result<Self, RecordError> {
        match value {
            Value::Number(n) => Ok(Self::from_number(n)),
            Value::String(s) => Ok(Self::Text(s.clone())),
            other => Err(RecordError::UnsupportedIdentity {
                field,
                kind: json_kind(other),
            }),
        }
    }

    fn from_number(n: &Number) -> Self {
        if let Some(i) = n.as_i64() {
            Self::Signed(i)
        } else if let Some(u) = n.as_u64() {
            Self::Unsigned(u)
        } else {
            // serde_json numbers are always one of i64, u64 or a finite f64.
            Self::Float(n.as_f64().unwrap_or_default())
        }
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdValue::Signed(i) => write!(f, "{i}"),
            IdValue::Unsigned(u) => write!(f, "{u}"),
            IdValue::Float(x) => write!(f, "{x:.0}"),
            IdValue::Text(s) => f.write_str(s),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl DocId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
