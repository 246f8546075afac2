use std::io;

/// Errors that make the input stream untrustworthy. Any of these aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("line {line}: malformed JSON record: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("record has no identity field (expected one of {})", crate::ID_FIELDS.join(", "))]
    MissingIdentity,

    #[error("unsupported identity type for field `{field}`: {kind}")]
    UnsupportedIdentity { field: &'static str, kind: &'static str },

    #[error("identity field `{field}` is empty")]
    EmptyIdentity { field: &'static str },

    #[error("failed to serialize record: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}
