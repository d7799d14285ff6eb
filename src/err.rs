use std::num::ParseIntError;

/// Problems with a single input row, detected by the row normalizer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("expected {expected} fields but found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("empty value in required column {0:?}")]
    EmptyValue(String),
    #[error("invalid position in column {column:?}: {value:?}")]
    InvalidPosition { column: String, value: String },
    #[error("invalid zygosity: {0:?}")]
    InvalidZygosity(String),
}

/// Problems with the allelic read-support descriptor (e.g., `0/1:12,9:21`).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadSupportError {
    #[error("missing ':' separator in read support {0:?}")]
    MissingColon(String),
    #[error("missing ',' separator in read depths {0:?}")]
    MissingComma(String),
    #[error("invalid read depth")]
    InvalidDepth(#[from] ParseIntError),
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum ArgError {
    #[error("family shape {shape} requires the {role} {kind} table")]
    MissingTable {
        shape: String,
        role: String,
        kind: &'static str,
    },
    #[error("invalid variant position: {0:?}")]
    InvalidPosition(String),
}
