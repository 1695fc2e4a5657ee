//! Error types for FLT encoding, decoding and JSON bridging.

use thiserror::Error;

/// Errors that can occur while converting between JSON filters and FLT bytes.
#[derive(Error, Debug)]
pub enum FltError {
    /// The buffer ended before a field could be read in full.
    #[error("Truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A marker, magic tag or padding byte did not match the FLT layout.
    /// `offset` points at the offending byte.
    #[error("Malformed input at offset {offset}: {reason}")]
    MalformedInput { reason: String, offset: usize },

    /// A JSON `operation` name that is not a known logical operation.
    #[error("Invalid operation: {0}. Valid operations are: AND, OR, NAND, NOR")]
    InvalidOperation(String),

    /// A JSON `matchType` name that is not a known match type.
    #[error("Invalid match type: {0}")]
    InvalidMatchType(String),

    /// A count in the tree does not fit its field in the binary layout.
    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    /// An enumerated value that cannot be written as-is.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// JSON text that is not valid JSON or does not follow the filter schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FltError {
    pub(crate) fn malformed(reason: impl Into<String>, offset: usize) -> Self {
        FltError::MalformedInput {
            reason: reason.into(),
            offset,
        }
    }
}

/// Convenience alias used throughout flt-core.
pub type Result<T> = std::result::Result<T, FltError>;
