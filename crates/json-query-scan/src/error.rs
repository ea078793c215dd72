//! Scanner error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("malformed JSON at byte {0}")]
    Invalid(usize),
    #[error("input ended inside a value at byte {0}")]
    UnexpectedEnd(usize),
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("string unescape failed: {0}")]
    Unescape(#[from] serde_json::Error),
}
