//! Construction-time errors.
//!
//! Only opening a document can fail toward the caller; query-time faults are
//! absorbed into empty result lists (see the crate docs).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("document not found: {0}")]
    NotFound(PathBuf),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
