//! Guild settings store error types.

use thiserror::Error;

/// Guild settings persistence errors.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize guild record: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("corrupt guild record at {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
