//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to encode or decode a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// The store rejected an operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// The entry lifetime reaches past the representable date range.
    #[error("Expiry out of range for a lifetime of {0} seconds")]
    ExpiryOutOfRange(i64),
}
