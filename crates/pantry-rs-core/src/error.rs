//! Error types for the core crate.

use pantry_rs_protocol::RequestId;
use pantry_rs_storage::StorageError;
use thiserror::Error;

/// Errors returned by core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A completion arrived for a request that is not outstanding.
    #[error("unknown request: {0}")]
    UnknownRequest(RequestId),
    /// Persistence adapter error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    /// A stored value could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
