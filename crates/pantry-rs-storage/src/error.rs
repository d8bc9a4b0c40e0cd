//! Error types for storage operations.

/// Errors returned by key-value stores.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The storage file does not hold a JSON object of strings.
    #[error("corrupt storage file {path}: {message}")]
    Corrupt { path: String, message: String },
}
