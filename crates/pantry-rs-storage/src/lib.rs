//! Local key-value persistence for Pantry.

pub mod error;
pub mod provider;

/// Storage error type.
pub use error::StorageError;
/// Key-value store interface and the file and in-memory implementations.
pub use provider::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
