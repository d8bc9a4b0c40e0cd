use pantry_rs_storage::{KeyValueStore, StorageError};

/// Store whose every operation fails with an IO error.
#[derive(Debug, Clone, Default)]
pub struct FailingStore;

fn unavailable() -> StorageError {
    StorageError::Io(std::io::Error::other("storage unavailable"))
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(unavailable())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(unavailable())
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(unavailable())
    }
}
