//! Mock session storage for testing.

use crate::error::StorageError;
use crate::providers::SessionStorage;
use crate::stores::MemoryStorage;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Mock session storage.
///
/// In-memory storage that can be told to fail writes (set or remove) to
/// particular keys.
#[derive(Debug, Default)]
pub struct MockStorage {
    inner: MemoryStorage,
    failing_keys: Mutex<HashSet<String>>,
}

impl MockStorage {
    /// Create empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write to `key` fail.
    pub fn fail_writes_to(&self, key: &str) {
        self.failing_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string());
    }

    /// Let writes to every key succeed again.
    pub fn heal(&self) {
        self.failing_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn check_write(&self, key: &str) -> Result<(), StorageError> {
        let failing = self
            .failing_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key);
        if failing {
            Err(StorageError::Io(format!("mock write failure for {key}")))
        } else {
            Ok(())
        }
    }
}

impl SessionStorage for MockStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_write(key)?;
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check_write(key)?;
        self.inner.remove_item(key)
    }
}
