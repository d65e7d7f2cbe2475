//! Persisted key/value storage trait.

use crate::error::StorageError;

/// Key/value storage backing the token store.
///
/// Mirrors the shape of browser-local storage: string keys, string values,
/// missing keys read as `None`.
///
/// # Implementation Notes
///
/// - Operations are synchronous and short; they are called between awaits
/// - `remove_item` on a missing key is a no-op
pub trait SessionStorage: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns error if the backing medium cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns error if the backing medium cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value.
    ///
    /// # Errors
    ///
    /// Returns error if the backing medium cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
