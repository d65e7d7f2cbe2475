//! Token store.
//!
//! Single source of truth for "am I authenticated, and as whom". Wraps a
//! [`SessionStorage`] holding the bearer token and the serialized user record
//! under two keys, which are written and cleared together.

use crate::config::StorageKeys;
use crate::error::{ClientError, Result, StorageError};
use crate::providers::SessionStorage;
use crate::session::{Session, User};
use std::sync::Arc;
use tracing::{debug, warn};

/// Persisted session (bearer token + user record).
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn SessionStorage>,
    keys: StorageKeys,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl TokenStore {
    /// Create a token store over `storage` using the given keys.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>, keys: StorageKeys) -> Self {
        Self { storage, keys }
    }

    /// Read the current session.
    ///
    /// Never fails: missing or unreadable entries read as an empty session, and
    /// a user record without a token is ignored.
    #[must_use]
    pub fn get(&self) -> Session {
        let token = match self.storage.get_item(&self.keys.token) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read token from session storage");
                None
            }
        };

        let Some(token) = token else {
            return Session::empty();
        };

        let user = match self.storage.get_item(&self.keys.user) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "Stored user record is malformed");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read user from session storage");
                None
            }
        };

        Session {
            token: Some(token),
            user,
        }
    }

    /// Store a new session.
    ///
    /// The user record is serialized before anything is written, and the token
    /// write is rolled back if the user write fails, so readers never observe
    /// a token paired with a stale user.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] for an empty token, or
    /// [`ClientError::Storage`] if the storage backend fails.
    pub fn set(&self, token: &str, user: &User) -> Result<()> {
        if token.is_empty() {
            return Err(ClientError::InvalidRequest(
                "bearer token must not be empty".to_string(),
            ));
        }

        let raw_user =
            serde_json::to_string(user).map_err(|e| StorageError::Malformed(e.to_string()))?;

        self.storage.set_item(&self.keys.token, token)?;
        if let Err(e) = self.storage.set_item(&self.keys.user, &raw_user) {
            if let Err(rollback) = self.storage.remove_item(&self.keys.token) {
                warn!(error = %rollback, "Failed to roll back token after user write failed");
            }
            return Err(e.into());
        }

        debug!(user_id = %user.id, role = %user.role, "Session stored");
        Ok(())
    }

    /// Remove the session.
    ///
    /// Idempotent and infallible: clearing an empty store is a no-op and
    /// storage failures are logged. Returns whether a token was present.
    pub fn clear(&self) -> bool {
        let had_token = self.get().is_authenticated();

        for key in [&self.keys.token, &self.keys.user] {
            if let Err(e) = self.storage.remove_item(key) {
                warn!(key = %key, error = %e, "Failed to remove session entry");
            }
        }

        if had_token {
            debug!("Session cleared");
        }
        had_token
    }
}
