//! Persisted session store: credential and principal in durable storage.
//!
//! ERROR HANDLING
//! ==============
//! Reads never fail. A missing credential, a missing principal, or a stored
//! principal that no longer decodes all degrade to "absent". Writes report
//! storage errors to the caller, which decides whether to log or surface.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::Arc;

use super::session::Session;
use super::storage::{KeyValueStorage, StorageError, load_json, save_json};
use crate::net::types::Principal;

/// Storage key holding the bearer credential.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the JSON-encoded principal.
pub const USER_KEY: &str = "user";

#[derive(Clone)]
pub struct PersistedSessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl PersistedSessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Read the session saved by a previous run.
    ///
    /// A principal without a credential is dropped: it cannot be refreshed
    /// and must not grant admin views.
    #[must_use]
    pub fn load(&self) -> Session {
        let Some(credential) = self.storage.get(TOKEN_KEY).filter(|t| !t.trim().is_empty()) else {
            return Session::default();
        };
        let principal = load_json::<Principal>(self.storage.as_ref(), USER_KEY);
        Session::authenticated(credential, principal)
    }

    /// Write both halves of `session`, removing whichever is absent.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        match session.credential() {
            Some(credential) => self.storage.set(TOKEN_KEY, credential)?,
            None => self.storage.remove(TOKEN_KEY)?,
        }
        match session.principal() {
            Some(principal) => self.save_principal(principal),
            None => self.storage.remove(USER_KEY),
        }
    }

    /// Write the principal only; the stored credential is untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub fn save_principal(&self, principal: &Principal) -> Result<(), StorageError> {
        save_json(self.storage.as_ref(), USER_KEY, principal)
    }

    /// Remove credential and principal.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered; both removals are attempted.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.storage.remove(TOKEN_KEY);
        let user = self.storage.remove(USER_KEY);
        token.and(user)
    }
}
