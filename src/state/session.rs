//! Client-held session and the context object that owns it.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionContext` exists per running client. It is created at startup
//! from durable storage and shared (`Arc`) with the authenticated transport
//! and the route guard, which only read it. Every mutation goes through the
//! session manager.
//!
//! DESIGN
//! ======
//! Each transition rewrites memory and durable storage while holding the
//! session write lock, so a reader never sees memory and storage disagree.
//! Overlapping async login/logout calls are not ordered: the last transition
//! to take the lock wins.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use super::store::PersistedSessionStore;
use crate::net::types::Principal;
use crate::router::navigator::Navigator;
use crate::router::routes::LOGIN_PATH;

// =============================================================================
// SESSION
// =============================================================================

/// Coarse session state used by the route guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// Credential plus principal. Authenticated exactly when a credential is held.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    credential: Option<String>,
    principal: Option<Principal>,
}

impl Session {
    #[must_use]
    pub fn authenticated(credential: impl Into<String>, principal: Option<Principal>) -> Self {
        Self { credential: Some(credential.into()), principal }
    }

    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.is_authenticated() { SessionState::Authenticated } else { SessionState::Anonymous }
    }

    /// `principal.isSuperAdmin`, or `false` without a principal.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.principal.as_ref().is_some_and(|p| p.is_super_admin)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("principal", &self.principal)
            .finish()
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Owner of the live session, its durable copy, and the navigation sink
/// used when the session ends.
pub struct SessionContext {
    session: RwLock<Session>,
    store: PersistedSessionStore,
    navigator: Arc<dyn Navigator>,
}

impl SessionContext {
    /// Restore the session saved by a previous run.
    #[must_use]
    pub fn load(store: PersistedSessionStore, navigator: Arc<dyn Navigator>) -> Self {
        let session = store.load();
        tracing::debug!(state = ?session.state(), "session restored");
        Self { session: RwLock::new(session), store, navigator }
    }

    /// Copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.session.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Current credential, read fresh on every call.
    #[must_use]
    pub fn credential(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .credential
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.read().unwrap_or_else(PoisonError::into_inner).is_authenticated()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.session.read().unwrap_or_else(PoisonError::into_inner).is_admin()
    }

    /// Anonymous/Authenticated -> Authenticated with a fresh pair.
    pub(crate) fn establish(&self, credential: String, principal: Principal) {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        *session = Session::authenticated(credential, Some(principal));
        if let Err(e) = self.store.save(&session) {
            tracing::warn!(error = %e, "failed to persist session");
        }
    }

    /// Replace the principal; the credential is untouched. Ignored once the
    /// session has ended, so a late identity reply cannot revive it.
    pub(crate) fn refresh_principal(&self, principal: Principal) {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        if session.credential.is_none() {
            tracing::debug!(user_id = principal.id, "dropping principal for ended session");
            return;
        }
        if let Err(e) = self.store.save_principal(&principal) {
            tracing::warn!(error = %e, "failed to persist principal");
        }
        session.principal = Some(principal);
    }

    /// Any state -> Anonymous, then send the user to the login view.
    pub(crate) fn clear(&self) {
        {
            let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
            *session = Session::default();
            if let Err(e) = self.store.clear() {
                tracing::warn!(error = %e, "failed to clear persisted session");
            }
        }
        self.navigator.navigate(LOGIN_PATH);
    }
}
