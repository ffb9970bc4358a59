//! Session manager: login, register, identity refresh, logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by the CLI and by route guards to move the client between Anonymous
//! and Authenticated. It is the only writer of the shared `SessionContext`;
//! the transport's 401 event lands here too.
//!
//! ERROR HANDLING
//! ==============
//! Login and register never propagate raw transport errors: failures come
//! back as `SessionError::Rejected` with the backend's message or a fixed
//! fallback, and the session is left as it was. A failed identity refresh is
//! treated as session death, not a transient error.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use super::session::{Session, SessionContext};
use super::store::PersistedSessionStore;
use crate::net::api::AdminApi;
use crate::net::error::ApiError;
use crate::net::http::HttpSend;
use crate::net::transport::{AuthTransport, SessionExpiry};
use crate::net::types::{AuthResponse, Principal, RegisterRequest};
use crate::router::navigator::Navigator;

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const IDENTITY_CHECK_FAILED: &str = "Could not verify the current user";

/// Failures reported by session transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Login or registration was refused; the session is unchanged.
    #[error("{0}")]
    Rejected(String),

    /// The current user could not be resolved; the session was ended.
    #[error("session ended: {0}")]
    SessionEnded(String),
}

impl SessionError {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected(message) | Self::SessionEnded(message) => message,
        }
    }
}

fn rejection(err: &ApiError, fallback: &str) -> SessionError {
    SessionError::Rejected(err.backend_message().unwrap_or(fallback).to_owned())
}

pub struct SessionManager {
    session: Arc<SessionContext>,
    api: AdminApi,
}

impl SessionManager {
    /// Restore the saved session and wire the transport's 401 event to it.
    #[must_use]
    pub fn connect(sender: Arc<dyn HttpSend>, store: PersistedSessionStore, navigator: Arc<dyn Navigator>) -> Self {
        let session = Arc::new(SessionContext::load(store, navigator));
        let transport = AuthTransport::new(sender, session.clone(), session.clone());
        Self { session, api: AdminApi::new(transport) }
    }

    /// Backend wrappers sharing this manager's session.
    #[must_use]
    pub fn api(&self) -> &AdminApi {
        &self.api
    }

    /// Shared session context, for components that only read it.
    #[must_use]
    pub fn context(&self) -> &Arc<SessionContext> {
        &self.session
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.session.snapshot()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// `principal.isSuperAdmin`, `false` without a principal.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` with the backend's message, or `Login failed`.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<Principal, SessionError> {
        let response = self
            .api
            .auth()
            .login(identifier, secret)
            .await
            .map_err(|e| rejection(&e, LOGIN_FAILED))?;
        Ok(self.establish(response))
    }

    /// Create an account and start a session for it.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` with the backend's message, or `Registration failed`.
    pub async fn register(&self, payload: &RegisterRequest) -> Result<Principal, SessionError> {
        let response = self
            .api
            .auth()
            .register(payload)
            .await
            .map_err(|e| rejection(&e, REGISTRATION_FAILED))?;
        Ok(self.establish(response))
    }

    /// Re-read the current user with the held credential.
    ///
    /// # Errors
    ///
    /// Any failure ends the session (clear + redirect to login) and returns
    /// `SessionEnded`.
    pub async fn fetch_current_principal(&self) -> Result<Principal, SessionError> {
        match self.api.auth().me().await {
            Ok(principal) => {
                self.session.refresh_principal(principal.clone());
                tracing::debug!(user_id = principal.id, "principal refreshed");
                Ok(principal)
            }
            Err(e) => {
                tracing::warn!(error = %e, "identity check failed; logging out");
                // A 401 already ended the session inside the transport.
                if !e.is_unauthorized() {
                    self.logout();
                }
                Err(SessionError::SessionEnded(e.backend_message().unwrap_or(IDENTITY_CHECK_FAILED).to_owned()))
            }
        }
    }

    /// End the session and send the user to the login view. Idempotent.
    pub fn logout(&self) {
        self.session.clear();
        tracing::info!("logged out");
    }

    fn establish(&self, response: AuthResponse) -> Principal {
        let AuthResponse { credential, principal } = response;
        tracing::info!(user_id = principal.id, admin = principal.is_super_admin, "session established");
        self.session.establish(credential, principal.clone());
        principal
    }
}

/// The transport's 401 event: same transition as logout.
impl SessionExpiry for SessionContext {
    fn session_expired(&self) {
        self.clear();
    }
}
