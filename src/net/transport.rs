//! Authenticated transport: bearer injection and central 401 handling.
//!
//! ARCHITECTURE
//! ============
//! Every backend call goes through `AuthTransport::execute`. The credential is
//! read from the shared session context per request, so a login or logout is
//! visible to the very next call. A 401 from any endpoint is reported to the
//! `SessionExpiry` listener before the error is returned, which makes session
//! death a single global effect regardless of which call observed it.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::http::{ApiRequest, ApiResponse, HttpSend};
use super::types::ErrorPayload;
use crate::state::session::SessionContext;

const HTTP_UNAUTHORIZED: u16 = 401;

/// Receives the transport's "credential rejected" event.
pub trait SessionExpiry: Send + Sync {
    fn session_expired(&self);
}

#[derive(Clone)]
pub struct AuthTransport {
    sender: Arc<dyn HttpSend>,
    session: Arc<SessionContext>,
    expiry: Arc<dyn SessionExpiry>,
}

impl AuthTransport {
    #[must_use]
    pub fn new(sender: Arc<dyn HttpSend>, session: Arc<SessionContext>, expiry: Arc<dyn SessionExpiry>) -> Self {
        Self { sender, session, expiry }
    }

    /// Send `request` with the current credential attached.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` on 401 (after notifying the expiry listener),
    /// `Status` on any other non-success status, or the sender's error.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        request.bearer = self.session.credential();
        let response = self.sender.send(&request).await?;

        if response.status == HTTP_UNAUTHORIZED {
            tracing::warn!(path = %request.path, "credential rejected; ending session");
            self.expiry.session_expired();
            let message = ErrorPayload::message_from(&response.body);
            return Err(ApiError::Unauthorized { message });
        }
        if !response.is_success() {
            let message = ErrorPayload::message_from(&response.body);
            tracing::debug!(path = %request.path, status = response.status, "api error");
            return Err(ApiError::Status { status: response.status, message });
        }
        Ok(response)
    }

    /// `GET` and decode into `T`.
    ///
    /// # Errors
    ///
    /// See [`AuthTransport::execute`]; also `Decode` on a mismatched body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> Result<T, ApiError> {
        self.execute(ApiRequest::get(path).with_query(query)).await?.json()
    }

    /// `POST` a JSON body and decode the reply into `T`.
    ///
    /// # Errors
    ///
    /// See [`AuthTransport::execute`]; also `Decode` on a mismatched body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.execute(ApiRequest::post(path, body)?).await?.json()
    }

    /// `PUT` a JSON body and decode the reply into `T`.
    ///
    /// # Errors
    ///
    /// See [`AuthTransport::execute`]; also `Decode` on a mismatched body.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.execute(ApiRequest::put(path, body)?).await?.json()
    }

    /// `DELETE`, returning whatever JSON the backend sent (or `null`).
    ///
    /// # Errors
    ///
    /// See [`AuthTransport::execute`].
    pub async fn delete(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        self.execute(ApiRequest::delete(path)).await?.json_value()
    }
}
