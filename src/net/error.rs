//! Error taxonomy for backend calls.
//!
//! ERROR HANDLING
//! ==============
//! `Unauthorized` is the only variant with a global side effect: the
//! transport reports it to the session layer before handing it back, so
//! callers can still branch on it but never need to clean up after it.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

const UNAUTHORIZED: &str = "Unauthorized";
const NO_DETAILS: &str = "no details";

/// Errors produced by backend requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered 401; the session has already been torn down.
    #[error("unauthorized: {}", .message.as_deref().unwrap_or(UNAUTHORIZED))]
    Unauthorized { message: Option<String> },

    /// The backend answered with any other non-success status.
    #[error("request failed with status {status}: {}", .message.as_deref().unwrap_or(NO_DETAILS))]
    Status { status: u16, message: Option<String> },

    /// The request never produced a response (connect, timeout, TLS).
    #[error("transport failed: {0}")]
    Transport(String),

    /// A success response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The request could not be built (bad URL, unserializable body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Message taken from the backend's error payload, if it sent one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::Status { message, .. } => message.as_deref(),
            Self::Transport(_) | Self::Decode(_) | Self::InvalidRequest(_) => None,
        }
    }

    /// Human-readable message suitable for showing to the operator.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized { message } => message.as_deref().unwrap_or(UNAUTHORIZED),
            Self::Status { message, .. } => message.as_deref().unwrap_or(NO_DETAILS),
            Self::Transport(detail) | Self::Decode(detail) | Self::InvalidRequest(detail) => detail,
        }
    }

    /// HTTP status carried by the error, if the backend responded at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) | Self::InvalidRequest(_) => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
