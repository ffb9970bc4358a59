//! Wire DTOs for the admin API boundary.
//!
//! DESIGN
//! ======
//! Backend payloads are parsed into explicit per-endpoint types here instead
//! of being passed around as loose JSON. Only the session-relevant shapes are
//! typed; CRUD bodies for content, roles, and permissions stay opaque
//! `serde_json::Value`s because this client never interprets them.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// PRINCIPAL
// =============================================================================

/// Role summary attached to a principal. Keys not modeled here (e.g.
/// `permissions`) are carried in `extra` so stored records round-trip.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoleSummary {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "type", deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The authenticated user's profile, as returned by login, register, and
/// `/auth/me`.
///
/// Only `isSuperAdmin` drives behavior. Every field tolerates `null` or
/// absence, and unknown keys survive in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Principal {
    /// Backend user identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    /// Grants access to admin-only views. Absent or `null` means `false`.
    #[serde(deserialize_with = "null_as_default")]
    pub is_super_admin: bool,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<RoleSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `null` decodes like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Principal {
    /// Name to show in prompts: full name when known, else username, else email.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if !full.is_empty() {
            return full.to_owned();
        }
        if !self.username.is_empty() {
            return self.username.clone();
        }
        self.email.clone()
    }
}

// =============================================================================
// AUTH ENDPOINTS
// =============================================================================

/// Body for `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body for `POST /auth/register`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Credential plus principal returned by login and register.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    /// Opaque bearer credential.
    #[serde(rename = "jwt")]
    pub credential: String,
    #[serde(rename = "user")]
    pub principal: Principal,
}

/// Body for `PUT /users/{id}/password`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PasswordChange<'a> {
    pub password: &'a str,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Generic backend error body (`{"error": "..."}`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorPayload {
    /// Extract the backend's message from a raw response body, if present.
    #[must_use]
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|payload| payload.error)
            .map(|msg| msg.trim().to_owned())
            .filter(|msg| !msg.is_empty())
    }
}
