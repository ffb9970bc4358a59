//! REST API wrappers for the admin backend.
//!
//! Each resource gets a thin borrowed view over the shared transport. Auth
//! endpoints decode into typed DTOs; CRUD bodies are forwarded as opaque
//! JSON since the admin client only relays them.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::Value;

use super::error::ApiError;
use super::transport::AuthTransport;
use super::types::{AuthResponse, LoginRequest, PasswordChange, Principal, RegisterRequest};

/// Query parameters for list endpoints (`page`, `pageSize`, filters, ...).
pub type ListParams = [(String, String)];

fn content_type_endpoint(uid: &str) -> String {
    format!("/content-types/{uid}")
}

fn entries_endpoint(uid: &str) -> String {
    format!("/content-types/{uid}/entries")
}

fn entry_endpoint(uid: &str, id: &str) -> String {
    format!("/content-types/{uid}/entries/{id}")
}

fn resource_endpoint(collection: &str, id: &str) -> String {
    format!("/{collection}/{id}")
}

/// Entry point for every backend call.
#[derive(Clone)]
pub struct AdminApi {
    transport: AuthTransport,
}

impl AdminApi {
    #[must_use]
    pub fn new(transport: AuthTransport) -> Self {
        Self { transport }
    }

    #[must_use]
    pub fn auth(&self) -> AuthEndpoints<'_> {
        AuthEndpoints { transport: &self.transport }
    }

    #[must_use]
    pub fn content(&self) -> ContentEndpoints<'_> {
        ContentEndpoints { transport: &self.transport }
    }

    #[must_use]
    pub fn users(&self) -> UserEndpoints<'_> {
        UserEndpoints { transport: &self.transport }
    }

    #[must_use]
    pub fn roles(&self) -> RoleEndpoints<'_> {
        RoleEndpoints { transport: &self.transport }
    }

    #[must_use]
    pub fn permissions(&self) -> PermissionEndpoints<'_> {
        PermissionEndpoints { transport: &self.transport }
    }
}

// =============================================================================
// AUTH
// =============================================================================

pub struct AuthEndpoints<'a> {
    transport: &'a AuthTransport,
}

impl AuthEndpoints<'_> {
    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or `Decode` if the reply lacks a credential.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.transport.post("/auth/login", &LoginRequest { email, password }).await
    }

    /// `POST /auth/register`.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or `Decode` if the reply lacks a credential.
    pub async fn register(&self, payload: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.transport.post("/auth/register", payload).await
    }

    /// `GET /auth/me`.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or `Decode` on a malformed principal.
    pub async fn me(&self) -> Result<Principal, ApiError> {
        self.transport.get("/auth/me", &[]).await
    }
}

// =============================================================================
// CONTENT TYPES + ENTRIES
// =============================================================================

pub struct ContentEndpoints<'a> {
    transport: &'a AuthTransport,
}

#[allow(clippy::missing_errors_doc)]
impl ContentEndpoints<'_> {
    pub async fn list_types(&self, params: &ListParams) -> Result<Value, ApiError> {
        self.transport.get("/content-types", params).await
    }

    pub async fn get_type(&self, uid: &str) -> Result<Value, ApiError> {
        self.transport.get(&content_type_endpoint(uid), &[]).await
    }

    pub async fn create_type(&self, data: &Value) -> Result<Value, ApiError> {
        self.transport.post("/content-types", data).await
    }

    pub async fn update_type(&self, uid: &str, data: &Value) -> Result<Value, ApiError> {
        self.transport.put(&content_type_endpoint(uid), data).await
    }

    pub async fn delete_type(&self, uid: &str) -> Result<Value, ApiError> {
        self.transport.delete(&content_type_endpoint(uid)).await
    }

    pub async fn list_entries(&self, uid: &str, params: &ListParams) -> Result<Value, ApiError> {
        self.transport.get(&entries_endpoint(uid), params).await
    }

    pub async fn get_entry(&self, uid: &str, id: &str) -> Result<Value, ApiError> {
        self.transport.get(&entry_endpoint(uid, id), &[]).await
    }

    pub async fn create_entry(&self, uid: &str, data: &Value) -> Result<Value, ApiError> {
        self.transport.post(&entries_endpoint(uid), data).await
    }

    pub async fn update_entry(&self, uid: &str, id: &str, data: &Value) -> Result<Value, ApiError> {
        self.transport.put(&entry_endpoint(uid, id), data).await
    }

    pub async fn delete_entry(&self, uid: &str, id: &str) -> Result<Value, ApiError> {
        self.transport.delete(&entry_endpoint(uid, id)).await
    }
}

// =============================================================================
// USERS
// =============================================================================

pub struct UserEndpoints<'a> {
    transport: &'a AuthTransport,
}

#[allow(clippy::missing_errors_doc)]
impl UserEndpoints<'_> {
    pub async fn list(&self, params: &ListParams) -> Result<Value, ApiError> {
        self.transport.get("/users", params).await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.transport.get(&resource_endpoint("users", id), &[]).await
    }

    pub async fn update(&self, id: &str, data: &Value) -> Result<Value, ApiError> {
        self.transport.put(&resource_endpoint("users", id), data).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.transport.delete(&resource_endpoint("users", id)).await
    }

    /// `PUT /users/{id}/password`.
    pub async fn change_password(&self, id: &str, password: &str) -> Result<Value, ApiError> {
        let path = format!("{}/password", resource_endpoint("users", id));
        self.transport.put(&path, &PasswordChange { password }).await
    }
}

// =============================================================================
// ROLES
// =============================================================================

pub struct RoleEndpoints<'a> {
    transport: &'a AuthTransport,
}

#[allow(clippy::missing_errors_doc)]
impl RoleEndpoints<'_> {
    pub async fn list(&self, params: &ListParams) -> Result<Value, ApiError> {
        self.transport.get("/roles", params).await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.transport.get(&resource_endpoint("roles", id), &[]).await
    }

    pub async fn create(&self, data: &Value) -> Result<Value, ApiError> {
        self.transport.post("/roles", data).await
    }

    pub async fn update(&self, id: &str, data: &Value) -> Result<Value, ApiError> {
        self.transport.put(&resource_endpoint("roles", id), data).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.transport.delete(&resource_endpoint("roles", id)).await
    }

    /// `GET /roles/public`: roles offered at self-registration.
    pub async fn list_public(&self) -> Result<Value, ApiError> {
        self.transport.get("/roles/public", &[]).await
    }
}

// =============================================================================
// PERMISSIONS
// =============================================================================

pub struct PermissionEndpoints<'a> {
    transport: &'a AuthTransport,
}

#[allow(clippy::missing_errors_doc)]
impl PermissionEndpoints<'_> {
    pub async fn list(&self, params: &ListParams) -> Result<Value, ApiError> {
        self.transport.get("/permissions", params).await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.transport.get(&resource_endpoint("permissions", id), &[]).await
    }

    pub async fn create(&self, data: &Value) -> Result<Value, ApiError> {
        self.transport.post("/permissions", data).await
    }

    pub async fn update(&self, id: &str, data: &Value) -> Result<Value, ApiError> {
        self.transport.put(&resource_endpoint("permissions", id), data).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.transport.delete(&resource_endpoint("permissions", id)).await
    }
}
