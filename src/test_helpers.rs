//! Shared fixtures for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::net::error::ApiError;
use crate::net::http::{ApiRequest, ApiResponse, HttpSend};
use crate::net::transport::SessionExpiry;
use crate::net::types::Principal;
use crate::router::navigator::History;
use crate::state::session::SessionContext;
use crate::state::storage::MemoryStorage;
use crate::state::store::PersistedSessionStore;

// =========================================================================
// MockSender
// =========================================================================

/// Replays scripted responses in order and records every request.
pub struct MockSender {
    responses: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockSender {
    pub fn new(responses: Vec<Result<ApiResponse, ApiError>>) -> Self {
        Self { responses: Mutex::new(responses.into()), requests: Mutex::new(Vec::new()) }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn bearers(&self) -> Vec<Option<String>> {
        self.requests().into_iter().map(|r| r.bearer).collect()
    }
}

#[async_trait::async_trait]
impl HttpSend for MockSender {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(reply(200, "{}")))
    }
}

pub fn reply(status: u16, body: &str) -> ApiResponse {
    ApiResponse { status, body: body.to_owned() }
}

pub fn ok(status: u16, body: &str) -> Result<ApiResponse, ApiError> {
    Ok(reply(status, body))
}

// =========================================================================
// CountingExpiry
// =========================================================================

#[derive(Default)]
pub struct CountingExpiry {
    calls: AtomicUsize,
}

impl CountingExpiry {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SessionExpiry for CountingExpiry {
    fn session_expired(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

// =========================================================================
// Session fixtures
// =========================================================================

pub fn principal(admin: bool) -> Principal {
    Principal {
        id: 1,
        email: "a@b.com".to_owned(),
        username: "alice".to_owned(),
        is_super_admin: admin,
        ..Principal::default()
    }
}

/// Session context over `storage`, navigating into a throwaway history.
pub fn session_context(storage: MemoryStorage) -> Arc<SessionContext> {
    Arc::new(SessionContext::load(PersistedSessionStore::new(Arc::new(storage)), Arc::new(History::new("/"))))
}
