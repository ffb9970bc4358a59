use super::*;
use crate::net::http::ApiResponse;
use crate::router::navigator::History;
use crate::router::routes::LOGIN_PATH;
use crate::state::storage::{KeyValueStorage, MemoryStorage};
use crate::state::store::{TOKEN_KEY, USER_KEY};
use crate::test_helpers::{MockSender, ok};

const LOGIN_OK: &str = r#"{"jwt":"tok1","user":{"id":1,"email":"a@b.com","isSuperAdmin":false}}"#;

struct Harness {
    sender: Arc<MockSender>,
    storage: Arc<MemoryStorage>,
    history: Arc<History>,
    manager: SessionManager,
}

fn harness(storage: MemoryStorage, responses: Vec<Result<ApiResponse, ApiError>>) -> Harness {
    let sender = Arc::new(MockSender::new(responses));
    let storage = Arc::new(storage);
    let history = Arc::new(History::new("/"));
    let manager =
        SessionManager::connect(sender.clone(), PersistedSessionStore::new(storage.clone()), history.clone());
    Harness { sender, storage, history, manager }
}

fn stored_session() -> MemoryStorage {
    MemoryStorage::with_entries([(TOKEN_KEY, "tok1"), (USER_KEY, r#"{"id":1,"isSuperAdmin":true}"#)])
}

// =============================================================================
// login / register
// =============================================================================

#[tokio::test]
async fn login_success_stores_and_persists_pair() {
    let h = harness(MemoryStorage::new(), vec![ok(200, LOGIN_OK)]);
    let principal = h.manager.login("a@b.com", "pw").await.unwrap();

    assert_eq!(principal.email, "a@b.com");
    let session = h.manager.session();
    assert_eq!(session.credential(), Some("tok1"));
    assert!(!h.manager.is_admin());
    assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some("tok1"));
    assert!(h.storage.get(USER_KEY).is_some());
}

#[tokio::test]
async fn login_then_requests_carry_stored_credential() {
    let h = harness(MemoryStorage::new(), vec![ok(200, LOGIN_OK), ok(200, "[]"), ok(200, "[]")]);
    h.manager.login("a@b.com", "pw").await.unwrap();
    h.manager.api().roles().list(&[]).await.unwrap();
    h.manager.api().content().list_types(&[]).await.unwrap();

    let bearers = h.sender.bearers();
    assert_eq!(bearers[0], None);
    assert_eq!(bearers[1].as_deref(), Some("tok1"));
    assert_eq!(bearers[2].as_deref(), Some("tok1"));
}

#[tokio::test]
async fn login_failure_uses_backend_message() {
    let h = harness(MemoryStorage::new(), vec![ok(400, r#"{"error":"Key: 'LoginRequest.Email' failed"}"#)]);
    let err = h.manager.login("nope", "pw").await.unwrap_err();
    assert_eq!(err, SessionError::Rejected("Key: 'LoginRequest.Email' failed".to_owned()));
    assert!(!h.manager.is_authenticated());
    assert!(h.storage.is_empty());
}

#[tokio::test]
async fn login_failure_without_payload_falls_back() {
    let h = harness(MemoryStorage::new(), vec![Err(ApiError::Transport("connection refused".to_owned()))]);
    let err = h.manager.login("a@b.com", "pw").await.unwrap_err();
    assert_eq!(err.message(), LOGIN_FAILED);
}

#[tokio::test]
async fn login_with_malformed_reply_is_rejected() {
    let h = harness(MemoryStorage::new(), vec![ok(200, r#"{"user":{}}"#)]);
    let err = h.manager.login("a@b.com", "pw").await.unwrap_err();
    assert_eq!(err.message(), LOGIN_FAILED);
    assert!(!h.manager.is_authenticated());
}

#[tokio::test]
async fn register_success_authenticates_immediately() {
    let h = harness(MemoryStorage::new(), vec![ok(201, r#"{"jwt":"tok9","user":{"id":5,"username":"bob"}}"#)]);
    let payload = RegisterRequest {
        email: "bob@b.com".to_owned(),
        username: "bob".to_owned(),
        password: "secret1".to_owned(),
        ..RegisterRequest::default()
    };
    let principal = h.manager.register(&payload).await.unwrap();
    assert_eq!(principal.username, "bob");
    assert_eq!(h.manager.session().credential(), Some("tok9"));
    assert_eq!(h.sender.requests()[0].path, "/auth/register");
}

#[tokio::test]
async fn register_conflict_reports_message() {
    let h = harness(MemoryStorage::new(), vec![ok(409, r#"{"error":"User already exists"}"#)]);
    let err = h.manager.register(&RegisterRequest::default()).await.unwrap_err();
    assert_eq!(err.message(), "User already exists");
}

#[tokio::test]
async fn register_failure_without_payload_falls_back() {
    let h = harness(MemoryStorage::new(), vec![ok(500, "")]);
    let err = h.manager.register(&RegisterRequest::default()).await.unwrap_err();
    assert_eq!(err.message(), REGISTRATION_FAILED);
}

// =============================================================================
// fetch_current_principal
// =============================================================================

#[tokio::test]
async fn fetch_success_refreshes_principal_only() {
    let h = harness(stored_session(), vec![ok(200, r#"{"id":1,"username":"alice","isSuperAdmin":false}"#)]);
    let principal = h.manager.fetch_current_principal().await.unwrap();

    assert_eq!(principal.username, "alice");
    assert_eq!(h.manager.session().credential(), Some("tok1"));
    assert!(!h.manager.is_admin());
    assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some("tok1"));
    assert!(h.storage.get(USER_KEY).unwrap().contains("alice"));
    assert_eq!(h.sender.bearers(), vec![Some("tok1".to_owned())]);
}

#[tokio::test]
async fn fetch_with_null_fields_keeps_session() {
    let me = r#"{"id":1,"username":"alice","firstName":null,"isSuperAdmin":true,"roles":null}"#;
    let h = harness(stored_session(), vec![ok(200, me)]);
    let principal = h.manager.fetch_current_principal().await.unwrap();

    assert_eq!(principal.username, "alice");
    assert!(h.manager.is_authenticated());
    assert!(h.manager.is_admin());
    assert_eq!(h.history.entries(), vec!["/".to_owned()]);
}

#[tokio::test]
async fn fetch_persists_role_permissions() {
    let me = r#"{"id":1,"roles":[{"id":2,"name":"Editor","permissions":[{"action":"read"}]}]}"#;
    let h = harness(stored_session(), vec![ok(200, me)]);
    h.manager.fetch_current_principal().await.unwrap();

    let stored: serde_json::Value = serde_json::from_str(&h.storage.get(USER_KEY).unwrap()).unwrap();
    assert_eq!(stored["roles"][0]["permissions"][0]["action"], "read");
    assert!(stored.get("email").is_none());
}

#[tokio::test]
async fn fetch_landing_after_logout_does_not_restore_principal() {
    let h = harness(stored_session(), vec![ok(200, r#"{"id":1,"isSuperAdmin":true}"#)]);
    let pending = h.manager.fetch_current_principal();
    h.manager.logout();
    pending.await.unwrap();

    assert!(!h.manager.is_authenticated());
    assert!(!h.manager.is_admin());
    assert!(h.manager.session().principal().is_none());
    assert!(h.storage.is_empty());
}

#[tokio::test]
async fn fetch_401_clears_once_and_redirects() {
    let h = harness(stored_session(), vec![ok(401, r#"{"error":"Invalid token"}"#)]);
    let err = h.manager.fetch_current_principal().await.unwrap_err();

    assert_eq!(err, SessionError::SessionEnded("Invalid token".to_owned()));
    assert!(!h.manager.is_authenticated());
    assert!(h.storage.is_empty());
    assert_eq!(h.history.current(), LOGIN_PATH);
    assert_eq!(h.history.visits(LOGIN_PATH), 1);
}

#[tokio::test]
async fn fetch_other_failure_also_ends_session() {
    let h = harness(stored_session(), vec![ok(404, r#"{"error":"User not found"}"#)]);
    let err = h.manager.fetch_current_principal().await.unwrap_err();

    assert_eq!(err.message(), "User not found");
    assert!(!h.manager.is_authenticated());
    assert!(h.storage.is_empty());
    assert_eq!(h.history.current(), LOGIN_PATH);
}

#[tokio::test]
async fn fetch_network_failure_uses_fallback_message() {
    let h = harness(stored_session(), vec![Err(ApiError::Transport("timeout".to_owned()))]);
    let err = h.manager.fetch_current_principal().await.unwrap_err();
    assert_eq!(err, SessionError::SessionEnded(IDENTITY_CHECK_FAILED.to_owned()));
}

// =============================================================================
// logout / 401 from any endpoint
// =============================================================================

#[tokio::test]
async fn login_then_logout_leaves_anonymous_and_empty_store() {
    let h = harness(MemoryStorage::new(), vec![ok(200, LOGIN_OK)]);
    h.manager.login("a@b.com", "pw").await.unwrap();
    h.manager.logout();

    assert!(!h.manager.is_authenticated());
    assert!(h.manager.session().principal().is_none());
    assert!(h.storage.is_empty());
    assert_eq!(h.history.current(), LOGIN_PATH);
}

#[tokio::test]
async fn logout_is_idempotent() {
    let h = harness(MemoryStorage::new(), vec![]);
    h.manager.logout();
    h.manager.logout();
    assert!(!h.manager.is_authenticated());
    assert!(h.storage.is_empty());
}

#[tokio::test]
async fn crud_401_ends_session_and_requests_go_out_bare() {
    let h = harness(stored_session(), vec![ok(401, ""), ok(200, "[]")]);
    let err = h.manager.api().users().list(&[]).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!h.manager.is_authenticated());
    assert!(h.storage.is_empty());
    assert_eq!(h.history.visits(LOGIN_PATH), 1);

    h.manager.api().roles().list_public().await.unwrap();
    assert_eq!(h.sender.bearers(), vec![Some("tok1".to_owned()), None]);
}

#[test]
fn is_admin_false_without_principal() {
    let storage = MemoryStorage::with_entries([(TOKEN_KEY, "tok1")]);
    let h = harness(storage, vec![]);
    assert!(h.manager.is_authenticated());
    assert!(!h.manager.is_admin());
}
