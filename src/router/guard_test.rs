use super::*;
use crate::router::navigator::History;
use crate::state::storage::MemoryStorage;
use crate::state::store::{PersistedSessionStore, TOKEN_KEY, USER_KEY};

const ANON: Access = Access { authenticated: false, admin: false };
const MEMBER: Access = Access { authenticated: true, admin: false };
const ADMIN: Access = Access { authenticated: true, admin: true };

fn make_router(storage: MemoryStorage) -> (Arc<History>, Router) {
    let history = Arc::new(History::new("/"));
    let session = Arc::new(SessionContext::load(PersistedSessionStore::new(Arc::new(storage)), history.clone()));
    (history.clone(), Router::new(RouteTable::admin_panel(), session, history))
}

fn member_storage() -> MemoryStorage {
    MemoryStorage::with_entries([(TOKEN_KEY, "tok1"), (USER_KEY, r#"{"id":1,"isSuperAdmin":false}"#)])
}

// =============================================================================
// check
// =============================================================================

#[test]
fn auth_route_redirects_anonymous_to_login() {
    assert_eq!(check(RouteMeta::auth(), ANON), GuardDecision::Redirect(LOGIN_PATH));
    assert_eq!(check(RouteMeta::auth(), MEMBER), GuardDecision::Allow);
}

#[test]
fn guest_route_redirects_authenticated_to_default() {
    assert_eq!(check(RouteMeta::guest(), MEMBER), GuardDecision::Redirect(DEFAULT_PATH));
    assert_eq!(check(RouteMeta::guest(), ANON), GuardDecision::Allow);
}

#[test]
fn admin_route_redirects_non_admin_to_default() {
    assert_eq!(check(RouteMeta::admin(), MEMBER), GuardDecision::Redirect(DEFAULT_PATH));
    assert_eq!(check(RouteMeta::admin(), ADMIN), GuardDecision::Allow);
}

#[test]
fn auth_check_runs_before_admin_check() {
    let meta = RouteMeta::auth().merge(RouteMeta::admin());
    assert_eq!(check(meta, ANON), GuardDecision::Redirect(LOGIN_PATH));
    assert_eq!(check(meta, MEMBER), GuardDecision::Redirect(DEFAULT_PATH));
    assert_eq!(check(meta, ADMIN), GuardDecision::Allow);
}

#[test]
fn unflagged_route_is_always_allowed() {
    for access in [ANON, MEMBER, ADMIN] {
        assert_eq!(check(RouteMeta::default(), access), GuardDecision::Allow);
    }
}

// =============================================================================
// Router
// =============================================================================

#[test]
fn anonymous_root_lands_on_login() {
    let (history, router) = make_router(MemoryStorage::new());
    let nav = router.navigate("/");
    let Navigation::Redirected { requested, to } = nav else {
        panic!("expected redirect, got {nav:?}");
    };
    assert_eq!(requested, "/");
    assert_eq!(to.name, "Login");
    assert_eq!(history.current(), LOGIN_PATH);
}

#[test]
fn member_visiting_users_lands_on_dashboard() {
    let (history, router) = make_router(member_storage());
    let nav = router.navigate("/users");
    assert!(matches!(&nav, Navigation::Redirected { to, .. } if to.name == "Dashboard"));
    assert_eq!(history.current(), DEFAULT_PATH);
}

#[test]
fn member_visiting_login_lands_on_dashboard() {
    let (_, router) = make_router(member_storage());
    assert!(matches!(router.navigate("/login"), Navigation::Redirected { to, .. } if to.name == "Dashboard"));
}

#[test]
fn admin_reaches_users() {
    let storage = MemoryStorage::with_entries([(TOKEN_KEY, "tok1"), (USER_KEY, r#"{"id":1,"isSuperAdmin":true}"#)]);
    let (history, router) = make_router(storage);
    assert!(matches!(router.navigate("/users"), Navigation::Allowed(route) if route.name == "Users"));
    assert_eq!(history.current(), "/users");
}

#[test]
fn unknown_path_is_not_found_and_does_not_navigate() {
    let (history, router) = make_router(member_storage());
    assert_eq!(router.navigate("/nope"), Navigation::NotFound("/nope".to_owned()));
    assert_eq!(history.entries(), vec!["/".to_owned()]);
}

#[test]
fn redirect_cycle_is_reported() {
    let table = RouteTable::new(vec![
        crate::router::routes::Route::named("Login", LOGIN_PATH, RouteMeta::auth()),
        crate::router::routes::Route::named("Home", DEFAULT_PATH, RouteMeta::auth()),
    ]);
    let history = Arc::new(History::new("/"));
    let session =
        Arc::new(SessionContext::load(PersistedSessionStore::new(Arc::new(MemoryStorage::new())), history.clone()));
    let router = Router::new(table, session, history);
    assert_eq!(router.navigate("/"), Navigation::RedirectLoop("/".to_owned()));
}
