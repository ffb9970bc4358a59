//! Route guard: per-navigation access decisions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs before every navigation. The decision itself is a pure function of
//! the target's access flags and the session; `Router` applies it, follows
//! redirects, and records the final location.
//!
//! Checks run in a fixed order (auth, guest, admin) so a route flagged both
//! auth and admin is gated by both in sequence.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;

use super::navigator::Navigator;
use super::routes::{DEFAULT_PATH, LOGIN_PATH, ResolvedRoute, RouteMeta, RouteTable};
use crate::state::session::SessionContext;

/// Upper bound on redirect hops for one navigation.
const MAX_REDIRECTS: usize = 4;

/// What the guard needs to know about the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Access {
    pub authenticated: bool,
    pub admin: bool,
}

impl Access {
    #[must_use]
    pub fn of(session: &SessionContext) -> Self {
        Self { authenticated: session.is_authenticated(), admin: session.is_admin() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Decide whether a navigation to a route with `meta` may proceed.
#[must_use]
pub fn check(meta: RouteMeta, access: Access) -> GuardDecision {
    if meta.requires_auth && !access.authenticated {
        return GuardDecision::Redirect(LOGIN_PATH);
    }
    if meta.requires_guest && access.authenticated {
        return GuardDecision::Redirect(DEFAULT_PATH);
    }
    if meta.requires_admin && !access.admin {
        return GuardDecision::Redirect(DEFAULT_PATH);
    }
    GuardDecision::Allow
}

/// Outcome of a guarded navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Landed on the requested route.
    Allowed(ResolvedRoute),
    /// The guard sent the user elsewhere; `to` is where they landed.
    Redirected { requested: String, to: ResolvedRoute },
    /// Nothing matches the path.
    NotFound(String),
    /// Redirects did not settle.
    RedirectLoop(String),
}

/// Route table plus guard, reading the shared session.
pub struct Router {
    table: RouteTable,
    session: Arc<SessionContext>,
    navigator: Arc<dyn Navigator>,
}

impl Router {
    #[must_use]
    pub fn new(table: RouteTable, session: Arc<SessionContext>, navigator: Arc<dyn Navigator>) -> Self {
        Self { table, session, navigator }
    }

    /// Navigate to `path`, applying the guard to the target and to every
    /// redirect it produces.
    pub fn navigate(&self, path: &str) -> Navigation {
        let access = Access::of(&self.session);
        let mut target = path.to_owned();
        for hop in 0..=MAX_REDIRECTS {
            let Some(route) = self.table.resolve(&target) else {
                tracing::debug!(path = %target, "no route");
                return Navigation::NotFound(target);
            };
            match check(route.meta, access) {
                GuardDecision::Allow => {
                    self.navigator.navigate(&route.path);
                    if hop == 0 {
                        return Navigation::Allowed(route);
                    }
                    return Navigation::Redirected { requested: path.to_owned(), to: route };
                }
                GuardDecision::Redirect(next) => {
                    tracing::info!(route = route.name, to = next, "navigation redirected");
                    target = next.to_owned();
                }
            }
        }
        tracing::warn!(path, "redirect loop");
        Navigation::RedirectLoop(path.to_owned())
    }
}
