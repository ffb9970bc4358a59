//! Route table for the admin panel.
//!
//! Routes nest: a child's effective access flags are its own OR'd with every
//! ancestor's, so the whole dashboard subtree inherits `requires_auth` from
//! the layout route.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::collections::BTreeMap;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const DEFAULT_PATH: &str = "/";

/// Per-route access flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_guest: bool,
    pub requires_admin: bool,
}

impl RouteMeta {
    #[must_use]
    pub fn auth() -> Self {
        Self { requires_auth: true, ..Self::default() }
    }

    #[must_use]
    pub fn guest() -> Self {
        Self { requires_guest: true, ..Self::default() }
    }

    #[must_use]
    pub fn admin() -> Self {
        Self { requires_admin: true, ..Self::default() }
    }

    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            requires_auth: self.requires_auth || other.requires_auth,
            requires_guest: self.requires_guest || other.requires_guest,
            requires_admin: self.requires_admin || other.requires_admin,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// Route name; layout routes have none.
    pub name: Option<&'static str>,
    /// Path pattern relative to the parent (`content-types/:uid`).
    pub path: &'static str,
    pub meta: RouteMeta,
    pub children: Vec<Route>,
}

impl Route {
    #[must_use]
    pub fn named(name: &'static str, path: &'static str, meta: RouteMeta) -> Self {
        Self { name: Some(name), path, meta, children: Vec::new() }
    }

    #[must_use]
    pub fn layout(path: &'static str, meta: RouteMeta, children: Vec<Route>) -> Self {
        Self { name: None, path, meta, children }
    }
}

/// A path matched against the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub name: &'static str,
    pub path: String,
    pub params: BTreeMap<String, String>,
    /// Flags merged along the matched chain.
    pub meta: RouteMeta,
}

#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The admin panel's views.
    #[must_use]
    pub fn admin_panel() -> Self {
        Self::new(vec![
            Route::named("Login", LOGIN_PATH, RouteMeta::guest()),
            Route::named("Register", REGISTER_PATH, RouteMeta::guest()),
            Route::layout(
                DEFAULT_PATH,
                RouteMeta::auth(),
                vec![
                    Route::named("Dashboard", "", RouteMeta::default()),
                    Route::named("ContentTypes", "content-types", RouteMeta::default()),
                    Route::named("ContentTypeDetail", "content-types/:uid", RouteMeta::default()),
                    Route::named("ContentEntries", "content-types/:uid/entries", RouteMeta::default()),
                    Route::named("ContentEntryDetail", "content-types/:uid/entries/:id", RouteMeta::default()),
                    Route::named("Users", "users", RouteMeta::admin()),
                ],
            ),
        ])
    }

    /// Match `path` (query string and trailing slash ignored).
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        let clean = normalize(path);
        let target = segments(&clean);
        self.routes
            .iter()
            .find_map(|route| match_route(route, &target, RouteMeta::default(), &BTreeMap::new()))
            .map(|(name, meta, params)| ResolvedRoute { name, path: clean, params, meta })
    }
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

type Match = (&'static str, RouteMeta, BTreeMap<String, String>);

fn match_route(
    route: &Route,
    target: &[&str],
    inherited: RouteMeta,
    params: &BTreeMap<String, String>,
) -> Option<Match> {
    let pattern = segments(route.path);
    if pattern.len() > target.len() {
        return None;
    }
    let mut params = params.clone();
    for (pat, seg) in pattern.iter().zip(target) {
        if let Some(key) = pat.strip_prefix(':') {
            params.insert(key.to_owned(), (*seg).to_owned());
        } else if pat != seg {
            return None;
        }
    }

    let meta = inherited.merge(route.meta);
    let rest = &target[pattern.len()..];
    if let Some(found) = route
        .children
        .iter()
        .find_map(|child| match_route(child, rest, meta, &params))
    {
        return Some(found);
    }
    match route.name {
        Some(name) if rest.is_empty() => Some((name, meta, params)),
        _ => None,
    }
}
