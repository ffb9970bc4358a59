//! Admin-panel client for the CMS backend.
//!
//! ARCHITECTURE
//! ============
//! `state::storage` (durable key-value) feeds `state::store` (persisted
//! session) and `state::i18n` (locale). `state::session::SessionContext`
//! owns the live session and is shared with `net::transport::AuthTransport`
//! (bearer injection, 401 handling) and `router::guard::Router` (navigation
//! gating). `state::auth::SessionManager` is the only writer.

pub mod config;
pub mod net;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_helpers;
