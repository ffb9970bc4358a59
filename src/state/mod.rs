//! Client state: durable storage, the session and its manager, and locale.
//!
//! DESIGN
//! ======
//! Storage is the leaf; the persisted session store and locale store sit on
//! it; the session context owns the live session; the session manager is the
//! only component that changes it.

pub mod auth;
pub mod i18n;
pub mod session;
pub mod storage;
pub mod store;
