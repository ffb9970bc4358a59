//! Backend networking: wire types, the HTTP seam, the authenticated
//! transport, and the resource wrappers built on it.

pub mod api;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;
