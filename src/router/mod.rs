//! Navigation: the route table, the guard that gates it, and the sink that
//! records where the user ended up.

pub mod guard;
pub mod navigator;
pub mod routes;
