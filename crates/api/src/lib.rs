//! HTTP surface of the field-management backend.
//!
//! The binary in `main.rs` wires configuration, the database pool and the
//! router together; everything else lives here so integration tests can
//! build the same router over an in-memory store.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
