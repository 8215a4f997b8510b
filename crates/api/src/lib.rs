//! Kirana API - session-scoped pre-bill service.
//!
//! Exposes the pre-bill workflow over JSON. Each browser session owns one
//! cart and one set of packing requests, persisted through tower-sessions
//! into `PostgreSQL`. Shops and products are read from the `catalog` schema.
//!
//! The binary in `main.rs` wires these modules into a server; they are
//! exposed as a library so the router can be exercised in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod session_store;
pub mod state;
