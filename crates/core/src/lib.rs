//! Kirana Core - Shared types library.
//!
//! This crate provides the types shared by every Kirana component:
//! - `prebill` - Cart, shop grouping and packing-request workflow
//! - `api` - Session-scoped HTTP surface over the workflow
//! - `cli` - Migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Catalog entities arrive here already normalized, so
//! downstream code never deals with fallback field names.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, packing statuses and catalog records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
