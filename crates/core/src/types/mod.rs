//! Core types for Kirana.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod id;
pub mod price;
pub mod status;

pub use catalog::{Product, Shop};
pub use id::*;
pub use price::Price;
pub use status::PackingStatus;
