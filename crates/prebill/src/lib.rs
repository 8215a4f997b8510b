//! Kirana pre-bill workflow.
//!
//! The pre-bill is the customer's cart grouped by shop, with a packing
//! request tracked per shop. This crate holds every piece of that state and
//! the rules that tie it together:
//!
//! - [`cart`] - Cart lines with snapshotted unit prices
//! - [`grouping`] - Per-shop views derived from the cart on every read
//! - [`packing`] - The per-shop packing status machine
//! - [`workflow`] - The coordinator the presentation layer talks to
//! - [`store`] - Key-value persistence seam and an in-memory store
//! - [`catalog`] - Catalog lookup seam and an in-memory catalog
//!
//! # Example
//!
//! ```rust
//! # use kirana_core::{Price, Product, ProductId, ShopId};
//! # use kirana_prebill::{MemoryStore, Workflow};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), kirana_prebill::PrebillError> {
//! let mut workflow = Workflow::load(MemoryStore::new()).await?;
//!
//! let rice = Product {
//!     id: ProductId::new(1),
//!     shop_id: ShopId::new(10),
//!     name: "Sona masoori rice".to_string(),
//!     price: Price::new(100.into()),
//!     unit_label: "kg".to_string(),
//!     available: true,
//! };
//! workflow.add(&rice, 2).await?;
//! workflow.request_packing(ShopId::new(10)).await?;
//!
//! assert_eq!(workflow.pre_bill().grand_total, Price::new(200.into()));
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod error;
pub mod grouping;
pub mod packing;
pub mod store;
pub mod workflow;

pub use cart::{Cart, CartLine};
pub use catalog::{Catalog, CatalogError, InMemoryCatalog};
pub use error::{PrebillError, Result};
pub use grouping::{ShopGroup, groups_by_shop, lines_for_shop};
pub use packing::PackingBook;
pub use store::{KeyValueStore, MemoryStore, StoreError};
pub use workflow::{PreBill, ShopDetail, Workflow};
