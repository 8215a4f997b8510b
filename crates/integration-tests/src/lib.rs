//! Integration tests for Kirana.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kirana-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `prebill_workflow` - End-to-end pre-bill scenarios over an in-memory store
//! - `prebill_properties` - Property tests for grouping and cart arithmetic
//!
//! This library only holds shared fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]

use kirana_core::{Price, Product, ProductId, Shop, ShopId};
use kirana_prebill::{InMemoryCatalog, MemoryStore, Workflow};
use rust_decimal::Decimal;

/// Build an in-stock product.
#[must_use]
pub fn product(id: i32, shop: ShopId, price: Decimal) -> Product {
    Product {
        id: ProductId::new(id),
        shop_id: shop,
        name: format!("product-{id}"),
        price: Price::new(price),
        unit_label: "piece".to_string(),
        available: true,
    }
}

/// Build a shop with a generated name and address.
#[must_use]
pub fn shop(id: ShopId) -> Shop {
    Shop {
        id,
        name: format!("shop-{id}"),
        address: format!("{id} Market Road"),
        image_url: None,
    }
}

/// Catalog containing the given products and one shop per distinct shop id.
#[must_use]
pub fn catalog_of(products: &[Product]) -> InMemoryCatalog {
    products.iter().fold(InMemoryCatalog::new(), |catalog, p| {
        catalog.with_shop(shop(p.shop_id)).with_product(p.clone())
    })
}

/// A workflow over a fresh in-memory store, plus a handle to that store.
#[must_use]
pub fn fresh_workflow() -> (Workflow<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    (Workflow::new(store.clone()), store)
}
