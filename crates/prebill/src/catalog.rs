//! Catalog lookup seam.
//!
//! The workflow reads shops and products but never owns them. Prices come
//! from here once, when a line is added, and are not checked again.

use std::collections::HashMap;
use std::future::Future;

use kirana_core::{Product, ProductId, Shop, ShopId};
use thiserror::Error;

/// Errors from a catalog backend.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("backend error: {0}")]
    Backend(String),
}

/// Read-only access to shops and products.
pub trait Catalog: Send + Sync {
    fn shop(&self, id: ShopId) -> impl Future<Output = Result<Option<Shop>, CatalogError>> + Send;

    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, CatalogError>> + Send;
}

/// Catalog held in memory, for tests and seeding checks.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    shops: HashMap<ShopId, Shop>,
    products: HashMap<ProductId, Product>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_shop(mut self, shop: Shop) -> Self {
        self.shops.insert(shop.id, shop);
        self
    }

    #[must_use]
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.insert(product.id, product);
        self
    }
}

impl Catalog for InMemoryCatalog {
    async fn shop(&self, id: ShopId) -> Result<Option<Shop>, CatalogError> {
        Ok(self.shops.get(&id).cloned())
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.products.get(&id).cloned())
    }
}
