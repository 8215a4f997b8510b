//! `PostgreSQL` catalog with an in-memory lookup cache.
//!
//! Shops and products are read through a `moka` cache. Only hits are cached,
//! so a product seeded after a miss shows up on the next lookup.

use std::sync::Arc;
use std::time::Duration;

use kirana_core::{Price, Product, ProductId, Shop, ShopId};
use kirana_prebill::{Catalog, CatalogError};
use moka::future::Cache;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CacheKey {
    Shop(ShopId),
    Product(ProductId),
}

/// Cached catalog record.
#[derive(Debug, Clone)]
enum CacheValue {
    Shop(Shop),
    Product(Product),
}

#[derive(Debug, FromRow)]
struct ShopRow {
    id: ShopId,
    name: String,
    address: String,
    image_url: Option<String>,
}

impl From<ShopRow> for Shop {
    fn from(row: ShopRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            image_url: row.image_url,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: ProductId,
    shop_id: ShopId,
    name: String,
    price: Decimal,
    unit_label: String,
    available: bool,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            shop_id: row.shop_id,
            name: row.name,
            price: Price::new(row.price),
            unit_label: row.unit_label,
            available: row.available,
        }
    }
}

/// Catalog backed by the `catalog` schema.
#[derive(Clone)]
pub struct PgCatalog {
    inner: Arc<PgCatalogInner>,
}

struct PgCatalogInner {
    pool: PgPool,
    cache: Cache<CacheKey, CacheValue>,
}

impl PgCatalog {
    /// Create a catalog reading from `pool`, caching hits for `ttl`.
    #[must_use]
    pub fn new(pool: PgPool, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(PgCatalogInner { pool, cache }),
        }
    }
}

impl Catalog for PgCatalog {
    #[instrument(skip(self))]
    async fn shop(&self, id: ShopId) -> Result<Option<Shop>, CatalogError> {
        let key = CacheKey::Shop(id);
        if let Some(CacheValue::Shop(shop)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for shop");
            return Ok(Some(shop));
        }

        let row = sqlx::query_as::<_, ShopRow>(
            "SELECT id, name, address, image_url FROM catalog.shop WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.inner.pool)
        .await
        .map_err(backend)?;

        let shop = row.map(Shop::from);
        if let Some(shop) = &shop {
            self.inner
                .cache
                .insert(key, CacheValue::Shop(shop.clone()))
                .await;
        }
        Ok(shop)
    }

    #[instrument(skip(self))]
    async fn product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(Some(product));
        }

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, shop_id, name, price, unit_label, available
            FROM catalog.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.inner.pool)
        .await
        .map_err(backend)?;

        let product = row.map(Product::from);
        if let Some(product) = &product {
            self.inner
                .cache
                .insert(key, CacheValue::Product(product.clone()))
                .await;
        }
        Ok(product)
    }
}

fn backend(err: sqlx::Error) -> CatalogError {
    CatalogError::Backend(err.to_string())
}
