//! Seed the catalog schema from a YAML file.
//!
//! The file lists shops and the products they sell:
//!
//! ```yaml
//! shops:
//!   - id: 1
//!     name: Sharma General Store
//!     address: 14 MG Road
//! products:
//!   - id: 100
//!     shop_id: 1
//!     name: Basmati rice
//!     price: "120.00"
//!     unit_label: kg
//! ```
//!
//! Rows are upserted by id, so re-running a file updates names and prices
//! in place. The whole file is validated before the database is touched.

use std::collections::HashSet;
use std::path::Path;

use kirana_core::{Price, Product, ProductId, Shop, ShopId};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{error, info};

use super::{CommandError, database_url};

/// Parsed contents of a catalog seed file.
#[derive(Debug, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub shops: Vec<SeedShop>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

#[derive(Debug, Deserialize)]
pub struct SeedShop {
    pub id: ShopId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub id: ProductId,
    pub shop_id: ShopId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub unit_label: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

impl From<SeedShop> for Shop {
    fn from(seed: SeedShop) -> Self {
        Self {
            id: seed.id,
            name: seed.name,
            address: seed.address,
            image_url: seed.image_url,
        }
    }
}

impl From<SeedProduct> for Product {
    fn from(seed: SeedProduct) -> Self {
        Self {
            id: seed.id,
            shop_id: seed.shop_id,
            name: seed.name,
            price: seed.price,
            unit_label: seed.unit_label,
            available: seed.available,
        }
    }
}

/// Check a seed file for problems, returning one message per problem.
#[must_use]
pub fn validate(seed: &CatalogSeed) -> Vec<String> {
    let mut errors = Vec::new();

    let mut shop_ids = HashSet::new();
    for shop in &seed.shops {
        if !shop_ids.insert(shop.id) {
            errors.push(format!("shop {} is listed more than once", shop.id));
        }
        if shop.name.trim().is_empty() {
            errors.push(format!("shop {} has no name", shop.id));
        }
    }

    let mut product_ids = HashSet::new();
    for product in &seed.products {
        if !product_ids.insert(product.id) {
            errors.push(format!("product {} is listed more than once", product.id));
        }
        if !shop_ids.contains(&product.shop_id) {
            errors.push(format!(
                "product {} references shop {} which is not in the file",
                product.id, product.shop_id
            ));
        }
        if product.price.is_negative() {
            errors.push(format!("product {} has a negative price", product.id));
        }
    }

    errors
}

/// Seed shops and products from `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or the database write fails.
pub async fn catalog(file_path: &str) -> Result<(), CommandError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading catalog from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let seed: CatalogSeed = serde_yaml::from_str(&content)?;
    info!(
        shops = seed.shops.len(),
        products = seed.products.len(),
        "Parsed catalog"
    );

    let errors = validate(&seed);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(CommandError::Validation(errors.len()));
    }

    let database_url = database_url()?;
    let pool = kirana_api::db::create_pool(&database_url).await?;
    info!("Connected to database");

    let shops: Vec<Shop> = seed.shops.into_iter().map(Shop::from).collect();
    let products: Vec<Product> = seed.products.into_iter().map(Product::from).collect();
    upsert(&pool, &shops, &products).await?;

    info!("Seeding complete!");
    info!("  Shops upserted: {}", shops.len());
    info!("  Products upserted: {}", products.len());
    Ok(())
}

/// Write every shop, then every product, in one transaction.
async fn upsert(pool: &PgPool, shops: &[Shop], products: &[Product]) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for shop in shops {
        sqlx::query(
            r"
            INSERT INTO catalog.shop (id, name, address, image_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                address = EXCLUDED.address,
                image_url = EXCLUDED.image_url
            ",
        )
        .bind(shop.id)
        .bind(&shop.name)
        .bind(&shop.address)
        .bind(&shop.image_url)
        .execute(&mut *tx)
        .await?;
    }

    for product in products {
        sqlx::query(
            r"
            INSERT INTO catalog.product (id, shop_id, name, price, unit_label, available)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET shop_id = EXCLUDED.shop_id,
                name = EXCLUDED.name,
                price = EXCLUDED.price,
                unit_label = EXCLUDED.unit_label,
                available = EXCLUDED.available
            ",
        )
        .bind(product.id)
        .bind(product.shop_id)
        .bind(&product.name)
        .bind(product.price.amount())
        .bind(&product.unit_label)
        .bind(product.available)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    const SEED: &str = r#"
shops:
  - id: 1
    name: Sharma General Store
    address: 14 MG Road
  - id: 2
    name: Fresh Greens
    image_url: https://cdn.example/greens.png
products:
  - id: 100
    shop_id: 1
    name: Basmati rice
    price: "120.00"
    unit_label: kg
  - id: 200
    shop_id: 2
    name: Spinach
    price: "30"
    available: false
"#;

    #[test]
    fn test_parse_applies_defaults() {
        let seed: CatalogSeed = serde_yaml::from_str(SEED).unwrap();
        assert_eq!(seed.shops.len(), 2);
        assert_eq!(seed.shops[1].address, "");
        assert!(seed.products[0].available);
        assert!(!seed.products[1].available);

        let product = Product::from(seed.products.into_iter().next().unwrap());
        assert_eq!(product.price, Price::new(dec!(120.00)));
        assert_eq!(product.unit_label, "kg");
    }

    #[test]
    fn test_valid_seed_has_no_errors() {
        let seed: CatalogSeed = serde_yaml::from_str(SEED).unwrap();
        assert!(validate(&seed).is_empty());
    }

    #[test]
    fn test_validate_reports_each_problem() {
        let seed: CatalogSeed = serde_yaml::from_str(
            r#"
shops:
  - id: 1
    name: Corner Shop
  - id: 1
    name: "  "
products:
  - id: 10
    shop_id: 9
    name: Sugar
    price: "-4"
"#,
        )
        .unwrap();

        let errors = validate(&seed);
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("shop 1 is listed more than once")));
        assert!(errors.iter().any(|e| e.contains("shop 1 has no name")));
        assert!(errors.iter().any(|e| e.contains("which is not in the file")));
        assert!(errors.iter().any(|e| e.contains("negative price")));
    }

    #[test]
    fn test_empty_file_sections_default() {
        let seed: CatalogSeed = serde_yaml::from_str("shops: []").unwrap();
        assert!(seed.products.is_empty());
        assert!(validate(&seed).is_empty());
    }
}
