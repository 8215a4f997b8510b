//! Normalized catalog records.
//!
//! The catalog backend has grown several spellings for the same field over
//! time (`name` and `shop_name`, `image` and `shop_image`). Adapters resolve
//! those once when they build these structs; nothing downstream sees the
//! alternates.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, ShopId};
use super::price::Price;

/// A shop as shown on the pre-bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    /// Display name.
    pub name: String,
    pub address: String,
    pub image_url: Option<String>,
}

/// A product offered by a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub shop_id: ShopId,
    pub name: String,
    /// Current catalog price. The cart snapshots this when a line is added.
    pub price: Price,
    /// Unit the price is quoted in (e.g. "kg", "pack of 6").
    pub unit_label: String,
    /// Whether the shop currently has stock.
    pub available: bool,
}
