//! Cart aggregate.
//!
//! A cart is an ordered list of lines, unique by product. Each line carries
//! the shop it belongs to and the unit price seen when it was first added;
//! later quantity changes reuse that stored price even if the catalog has
//! moved on.
//!
//! The aggregate does no I/O. [`Workflow`](crate::Workflow) persists it
//! after each mutation.

use kirana_core::{Price, Product, ProductId, ShopId};
use serde::{Deserialize, Serialize};

/// One product in the cart.
///
/// Invariant: `quantity >= 1`. Lines that would drop to zero are removed
/// instead of stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    product_id: ProductId,
    shop_id: ShopId,
    quantity: u32,
    unit_price: Price,
}

impl CartLine {
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product_id
    }

    #[must_use]
    pub const fn shop_id(&self) -> ShopId {
        self.shop_id
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price captured when the line was created.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// `quantity × unit_price`.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// The customer's cart for one session.
///
/// Serializes as a plain sequence of lines. Deserializing normalizes the
/// sequence: duplicate products are merged into the first occurrence and
/// zero-quantity lines are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` units of `product`.
    ///
    /// Returns `false` without touching the cart when `quantity <= 0`.
    /// Quantities beyond `u32::MAX` saturate.
    pub fn add(&mut self, product: &Product, quantity: i64) -> bool {
        let Some(quantity) = positive(quantity) else {
            return false;
        };

        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                product_id: product.id,
                shop_id: product.shop_id,
                quantity,
                unit_price: product.price,
            });
        }
        true
    }

    /// Set the quantity of an existing line.
    ///
    /// `quantity <= 0` removes the line. Returns `false` if no line exists
    /// for `product_id`.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        match positive(quantity) {
            None => self.remove(product_id),
            Some(quantity) => match self.line_mut(product_id) {
                Some(line) => {
                    line.quantity = quantity;
                    true
                }
                None => false,
            },
        }
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != before
    }

    /// Remove every line belonging to `shop_id`, returning how many went.
    pub fn remove_shop(&mut self, shop_id: ShopId) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| line.shop_id != shop_id);
        before - self.lines.len()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of every line subtotal; zero for an empty cart.
    #[must_use]
    pub fn grand_total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines.into_iter().filter(|line| line.quantity > 0) {
            if let Some(existing) = cart.line_mut(line.product_id) {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            } else {
                cart.lines.push(line);
            }
        }
        cart
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

/// Clamp a caller-supplied quantity into the stored range.
fn positive(quantity: i64) -> Option<u32> {
    if quantity <= 0 {
        return None;
    }
    Some(u32::try_from(quantity).unwrap_or(u32::MAX))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    fn product(id: i32, shop: i32, price: Price) -> Product {
        Product {
            id: ProductId::new(id),
            shop_id: ShopId::new(shop),
            name: format!("product-{id}"),
            price,
            unit_label: "piece".to_string(),
            available: true,
        }
    }

    #[test]
    fn test_add_creates_line_with_snapshot_price() {
        let mut cart = Cart::new();
        assert!(cart.add(&product(1, 1, Price::new(dec!(100))), 2));

        let line = cart.line(ProductId::new(1)).unwrap();
        assert_eq!(line.quantity(), 2);
        assert_eq!(line.shop_id(), ShopId::new(1));
        assert_eq!(line.subtotal(), Price::new(dec!(200)));
        assert_eq!(cart.grand_total(), Price::new(dec!(200)));
    }

    #[test]
    fn test_add_existing_keeps_stored_price() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1, Price::new(dec!(10))), 1);
        // Catalog price changed after the first add
        cart.add(&product(1, 1, Price::new(dec!(99))), 2);

        assert_eq!(cart.len(), 1);
        let line = cart.line(ProductId::new(1)).unwrap();
        assert_eq!(line.quantity(), 3);
        assert_eq!(line.unit_price(), Price::new(dec!(10)));
        assert_eq!(cart.grand_total(), Price::new(dec!(30)));
    }

    #[test]
    fn test_huge_price_total_saturates() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1, Price::new(Decimal::MAX / dec!(2))), 3);
        cart.add(&product(2, 1, Price::new(dec!(1))), 1);

        let line = cart.line(ProductId::new(1)).unwrap();
        assert_eq!(line.subtotal(), Price::new(Decimal::MAX));
        assert_eq!(cart.grand_total(), Price::new(Decimal::MAX));
    }

    #[test]
    fn test_add_non_positive_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.add(&product(1, 1, Price::new(dec!(10))), 0));
        assert!(!cart.add(&product(1, 1, Price::new(dec!(10))), -3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_saturates_large_quantities() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1, Price::new(dec!(1))), i64::MAX);
        cart.add(&product(1, 1, Price::new(dec!(1))), 5);
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity(), u32::MAX);
    }

    #[test]
    fn test_set_quantity_updates_and_removes() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1, Price::new(dec!(5))), 1);
        cart.add(&product(2, 1, Price::new(dec!(5))), 1);

        assert!(cart.set_quantity(ProductId::new(1), 4));
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity(), 4);

        assert!(cart.set_quantity(ProductId::new(1), 0));
        assert!(cart.line(ProductId::new(1)).is_none());

        assert!(cart.set_quantity(ProductId::new(2), -5));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_missing_line() {
        let mut cart = Cart::new();
        assert!(!cart.set_quantity(ProductId::new(8), 3));
        assert!(!cart.set_quantity(ProductId::new(8), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1, Price::new(dec!(5))), 1);
        assert!(cart.remove(ProductId::new(1)));
        assert!(!cart.remove(ProductId::new(1)));
    }

    #[test]
    fn test_remove_shop_cascades() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1, Price::new(dec!(5))), 1);
        cart.add(&product(2, 2, Price::new(dec!(5))), 1);
        cart.add(&product(3, 1, Price::new(dec!(5))), 1);

        assert_eq!(cart.remove_shop(ShopId::new(1)), 2);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].product_id(), ProductId::new(2));
        assert_eq!(cart.remove_shop(ShopId::new(1)), 0);
    }

    #[test]
    fn test_clear_and_empty_total() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1, Price::new(dec!(5))), 3);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.grand_total(), Price::ZERO);
    }

    #[test]
    fn test_serializes_as_sequence() {
        let mut cart = Cart::new();
        cart.add(&product(1, 4, Price::new(dec!(2.50))), 2);

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"product_id": 1, "shop_id": 4, "quantity": 2, "unit_price": "2.50"}
            ])
        );
    }

    #[test]
    fn test_deserialize_normalizes_lines() {
        let json = r#"[
            {"product_id": 1, "shop_id": 4, "quantity": 2, "unit_price": "2.50"},
            {"product_id": 2, "shop_id": 4, "quantity": 0, "unit_price": "1.00"},
            {"product_id": 1, "shop_id": 4, "quantity": 3, "unit_price": "9.99"}
        ]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(cart.len(), 1);
        let line = cart.line(ProductId::new(1)).unwrap();
        assert_eq!(line.quantity(), 5);
        assert_eq!(line.unit_price(), Price::new(dec!(2.50)));
    }
}
