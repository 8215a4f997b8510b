//! Per-shop views over a cart.
//!
//! Groups are recomputed from the cart on every call and never cached, so a
//! view can't drift from the lines it summarizes.

use std::collections::HashMap;

use kirana_core::{PackingStatus, Price, ShopId};
use serde::Serialize;

use crate::cart::{Cart, CartLine};

/// The slice of a cart that belongs to one shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopGroup {
    pub shop_id: ShopId,
    /// Number of distinct lines, not units.
    pub line_count: usize,
    /// Sum of the group's line subtotals.
    pub total: Price,
    /// Packing request status; `None` when no request exists.
    pub status: Option<PackingStatus>,
}

impl ShopGroup {
    /// Attach a packing status to the group.
    #[must_use]
    pub fn with_status(mut self, status: Option<PackingStatus>) -> Self {
        self.status = status;
        self
    }
}

/// One group per distinct shop in `cart`, in the order each shop first
/// appears. The status of every returned group is `None`.
#[must_use]
pub fn groups_by_shop(cart: &Cart) -> Vec<ShopGroup> {
    let mut groups: Vec<ShopGroup> = Vec::new();
    let mut index: HashMap<ShopId, usize> = HashMap::new();

    for line in cart.lines() {
        let slot = *index.entry(line.shop_id()).or_insert_with(|| {
            groups.push(ShopGroup {
                shop_id: line.shop_id(),
                line_count: 0,
                total: Price::ZERO,
                status: None,
            });
            groups.len() - 1
        });

        if let Some(group) = groups.get_mut(slot) {
            group.line_count += 1;
            group.total = group.total + line.subtotal();
        }
    }

    groups
}

/// Lines of `cart` that belong to `shop_id`, in insertion order.
#[must_use]
pub fn lines_for_shop(cart: &Cart, shop_id: ShopId) -> Vec<&CartLine> {
    cart.lines()
        .iter()
        .filter(|line| line.shop_id() == shop_id)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use kirana_core::{Product, ProductId};
    use rust_decimal_macros::dec;

    use super::*;

    fn add(cart: &mut Cart, id: i32, shop: i32, price: Price, quantity: i64) {
        cart.add(
            &Product {
                id: ProductId::new(id),
                shop_id: ShopId::new(shop),
                name: format!("product-{id}"),
                price,
                unit_label: "piece".to_string(),
                available: true,
            },
            quantity,
        );
    }

    #[test]
    fn test_empty_cart_has_no_groups() {
        assert!(groups_by_shop(&Cart::new()).is_empty());
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let mut cart = Cart::new();
        add(&mut cart, 1, 20, Price::new(dec!(10)), 1);
        add(&mut cart, 2, 10, Price::new(dec!(5)), 2);
        add(&mut cart, 3, 20, Price::new(dec!(1.5)), 2);

        let groups = groups_by_shop(&cart);
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].shop_id, ShopId::new(20));
        assert_eq!(groups[0].line_count, 2);
        assert_eq!(groups[0].total, Price::new(dec!(13)));

        assert_eq!(groups[1].shop_id, ShopId::new(10));
        assert_eq!(groups[1].line_count, 1);
        assert_eq!(groups[1].total, Price::new(dec!(10)));

        assert!(groups.iter().all(|g| g.status.is_none()));
    }

    #[test]
    fn test_group_totals_sum_to_grand_total() {
        let mut cart = Cart::new();
        add(&mut cart, 1, 1, Price::new(dec!(19.99)), 3);
        add(&mut cart, 2, 2, Price::new(dec!(0.01)), 7);
        add(&mut cart, 3, 1, Price::new(dec!(4)), 1);

        let sum: Price = groups_by_shop(&cart).iter().map(|g| g.total).sum();
        assert_eq!(sum, cart.grand_total());
    }

    #[test]
    fn test_group_disappears_with_last_line() {
        let mut cart = Cart::new();
        add(&mut cart, 1, 1, Price::new(dec!(1)), 1);
        add(&mut cart, 2, 2, Price::new(dec!(1)), 1);
        cart.remove(ProductId::new(1));

        let groups = groups_by_shop(&cart);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].shop_id, ShopId::new(2));
    }

    #[test]
    fn test_lines_for_shop_in_insertion_order() {
        let mut cart = Cart::new();
        add(&mut cart, 5, 1, Price::new(dec!(1)), 1);
        add(&mut cart, 6, 2, Price::new(dec!(1)), 1);
        add(&mut cart, 7, 1, Price::new(dec!(1)), 1);

        let ids: Vec<_> = lines_for_shop(&cart, ShopId::new(1))
            .iter()
            .map(|line| line.product_id().as_i32())
            .collect();
        assert_eq!(ids, vec![5, 7]);
        assert!(lines_for_shop(&cart, ShopId::new(3)).is_empty());
    }

    #[test]
    fn test_with_status() {
        let mut cart = Cart::new();
        add(&mut cart, 1, 1, Price::new(dec!(1)), 1);
        let group = groups_by_shop(&cart)
            .remove(0)
            .with_status(Some(PackingStatus::Pending));
        assert_eq!(group.status, Some(PackingStatus::Pending));
    }
}
