//! Property tests for cart arithmetic and shop grouping.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use kirana_core::{Price, ProductId, ShopId};
use kirana_integration_tests::product;
use kirana_prebill::{Cart, groups_by_shop, lines_for_shop};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// One cart operation drawn from a small id space so that merges, removals
/// and shop collisions actually happen.
#[derive(Debug, Clone)]
enum Op {
    Add {
        product: i32,
        shop: i32,
        cents: i64,
        quantity: i64,
    },
    SetQuantity {
        product: i32,
        quantity: i64,
    },
    Remove {
        product: i32,
    },
    RemoveShop {
        shop: i32,
    },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1..12i32, 1..4i32, 0..50_000i64, -3..20i64).prop_map(
            |(product, shop, cents, quantity)| Op::Add { product, shop, cents, quantity }
        ),
        2 => (1..12i32, -5..20i64)
            .prop_map(|(product, quantity)| Op::SetQuantity { product, quantity }),
        1 => (1..12i32).prop_map(|product| Op::Remove { product }),
        1 => (1..4i32).prop_map(|shop| Op::RemoveShop { shop }),
    ]
}

fn build(ops: &[Op]) -> Cart {
    let mut cart = Cart::new();
    for op in ops {
        match *op {
            Op::Add {
                product: id,
                shop,
                cents,
                quantity,
            } => {
                // A product always belongs to the same shop; derive it from the
                // first add so later adds of the same id don't disagree.
                let shop = cart
                    .line(ProductId::new(id))
                    .map_or(ShopId::new(shop), |line| line.shop_id());
                cart.add(&product(id, shop, Decimal::new(cents, 2)), quantity);
            }
            Op::SetQuantity { product, quantity } => {
                cart.set_quantity(ProductId::new(product), quantity);
            }
            Op::Remove { product } => {
                cart.remove(ProductId::new(product));
            }
            Op::RemoveShop { shop } => {
                cart.remove_shop(ShopId::new(shop));
            }
        }
    }
    cart
}

proptest! {
    #[test]
    fn group_totals_sum_to_grand_total(ops in prop::collection::vec(op(), 0..40)) {
        let cart = build(&ops);
        let sum: Price = groups_by_shop(&cart).iter().map(|g| g.total).sum();
        prop_assert_eq!(sum, cart.grand_total());
    }

    #[test]
    fn one_group_per_shop_present(ops in prop::collection::vec(op(), 0..40)) {
        let cart = build(&ops);
        let groups = groups_by_shop(&cart);

        let shops_in_cart: HashSet<ShopId> = cart.lines().iter().map(|l| l.shop_id()).collect();
        let grouped: HashSet<ShopId> = groups.iter().map(|g| g.shop_id).collect();
        prop_assert_eq!(groups.len(), grouped.len());
        prop_assert_eq!(grouped, shops_in_cart);

        for group in &groups {
            prop_assert!(group.line_count >= 1);
            prop_assert_eq!(group.line_count, lines_for_shop(&cart, group.shop_id).len());
        }
    }

    #[test]
    fn lines_unique_and_positive(ops in prop::collection::vec(op(), 0..40)) {
        let cart = build(&ops);
        let ids: HashSet<ProductId> = cart.lines().iter().map(|l| l.product_id()).collect();
        prop_assert_eq!(ids.len(), cart.len());
        prop_assert!(cart.lines().iter().all(|l| l.quantity() >= 1));
    }

    #[test]
    fn repeated_adds_merge(quantities in prop::collection::vec(1..50i64, 1..10)) {
        let mut cart = Cart::new();
        let item = product(1, ShopId::new(1), Decimal::new(250, 2));
        for quantity in &quantities {
            cart.add(&item, *quantity);
        }

        let expected: i64 = quantities.iter().sum();
        prop_assert_eq!(cart.len(), 1);
        prop_assert_eq!(i64::from(cart.line(item.id).unwrap().quantity()), expected);
    }

    #[test]
    fn non_positive_quantity_removes(quantity in i64::MIN..=0i64) {
        let mut cart = Cart::new();
        let item = product(1, ShopId::new(1), Decimal::ONE);
        cart.add(&item, 3);
        prop_assert!(cart.set_quantity(item.id, quantity));
        prop_assert!(cart.is_empty());
    }
}
