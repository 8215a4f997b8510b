//! Workflow coordinator.
//!
//! [`Workflow`] owns one session's cart and packing book along with the
//! store they persist to. It is the only thing the presentation layer calls.
//! Every mutation follows the same pattern:
//!
//! 1. consult the packing status of the shop(s) involved
//! 2. mutate the in-memory cart or book
//! 3. persist the entry that changed
//!
//! A shop whose request is pending or processing is locked: its lines can't
//! be added to, edited, removed or cleared until the request is cancelled
//! (or re-opened with [`Workflow::edit_shop_group`]). That keeps a pending
//! request from pointing at a group that no longer exists.

use kirana_core::{PackingStatus, Price, Product, ProductId, ShopId};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::cart::{Cart, CartLine};
use crate::catalog::Catalog;
use crate::error::{PrebillError, Result};
use crate::grouping::{ShopGroup, groups_by_shop, lines_for_shop};
use crate::packing::PackingBook;
use crate::store::{CART_KEY, KeyValueStore, PACKING_STATUS_KEY, StoreError};

/// The pre-bill: cart grouped by shop, with statuses and a grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreBill {
    pub groups: Vec<ShopGroup>,
    pub grand_total: Price,
}

/// One shop group with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopDetail {
    pub group: ShopGroup,
    pub lines: Vec<CartLine>,
}

/// Session-scoped pre-bill state and the rules over it.
#[derive(Debug)]
pub struct Workflow<S> {
    store: S,
    cart: Cart,
    packing: PackingBook,
}

impl<S: KeyValueStore> Workflow<S> {
    /// Start with an empty cart and no packing requests.
    ///
    /// Nothing is read from `store`; use [`Workflow::load`] to resume a
    /// session.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            cart: Cart::new(),
            packing: PackingBook::new(),
        }
    }

    /// Resume the state persisted in `store`. Missing entries start empty.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store fails or holds undecodable values.
    #[instrument(skip(store))]
    pub async fn load(store: S) -> Result<Self> {
        let cart: Cart = match store.load(CART_KEY).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(StoreError::from)?,
            None => Cart::new(),
        };
        let packing: PackingBook = match store.load(PACKING_STATUS_KEY).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(StoreError::from)?,
            None => PackingBook::new(),
        };

        debug!(lines = cart.len(), "Loaded pre-bill state");
        Ok(Self {
            store,
            cart,
            packing,
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn packing(&self) -> &PackingBook {
        &self.packing
    }

    #[must_use]
    pub fn status(&self, shop: ShopId) -> Option<PackingStatus> {
        self.packing.status(shop)
    }

    /// Shop groups with their packing status, recomputed on each call.
    #[must_use]
    pub fn groups(&self) -> Vec<ShopGroup> {
        groups_by_shop(&self.cart)
            .into_iter()
            .map(|group| {
                let status = self.packing.status(group.shop_id);
                group.with_status(status)
            })
            .collect()
    }

    #[must_use]
    pub fn pre_bill(&self) -> PreBill {
        PreBill {
            groups: self.groups(),
            grand_total: self.cart.grand_total(),
        }
    }

    /// The group and lines for one shop.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the cart has no lines for `shop`.
    pub fn open_shop_detail(&self, shop: ShopId) -> Result<ShopDetail> {
        let group = self
            .groups()
            .into_iter()
            .find(|group| group.shop_id == shop)
            .ok_or_else(|| PrebillError::NotFound(format!("no cart lines for shop {shop}")))?;
        let lines = lines_for_shop(&self.cart, shop)
            .into_iter()
            .cloned()
            .collect();

        Ok(ShopDetail { group, lines })
    }

    // =========================================================================
    // Cart mutations
    // =========================================================================

    /// Add `quantity` units of `product` at its current price.
    ///
    /// Returns `false` for `quantity <= 0`, which changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `OperationBlocked` if the product's shop has an active packing
    /// request, or `Storage` if persisting fails.
    #[instrument(skip(self, product), fields(product_id = %product.id, shop_id = %product.shop_id))]
    pub async fn add(&mut self, product: &Product, quantity: i64) -> Result<bool> {
        if quantity <= 0 {
            return Ok(false);
        }
        self.ensure_unlocked(product.shop_id)?;

        let changed = self.cart.add(product, quantity);
        if changed {
            self.persist_cart().await?;
        }
        Ok(changed)
    }

    /// Look `product_id` up in `catalog` and add it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown product, `InvalidOperation` for one
    /// that is out of stock, plus everything [`Workflow::add`] returns.
    pub async fn add_from_catalog<C: Catalog>(
        &mut self,
        catalog: &C,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<bool> {
        if quantity <= 0 {
            return Ok(false);
        }
        let product = catalog
            .product(product_id)
            .await?
            .ok_or_else(|| PrebillError::NotFound(format!("product {product_id}")))?;
        if !product.available {
            return Err(PrebillError::InvalidOperation(format!(
                "product {product_id} is out of stock"
            )));
        }

        self.add(&product, quantity).await
    }

    /// Set a line's quantity; `quantity <= 0` removes it.
    ///
    /// Returns `false` if the cart has no line for `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `OperationBlocked` if the line's shop is locked.
    #[instrument(skip(self))]
    pub async fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<bool> {
        let Some(shop) = self.cart.line(product_id).map(CartLine::shop_id) else {
            return Ok(false);
        };
        self.ensure_unlocked(shop)?;

        let changed = self.cart.set_quantity(product_id, quantity);
        if changed {
            self.persist_cart().await?;
        }
        Ok(changed)
    }

    /// Remove a line. Removing a missing line is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `OperationBlocked` if the line's shop is locked.
    #[instrument(skip(self))]
    pub async fn remove(&mut self, product_id: ProductId) -> Result<bool> {
        let Some(shop) = self.cart.line(product_id).map(CartLine::shop_id) else {
            return Ok(false);
        };
        self.ensure_unlocked(shop)?;

        self.cart.remove(product_id);
        self.persist_cart().await?;
        Ok(true)
    }

    /// Empty the whole cart.
    ///
    /// # Errors
    ///
    /// Returns `OperationBlocked` naming the first locked shop in the cart.
    #[instrument(skip(self))]
    pub async fn clear_cart(&mut self) -> Result<()> {
        for group in groups_by_shop(&self.cart) {
            self.ensure_unlocked(group.shop_id)?;
        }
        if self.cart.is_empty() {
            return Ok(());
        }

        self.cart.clear();
        self.persist_cart().await
    }

    /// Delete every line belonging to `shop`, returning how many went.
    ///
    /// The shop's packing record, if any, is left as it is; a completed
    /// record outlives the group.
    ///
    /// # Errors
    ///
    /// Returns `OperationBlocked` while the shop's request is pending or
    /// processing. The cart is unchanged in that case.
    #[instrument(skip(self))]
    pub async fn delete_shop_group(&mut self, shop: ShopId) -> Result<usize> {
        self.ensure_unlocked(shop)?;

        let removed = self.cart.remove_shop(shop);
        if removed > 0 {
            self.persist_cart().await?;
        }
        debug!(removed, "Deleted shop group");
        Ok(removed)
    }

    // =========================================================================
    // Packing requests
    // =========================================================================

    /// Ask `shop` to pack its group.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the cart has no lines for `shop` or the
    /// shop is already packing it.
    #[instrument(skip(self))]
    pub async fn request_packing(&mut self, shop: ShopId) -> Result<PackingStatus> {
        let line_count = lines_for_shop(&self.cart, shop).len();
        if self.packing.request(shop, line_count)? {
            self.persist_packing().await?;
        }
        debug!(line_count, "Packing requested");
        Ok(PackingStatus::Pending)
    }

    /// Withdraw a pending request. Returns whether one was withdrawn; with
    /// nothing pending this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if persisting fails.
    #[instrument(skip(self))]
    pub async fn cancel_packing(&mut self, shop: ShopId) -> Result<bool> {
        let cancelled = self.packing.cancel(shop);
        if cancelled {
            self.persist_packing().await?;
        }
        Ok(cancelled)
    }

    /// Re-open a shop group for editing.
    ///
    /// A pending request is cancelled so the lines unlock. Returns whether a
    /// request was cancelled.
    ///
    /// # Errors
    ///
    /// Returns `OperationBlocked` once the shop has started packing.
    #[instrument(skip(self))]
    pub async fn edit_shop_group(&mut self, shop: ShopId) -> Result<bool> {
        if let Some(status @ PackingStatus::Processing) = self.packing.status(shop) {
            return Err(PrebillError::OperationBlocked { shop, status });
        }
        self.cancel_packing(shop).await
    }

    /// Apply a fulfillment signal from the shop owner:
    /// pending → processing → completed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if there is nothing to advance.
    #[instrument(skip(self))]
    pub async fn advance_packing(&mut self, shop: ShopId) -> Result<PackingStatus> {
        let status = self.packing.advance(shop)?;
        self.persist_packing().await?;
        debug!(%status, "Packing advanced");
        Ok(status)
    }

    /// Forget a completed request. Returns whether one was dropped.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if persisting fails.
    #[instrument(skip(self))]
    pub async fn clear_completed(&mut self, shop: ShopId) -> Result<bool> {
        let cleared = self.packing.clear_completed(shop);
        if cleared {
            self.persist_packing().await?;
        }
        Ok(cleared)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_unlocked(&self, shop: ShopId) -> Result<()> {
        match self.packing.status(shop) {
            Some(status) if status.is_active() => {
                Err(PrebillError::OperationBlocked { shop, status })
            }
            _ => Ok(()),
        }
    }

    async fn persist_cart(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.cart).map_err(StoreError::from)?;
        self.store.save(CART_KEY, raw).await?;
        Ok(())
    }

    async fn persist_packing(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.packing).map_err(StoreError::from)?;
        self.store.save(PACKING_STATUS_KEY, raw).await?;
        Ok(())
    }
}
