//! Packing status machine.
//!
//! One record per shop, independent of what the cart currently holds. The
//! customer drives `request` and `cancel`; `advance` is the signal coming back
//! from the shop owner as they pick up and finish the order.
//!
//! | From       | Event   | To         |
//! |------------|---------|------------|
//! | (absent)   | request | Pending    |
//! | Completed  | request | Pending    |
//! | Pending    | cancel  | (absent)   |
//! | Pending    | advance | Processing |
//! | Processing | advance | Completed  |
//! | Completed  | clear   | (absent)   |
//!
//! Anything else is either a no-op (repeat request, cancel without a pending
//! record) or `InvalidOperation`.

use std::collections::BTreeMap;

use kirana_core::{PackingStatus, ShopId};
use serde::{Deserialize, Serialize};

use crate::error::{PrebillError, Result};

/// Packing request status per shop.
///
/// Serializes as a map from shop id to status. A shop missing from the map
/// has no request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackingBook {
    statuses: BTreeMap<ShopId, PackingStatus>,
}

impl PackingBook {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            statuses: BTreeMap::new(),
        }
    }

    /// Current status, `None` when the shop has no request.
    #[must_use]
    pub fn status(&self, shop: ShopId) -> Option<PackingStatus> {
        self.statuses.get(&shop).copied()
    }

    /// Ask `shop` to pack a group of `line_count` lines.
    ///
    /// Returns whether the book changed; a repeat request while pending is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the group is empty or the shop is
    /// already packing.
    pub fn request(&mut self, shop: ShopId, line_count: usize) -> Result<bool> {
        if line_count == 0 {
            return Err(PrebillError::InvalidOperation(format!(
                "shop {shop} has nothing to pack"
            )));
        }

        match self.status(shop) {
            Some(PackingStatus::Pending) => Ok(false),
            Some(PackingStatus::Processing) => Err(PrebillError::InvalidOperation(format!(
                "shop {shop} is already packing this order"
            ))),
            None | Some(PackingStatus::Completed) => {
                self.statuses.insert(shop, PackingStatus::Pending);
                Ok(true)
            }
        }
    }

    /// Withdraw a pending request.
    ///
    /// Only a pending record is removed. Returns whether one was.
    pub fn cancel(&mut self, shop: ShopId) -> bool {
        if self.status(shop) == Some(PackingStatus::Pending) {
            self.statuses.remove(&shop);
            return true;
        }
        false
    }

    /// Apply the shop owner's next fulfillment step.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if there is no request to advance or the
    /// request is already completed.
    pub fn advance(&mut self, shop: ShopId) -> Result<PackingStatus> {
        let next = self
            .status(shop)
            .and_then(PackingStatus::next)
            .ok_or_else(|| {
                PrebillError::InvalidOperation(format!(
                    "shop {shop} has no packing request to advance"
                ))
            })?;
        self.statuses.insert(shop, next);
        Ok(next)
    }

    /// Drop a completed record. Returns whether one was dropped.
    pub fn clear_completed(&mut self, shop: ShopId) -> bool {
        if self.status(shop) == Some(PackingStatus::Completed) {
            self.statuses.remove(&shop);
            return true;
        }
        false
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
