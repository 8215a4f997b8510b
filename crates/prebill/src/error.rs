//! Errors returned by the pre-bill workflow.

use kirana_core::{PackingStatus, ShopId};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::store::StoreError;

/// Error type for every workflow operation.
///
/// All errors are synchronous return values; nothing is retried.
#[derive(Debug, Error)]
pub enum PrebillError {
    /// The operation makes no sense for the current state, such as asking
    /// a shop to pack an empty group.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The shop group is locked by an active packing request.
    #[error("shop {shop} has a {status} packing request; cancel it first")]
    OperationBlocked { shop: ShopId, status: PackingStatus },

    /// An explicit lookup found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// Persisting or loading workflow state failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Catalog lookup failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type alias for `PrebillError`.
pub type Result<T> = std::result::Result<T, PrebillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_message_names_shop_and_status() {
        let err = PrebillError::OperationBlocked {
            shop: ShopId::new(3),
            status: PackingStatus::Processing,
        };
        assert_eq!(
            err.to_string(),
            "shop 3 has a processing packing request; cancel it first"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = PrebillError::NotFound("shop 9".to_string());
        assert_eq!(err.to_string(), "not found: shop 9");
    }
}
