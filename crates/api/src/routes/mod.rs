//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness check
//! GET    /health/ready                    - Readiness check (database)
//!
//! # Pre-bill (session scoped)
//! GET    /prebill                         - Grouped pre-bill with statuses
//! POST   /prebill/items                   - Add a catalog product
//! DELETE /prebill/items                   - Clear the cart
//! PUT    /prebill/items/{product_id}      - Set a line's quantity
//! DELETE /prebill/items/{product_id}      - Remove a line
//! GET    /prebill/shops/{shop_id}         - One shop group with its lines
//! DELETE /prebill/shops/{shop_id}         - Delete a shop group
//! POST   /prebill/shops/{shop_id}/packing - Ask the shop to pack
//! DELETE /prebill/shops/{shop_id}/packing - Cancel a packing request
//! POST   /prebill/shops/{shop_id}/edit    - Reopen a group for editing
//! ```

pub mod prebill;

use axum::{
    Router,
    routing::{get, post, put},
};
use kirana_prebill::Catalog;

use crate::state::AppState;

/// Build the complete API router over any catalog.
pub fn routes<C>() -> Router<AppState<C>>
where
    C: Catalog + 'static,
{
    Router::new().nest("/prebill", prebill_routes())
}

fn prebill_routes<C>() -> Router<AppState<C>>
where
    C: Catalog + 'static,
{
    Router::new()
        .route("/", get(prebill::show))
        .route(
            "/items",
            post(prebill::add_item::<C>).delete(prebill::clear_items),
        )
        .route(
            "/items/{product_id}",
            put(prebill::set_quantity).delete(prebill::remove_item),
        )
        .route(
            "/shops/{shop_id}",
            get(prebill::shop_detail::<C>).delete(prebill::delete_shop),
        )
        .route(
            "/shops/{shop_id}/packing",
            post(prebill::request_packing).delete(prebill::cancel_packing),
        )
        .route("/shops/{shop_id}/edit", post(prebill::edit_shop))
}
