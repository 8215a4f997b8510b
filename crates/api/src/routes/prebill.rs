//! Pre-bill route handlers.
//!
//! Every handler loads the workflow from the request's session, applies one
//! operation and answers with the refreshed pre-bill. Workflow errors become
//! HTTP statuses through [`AppError`].

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use kirana_core::{ProductId, Shop, ShopId};
use kirana_prebill::{Catalog, PreBill, ShopDetail, Workflow};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::session_store::SessionStore;
use crate::state::AppState;

/// Body of `POST /prebill/items`.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

/// Body of `PUT /prebill/items/{product_id}`.
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

/// One shop group, its lines and the shop's catalog record.
#[derive(Debug, Serialize)]
pub struct ShopDetailResponse {
    /// `None` if the shop has since left the catalog.
    pub shop: Option<Shop>,
    #[serde(flatten)]
    pub detail: ShopDetail,
}

async fn workflow(session: Session) -> Result<Workflow<SessionStore>> {
    Ok(Workflow::load(SessionStore::new(session)).await?)
}

fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn path<T>(id: std::result::Result<Path<T>, PathRejection>) -> Result<T> {
    id.map(|Path(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Show the grouped pre-bill.
#[instrument(skip_all)]
pub async fn show(session: Session) -> Result<Json<PreBill>> {
    let workflow = workflow(session).await?;
    Ok(Json(workflow.pre_bill()))
}

/// Add a catalog product at its current price.
#[instrument(skip_all)]
pub async fn add_item<C: Catalog>(
    State(state): State<AppState<C>>,
    session: Session,
    payload: std::result::Result<Json<AddItemRequest>, JsonRejection>,
) -> Result<Json<PreBill>> {
    let request = body(payload)?;
    let mut workflow = workflow(session).await?;
    workflow
        .add_from_catalog(state.catalog(), request.product_id, request.quantity)
        .await?;
    Ok(Json(workflow.pre_bill()))
}

/// Set a line's quantity; zero or less removes it.
#[instrument(skip_all)]
pub async fn set_quantity(
    product_id: std::result::Result<Path<ProductId>, PathRejection>,
    session: Session,
    payload: std::result::Result<Json<SetQuantityRequest>, JsonRejection>,
) -> Result<Json<PreBill>> {
    let product_id = path(product_id)?;
    let request = body(payload)?;
    let mut workflow = workflow(session).await?;
    workflow.set_quantity(product_id, request.quantity).await?;
    Ok(Json(workflow.pre_bill()))
}

/// Remove one line.
#[instrument(skip_all)]
pub async fn remove_item(
    product_id: std::result::Result<Path<ProductId>, PathRejection>,
    session: Session,
) -> Result<Json<PreBill>> {
    let product_id = path(product_id)?;
    let mut workflow = workflow(session).await?;
    workflow.remove(product_id).await?;
    Ok(Json(workflow.pre_bill()))
}

/// Empty the cart.
#[instrument(skip_all)]
pub async fn clear_items(session: Session) -> Result<Json<PreBill>> {
    let mut workflow = workflow(session).await?;
    workflow.clear_cart().await?;
    Ok(Json(workflow.pre_bill()))
}

/// Show one shop group with its lines.
#[instrument(skip_all)]
pub async fn shop_detail<C: Catalog>(
    State(state): State<AppState<C>>,
    shop_id: std::result::Result<Path<ShopId>, PathRejection>,
    session: Session,
) -> Result<Json<ShopDetailResponse>> {
    let shop_id = path(shop_id)?;
    let workflow = workflow(session).await?;
    let detail = workflow.open_shop_detail(shop_id)?;
    let shop = state.catalog().shop(shop_id).await?;
    Ok(Json(ShopDetailResponse { shop, detail }))
}

/// Delete every line for a shop.
#[instrument(skip_all)]
pub async fn delete_shop(
    shop_id: std::result::Result<Path<ShopId>, PathRejection>,
    session: Session,
) -> Result<Json<PreBill>> {
    let shop_id = path(shop_id)?;
    let mut workflow = workflow(session).await?;
    workflow.delete_shop_group(shop_id).await?;
    Ok(Json(workflow.pre_bill()))
}

/// Ask a shop to pack its group.
#[instrument(skip_all)]
pub async fn request_packing(
    shop_id: std::result::Result<Path<ShopId>, PathRejection>,
    session: Session,
) -> Result<Json<PreBill>> {
    let shop_id = path(shop_id)?;
    let mut workflow = workflow(session).await?;
    workflow.request_packing(shop_id).await?;
    Ok(Json(workflow.pre_bill()))
}

/// Cancel a pending packing request.
#[instrument(skip_all)]
pub async fn cancel_packing(
    shop_id: std::result::Result<Path<ShopId>, PathRejection>,
    session: Session,
) -> Result<Json<PreBill>> {
    let shop_id = path(shop_id)?;
    let mut workflow = workflow(session).await?;
    workflow.cancel_packing(shop_id).await?;
    Ok(Json(workflow.pre_bill()))
}

/// Reopen a shop group for editing.
#[instrument(skip_all)]
pub async fn edit_shop(
    shop_id: std::result::Result<Path<ShopId>, PathRejection>,
    session: Session,
) -> Result<Json<PreBill>> {
    let shop_id = path(shop_id)?;
    let mut workflow = workflow(session).await?;
    workflow.edit_shop_group(shop_id).await?;
    Ok(Json(workflow.pre_bill()))
}
