//! Cart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{ProductId, UserId};
use domain::Cart;
use inventory::InventoryLedger;
use serde::{Deserialize, Serialize};
use store::Store;

use crate::error::ApiError;
use crate::routes::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct CartItemResponse {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

#[derive(Serialize)]
pub struct CartResponse {
    pub user_id: String,
    pub items: Vec<CartItemResponse>,
    pub total_cents: i64,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let items = cart
            .items()
            .map(|item| CartItemResponse {
                product_id: item.product_id.to_string(),
                quantity: item.quantity,
                unit_price_cents: item.unit_price.cents(),
                subtotal_cents: item.subtotal.cents(),
            })
            .collect();

        Self {
            user_id: cart.user_id().to_string(),
            items,
            total_cents: cart.total().cents(),
        }
    }
}

// -- Handlers --

/// POST /carts/{user_id} — provision a cart for a user.
#[tracing::instrument(skip(state))]
pub async fn create<S: Store + 'static, L: InventoryLedger + 'static>(
    State(state): State<Arc<AppState<S, L>>>,
    Path(user_id): Path<String>,
) -> Result<(StatusCode, Json<CartResponse>), ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let cart = state.carts.create_cart(user_id).await?;
    Ok((StatusCode::CREATED, Json(cart.into())))
}

/// GET /carts/{user_id} — return the user's cart.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store + 'static, L: InventoryLedger + 'static>(
    State(state): State<Arc<AppState<S, L>>>,
    Path(user_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let cart = state.carts.get_cart(user_id).await?;
    Ok(Json(cart.into()))
}

/// POST /carts/{user_id}/items — add a product to the cart.
#[tracing::instrument(skip(state, req))]
pub async fn add_item<S: Store + 'static, L: InventoryLedger + 'static>(
    State(state): State<Arc<AppState<S, L>>>,
    Path(user_id): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let cart = state
        .carts
        .add_item(user_id, ProductId::new(req.product_id), req.quantity)
        .await?;
    Ok(Json(cart.into()))
}

/// PUT /carts/{user_id}/items/{product_id} — overwrite a line item's quantity.
#[tracing::instrument(skip(state, req))]
pub async fn update_item<S: Store + 'static, L: InventoryLedger + 'static>(
    State(state): State<Arc<AppState<S, L>>>,
    Path((user_id, product_id)): Path<(String, String)>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let cart = state
        .carts
        .update_item_quantity(user_id, ProductId::new(product_id), req.quantity)
        .await?;
    Ok(Json(cart.into()))
}

/// DELETE /carts/{user_id}/items/{product_id} — remove a line item.
#[tracing::instrument(skip(state))]
pub async fn remove_item<S: Store + 'static, L: InventoryLedger + 'static>(
    State(state): State<Arc<AppState<S, L>>>,
    Path((user_id, product_id)): Path<(String, String)>,
) -> Result<Json<CartResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let cart = state
        .carts
        .remove_item(user_id, ProductId::new(product_id))
        .await?;
    Ok(Json(cart.into()))
}

/// DELETE /carts/{user_id} — empty the cart.
#[tracing::instrument(skip(state))]
pub async fn clear<S: Store + 'static, L: InventoryLedger + 'static>(
    State(state): State<Arc<AppState<S, L>>>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    state.carts.clear_cart(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn parse_user_id(id: &str) -> Result<UserId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid user id: {e}")))?;
    Ok(UserId::from_uuid(uuid))
}
