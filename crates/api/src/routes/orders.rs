//! Order endpoints: checkout, queries, cancellation, status progression.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::OrderId;
use domain::{Order, OrderStatus};
use inventory::InventoryLedger;
use serde::{Deserialize, Serialize};
use store::Store;

use crate::error::ApiError;
use crate::routes::AppState;
use crate::routes::carts::parse_user_id;

// -- Request types --

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
    pub total_cents: i64,
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let items = order
            .items()
            .iter()
            .map(|item| OrderItemResponse {
                product_id: item.product_id.to_string(),
                quantity: item.quantity,
                unit_price_cents: item.unit_price.cents(),
                subtotal_cents: item.subtotal.cents(),
            })
            .collect();

        Self {
            id: order.id().to_string(),
            user_id: order.user_id().to_string(),
            status: order.status().to_string(),
            items,
            total_cents: order.total().cents(),
            created_at: order.created_at().to_rfc3339(),
        }
    }
}

// -- Handlers --

/// POST /orders/user/{user_id} — create an order from the user's cart.
#[tracing::instrument(skip(state))]
pub async fn checkout<S: Store + 'static, L: InventoryLedger + 'static>(
    State(state): State<Arc<AppState<S, L>>>,
    Path(user_id): Path<String>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let order = state.checkout.create_order_from_cart(user_id).await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders/user/{user_id} — list a user's orders, newest first.
#[tracing::instrument(skip(state))]
pub async fn list_for_user<S: Store + 'static, L: InventoryLedger + 'static>(
    State(state): State<Arc<AppState<S, L>>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let orders = state.orders.orders_for_user(user_id).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// GET /orders/{order_id} — load an order by id.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store + 'static, L: InventoryLedger + 'static>(
    State(state): State<Arc<AppState<S, L>>>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&order_id)?;
    let order = state.orders.get_order(order_id).await?;
    Ok(Json(order.into()))
}

/// POST /orders/{order_id}/cancel — cancel a pending order.
#[tracing::instrument(skip(state))]
pub async fn cancel<S: Store + 'static, L: InventoryLedger + 'static>(
    State(state): State<Arc<AppState<S, L>>>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&order_id)?;
    let order = state.cancellation.cancel_order(order_id).await?;
    Ok(Json(order.into()))
}

/// PUT /orders/{order_id}/status — advance an order one fulfillment step.
#[tracing::instrument(skip(state, req))]
pub async fn update_status<S: Store + 'static, L: InventoryLedger + 'static>(
    State(state): State<Arc<AppState<S, L>>>,
    Path(order_id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&order_id)?;
    let status: OrderStatus = req
        .status
        .parse()
        .map_err(|e: String| ApiError::BadRequest(e))?;

    let order = state.orders.update_order_status(order_id, status).await?;
    Ok(Json(order.into()))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order id: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}
