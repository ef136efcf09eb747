//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{Money, ProductId};
use inventory::{InventoryLedger, Product};
use serde::{Deserialize, Serialize};
use store::Store;

use crate::error::ApiError;
use crate::routes::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub stock: u32,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub search: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub stock: u32,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name,
            price_cents: product.price.cents(),
            stock: product.stock,
        }
    }
}

// -- Handlers --

/// POST /products — insert or replace a product record.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Store + 'static, L: InventoryLedger + 'static>(
    State(state): State<Arc<AppState<S, L>>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    if req.price_cents < 0 {
        return Err(ApiError::BadRequest(format!(
            "Invalid price: {}",
            req.price_cents
        )));
    }

    let product = Product::new(
        req.id.as_str(),
        req.name,
        Money::from_cents(req.price_cents),
        req.stock,
    );
    state
        .ledger
        .put(product.clone())
        .await
        .map_err(services::ServiceError::from)?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// GET /products — list available products, or search by name.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store + 'static, L: InventoryLedger + 'static>(
    State(state): State<Arc<AppState<S, L>>>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = match query.search {
        Some(ref name) => state.ledger.search(name).await,
        None => state.ledger.available().await,
    }
    .map_err(services::ServiceError::from)?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /products/{product_id} — look up one product.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store + 'static, L: InventoryLedger + 'static>(
    State(state): State<Arc<AppState<S, L>>>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .ledger
        .lookup(&ProductId::new(product_id))
        .await
        .map_err(services::ServiceError::from)?;
    Ok(Json(product.into()))
}
