//! HTTP API server for the storefront.
//!
//! Translates transport requests into the cart, checkout, cancellation,
//! and order operations of the `services` crate and maps their error
//! kinds to HTTP status codes, with structured logging (tracing) and
//! Prometheus metrics. The user id in each route is trusted as given;
//! authentication is an external collaborator.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use inventory::{InMemoryInventory, InventoryLedger};
use metrics_exporter_prometheus::PrometheusHandle;
use services::{CancellationOrchestrator, CartService, CheckoutOrchestrator, OrderService};
use store::{InMemoryStore, Store};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, L>(state: Arc<AppState<S, L>>, metrics_handle: PrometheusHandle) -> Router
where
    S: Store + 'static,
    L: InventoryLedger + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/carts/{user_id}", post(routes::carts::create::<S, L>))
        .route("/carts/{user_id}", get(routes::carts::get::<S, L>))
        .route("/carts/{user_id}", delete(routes::carts::clear::<S, L>))
        .route(
            "/carts/{user_id}/items",
            post(routes::carts::add_item::<S, L>),
        )
        .route(
            "/carts/{user_id}/items/{product_id}",
            put(routes::carts::update_item::<S, L>),
        )
        .route(
            "/carts/{user_id}/items/{product_id}",
            delete(routes::carts::remove_item::<S, L>),
        )
        .route(
            "/orders/user/{user_id}",
            post(routes::orders::checkout::<S, L>),
        )
        .route(
            "/orders/user/{user_id}",
            get(routes::orders::list_for_user::<S, L>),
        )
        .route("/orders/{order_id}", get(routes::orders::get::<S, L>))
        .route(
            "/orders/{order_id}/cancel",
            post(routes::orders::cancel::<S, L>),
        )
        .route(
            "/orders/{order_id}/status",
            put(routes::orders::update_status::<S, L>),
        )
        .route("/products", post(routes::products::create::<S, L>))
        .route("/products", get(routes::products::list::<S, L>))
        .route(
            "/products/{product_id}",
            get(routes::products::get::<S, L>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over in-memory infrastructure.
pub fn create_default_state() -> Arc<AppState<InMemoryStore, InMemoryInventory>> {
    let store = InMemoryStore::new();
    let ledger = InMemoryInventory::new();

    Arc::new(AppState {
        carts: CartService::new(store.clone(), ledger.clone()),
        checkout: CheckoutOrchestrator::new(store.clone(), ledger.clone()),
        cancellation: CancellationOrchestrator::new(store.clone(), ledger.clone()),
        orders: OrderService::new(store),
        ledger,
    })
}
