//! Service error types.

use common::{OrderId, UserId};
use domain::{CartError, OrderError};
use inventory::InventoryError;
use store::StoreError;
use thiserror::Error;

/// Errors surfaced by the application services.
///
/// All variants except `Store` are deterministic, caller-correctable
/// business conditions. `Store` carries infrastructure failures, which
/// are distinct from every business rule.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No cart exists for the given user.
    #[error("Cart not found for user: {user_id}")]
    CartNotFound { user_id: UserId },

    /// Checkout was attempted on a cart with no line items.
    #[error("Cannot create order from empty cart for user: {user_id}")]
    EmptyCart { user_id: UserId },

    /// No order exists with the given id.
    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: OrderId },

    /// Cart aggregate error.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Order aggregate error.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Inventory ledger error.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Persistence failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
