//! Inventory error types.

use common::ProductId;
use thiserror::Error;

/// Errors that can occur during inventory operations.
#[derive(Debug, Clone, Error)]
pub enum InventoryError {
    /// No product exists with the given id.
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: ProductId },

    /// The requested quantity exceeds the available stock.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },
}
