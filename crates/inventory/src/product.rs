//! Product record owned by the inventory ledger.

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// A product in the catalog.
///
/// `stock` is only ever changed through the ledger's `reserve` and
/// `release` operations; cart and order logic read it but never write it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// The product identifier (SKU).
    pub id: ProductId,

    /// Human-readable product name.
    pub name: String,

    /// Current unit price.
    pub price: Money,

    /// Units currently available.
    pub stock: u32,
}

impl Product {
    /// Creates a new product record.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            stock,
        }
    }

    /// Returns true if any units are in stock.
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }
}
