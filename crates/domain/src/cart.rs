//! Cart aggregate.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use common::{Money, ProductId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by cart mutations.
#[derive(Debug, Clone, Error)]
pub enum CartError {
    /// Quantity must be greater than zero.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// No line item exists for the given product.
    #[error("Item not found in cart: {product_id}")]
    ItemNotFound { product_id: ProductId },
}

/// A line item in a cart.
///
/// `unit_price` is captured when the product is first added and is kept
/// on later quantity changes, so it may diverge from the product's
/// current price until checkout snapshots it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
    pub subtotal: Money,
}

impl CartLineItem {
    fn new(product_id: ProductId, unit_price: Money, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
            subtotal: unit_price * quantity,
        }
    }

    fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.subtotal = self.unit_price * quantity;
    }
}

/// A user's shopping cart.
///
/// Line items are indexed by product id — at most one per product — and
/// kept in ascending product-id order, which is also the order checkout
/// reserves stock in. The total is re-derived from scratch after every
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    user_id: UserId,
    items: BTreeMap<ProductId, CartLineItem>,
    total: Money,
}

impl Cart {
    /// Creates an empty cart for a user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            items: BTreeMap::new(),
            total: Money::zero(),
        }
    }

    /// Returns the owning user's id.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the line items in ascending product-id order.
    pub fn items(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.values()
    }

    /// Returns the line item for a product, if present.
    pub fn line_item(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.get(product_id)
    }

    /// Returns the number of line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the cart total.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Adds `quantity` units of a product.
    ///
    /// If a line item for the product already exists its quantity grows
    /// by `quantity` and the subtotal is recomputed with the originally
    /// captured unit price; otherwise a new line item captures
    /// `unit_price`.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        unit_price: Money,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }

        match self.items.entry(product_id) {
            Entry::Occupied(mut entry) => {
                let item = entry.get_mut();
                let merged = item.quantity + quantity;
                item.set_quantity(merged);
            }
            Entry::Vacant(entry) => {
                let item = CartLineItem::new(entry.key().clone(), unit_price, quantity);
                entry.insert(item);
            }
        }

        self.recompute_total();
        Ok(())
    }

    /// Overwrites the quantity of an existing line item, keeping its
    /// captured unit price.
    pub fn set_item_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }

        let item = self
            .items
            .get_mut(product_id)
            .ok_or_else(|| CartError::ItemNotFound {
                product_id: product_id.clone(),
            })?;

        item.set_quantity(quantity);
        self.recompute_total();
        Ok(())
    }

    /// Removes the line item for a product. Removing an absent product
    /// is a no-op.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        if self.items.remove(product_id).is_some() {
            self.recompute_total();
        }
    }

    /// Removes all line items and resets the total to zero.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Money::zero();
    }

    fn recompute_total(&mut self) {
        self.total = self.items.values().map(|item| item.subtotal).sum();
    }
}
