//! Order aggregate.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::status::OrderStatus;

/// Errors raised by order state transitions.
#[derive(Debug, Clone, Error)]
pub enum OrderError {
    /// The requested transition is not legal from the current status.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: OrderStatus, to: OrderStatus },
}

/// An immutable snapshot of a cart line item taken at checkout.
///
/// Fields are frozen at creation; the struct hands out no mutable access
/// after the order is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// An order created from a cart at checkout.
///
/// Line items and total are a snapshot of the cart at conversion time;
/// only `status` changes afterwards, and only through [`Order::cancel`]
/// or [`Order::progress_to`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    items: Vec<OrderLineItem>,
    total: Money,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Snapshots a cart into a new `Pending` order.
    ///
    /// Line items are copied in the cart's ascending product-id order and
    /// the total is taken from the cart as-is.
    pub fn from_cart(id: OrderId, cart: &Cart) -> Self {
        let items = cart
            .items()
            .map(|item| OrderLineItem {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                subtotal: item.subtotal,
            })
            .collect();

        Self {
            id,
            user_id: cart.user_id(),
            items,
            total: cart.total(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Returns the order id.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Returns the id of the user who placed the order.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the snapshotted line items.
    pub fn items(&self) -> &[OrderLineItem] {
        &self.items
    }

    /// Returns the order total.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Transitions the order to `Cancelled`.
    ///
    /// Only legal while the order is `Pending`; the caller is responsible
    /// for releasing the reserved stock in the same unit of work.
    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if !self.status.can_cancel() {
            return Err(OrderError::InvalidStateTransition {
                from: self.status,
                to: OrderStatus::Cancelled,
            });
        }

        self.status = OrderStatus::Cancelled;
        Ok(())
    }

    /// Advances the status one fulfillment step.
    pub fn progress_to(&mut self, next: OrderStatus) -> Result<(), OrderError> {
        if !self.status.can_progress_to(next) {
            return Err(OrderError::InvalidStateTransition {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        Ok(())
    }
}
