//! Order queries and fulfillment status progression.

use common::{OrderId, UserId};
use domain::{Order, OrderError, OrderStatus};
use store::{Store, StoreError, StoreTxn};

use crate::{Result, ServiceError};

/// Read access to orders plus the status progression used by external
/// fulfillment collaborators.
///
/// Cancellation is not reachable here; it has its own stock-restoring
/// path in [`crate::CancellationOrchestrator`].
pub struct OrderService<S> {
    store: S,
}

impl<S: Store> OrderService<S> {
    /// Creates a new order service.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns an order by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order> {
        self.store
            .load_order(order_id)
            .await?
            .ok_or(ServiceError::OrderNotFound { order_id })
    }

    /// Returns a user's orders, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        Ok(self.store.orders_for_user(user_id).await?)
    }

    /// Advances an order one fulfillment step.
    #[tracing::instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order> {
        let mut order = self
            .store
            .load_order(order_id)
            .await?
            .ok_or(ServiceError::OrderNotFound { order_id })?;

        let current = order.status();
        order.progress_to(status)?;

        let mut txn = self.store.begin().await?;
        txn.expect_order_status(order_id, current);
        txn.save_order(order.clone());

        match txn.commit().await {
            Ok(()) => Ok(order),
            Err(StoreError::Conflict { .. }) => {
                let from = self
                    .store
                    .load_order(order_id)
                    .await?
                    .map(|o| o.status())
                    .unwrap_or(current);
                Err(OrderError::InvalidStateTransition { from, to: status }.into())
            }
            Err(err) => Err(err.into()),
        }
    }
}
