//! Cancellation orchestration: restore stock, transition to Cancelled.

use common::OrderId;
use domain::{Order, OrderError, OrderStatus};
use inventory::InventoryLedger;
use store::{Store, StoreError, StoreTxn};

use crate::{Result, ServiceError};

/// Reverses a pending order as one all-or-nothing unit.
///
/// The commit carries a precondition that the stored order is still
/// `Pending`, so of any number of concurrent cancellations exactly one
/// wins and stock is released exactly once.
pub struct CancellationOrchestrator<S, L> {
    store: S,
    ledger: L,
}

impl<S: Store, L: InventoryLedger> CancellationOrchestrator<S, L> {
    /// Creates a new cancellation orchestrator.
    pub fn new(store: S, ledger: L) -> Self {
        Self { store, ledger }
    }

    /// Cancels a pending order and restores its reserved stock.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order> {
        let mut order = self
            .store
            .load_order(order_id)
            .await?
            .ok_or(ServiceError::OrderNotFound { order_id })?;

        order.cancel()?;

        let mut txn = self.store.begin().await?;
        txn.expect_order_status(order_id, OrderStatus::Pending);
        txn.save_order(order.clone());

        match txn.commit().await {
            Ok(()) => {}
            Err(StoreError::Conflict { .. }) => {
                // Lost the race to another writer; report the transition
                // against the status that actually won.
                let from = self
                    .store
                    .load_order(order_id)
                    .await?
                    .map(|o| o.status())
                    .unwrap_or(OrderStatus::Cancelled);
                return Err(OrderError::InvalidStateTransition {
                    from,
                    to: OrderStatus::Cancelled,
                }
                .into());
            }
            Err(err) => return Err(err.into()),
        }

        // The cancellation is committed; every line item's reservation is
        // now restored. Releases cannot fail for stock that was reserved.
        for item in order.items() {
            if let Err(err) = self.ledger.release(&item.product_id, item.quantity).await {
                tracing::error!(
                    %order_id,
                    product_id = %item.product_id,
                    error = %err,
                    "failed to restore stock for cancelled order"
                );
            }
        }

        metrics::counter!("orders_cancelled_total").increment(1);
        tracing::info!(%order_id, "order cancelled, stock restored");
        Ok(order)
    }
}
