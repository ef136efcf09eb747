//! Checkout orchestration: cart → order against live inventory.

use common::{OrderId, ProductId, UserId};
use domain::Order;
use inventory::InventoryLedger;
use store::{Store, StoreTxn};

use crate::{Result, ServiceError};

/// Converts a cart into an order as one all-or-nothing unit.
///
/// Reservations are the authoritative stock check; they happen in
/// ascending product-id order so concurrent checkouts over overlapping
/// product sets cannot deadlock. Any failure after the first reservation
/// releases everything reserved so far and leaves the stored cart
/// untouched.
pub struct CheckoutOrchestrator<S, L> {
    store: S,
    ledger: L,
}

impl<S: Store, L: InventoryLedger> CheckoutOrchestrator<S, L> {
    /// Creates a new checkout orchestrator.
    pub fn new(store: S, ledger: L) -> Self {
        Self { store, ledger }
    }

    /// Creates a `Pending` order from the user's cart and empties the
    /// cart.
    #[tracing::instrument(skip(self))]
    pub async fn create_order_from_cart(&self, user_id: UserId) -> Result<Order> {
        metrics::counter!("checkouts_total").increment(1);
        let start = std::time::Instant::now();

        let result = self.run(user_id).await;

        if result.is_err() {
            metrics::counter!("checkouts_failed_total").increment(1);
        }
        metrics::histogram!("checkout_duration_seconds").record(start.elapsed().as_secs_f64());
        result
    }

    async fn run(&self, user_id: UserId) -> Result<Order> {
        let mut cart = self
            .store
            .load_cart(user_id)
            .await?
            .ok_or(ServiceError::CartNotFound { user_id })?;

        if cart.is_empty() {
            return Err(ServiceError::EmptyCart { user_id });
        }

        // Reserve every line item; the cart iterates in ascending
        // product-id order.
        let mut reserved: Vec<(ProductId, u32)> = Vec::with_capacity(cart.item_count());
        for item in cart.items() {
            match self.ledger.reserve(&item.product_id, item.quantity).await {
                Ok(_) => reserved.push((item.product_id.clone(), item.quantity)),
                Err(err) => {
                    tracing::info!(
                        %user_id,
                        product_id = %item.product_id,
                        "reservation failed, rolling back checkout"
                    );
                    self.release_all(&reserved).await;
                    return Err(err.into());
                }
            }
        }

        let order = Order::from_cart(OrderId::new(), &cart);
        cart.clear();

        // Persist the order and the emptied cart in one transaction; a
        // commit failure releases every reservation and the stored cart
        // stays as it was.
        let committed = async {
            let mut txn = self.store.begin().await?;
            txn.save_order(order.clone());
            txn.save_cart(cart);
            txn.commit().await
        }
        .await;

        if let Err(err) = committed {
            self.release_all(&reserved).await;
            return Err(err.into());
        }

        tracing::info!(
            order_id = %order.id(),
            %user_id,
            total = %order.total(),
            "order created from cart"
        );
        Ok(order)
    }

    async fn release_all(&self, reserved: &[(ProductId, u32)]) {
        for (product_id, quantity) in reserved {
            if let Err(err) = self.ledger.release(product_id, *quantity).await {
                tracing::error!(%product_id, error = %err, "failed to release reservation");
            }
        }
    }
}
