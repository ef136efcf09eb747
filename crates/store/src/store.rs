//! Store and transaction traits.

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{Cart, Order, OrderStatus};

use crate::Result;

/// Persistence for carts and orders.
///
/// Single-entity `save` calls are for operations that touch one record;
/// multi-step units of work (checkout, cancellation) go through
/// [`Store::begin`] so all writes land atomically or not at all.
#[async_trait]
pub trait Store: Send + Sync {
    /// The transaction type produced by [`Store::begin`].
    type Txn: StoreTxn;

    /// Loads the cart owned by `user_id`.
    async fn load_cart(&self, user_id: UserId) -> Result<Option<Cart>>;

    /// Saves a cart, replacing any stored version.
    async fn save_cart(&self, cart: &Cart) -> Result<()>;

    /// Loads an order by id.
    async fn load_order(&self, order_id: OrderId) -> Result<Option<Order>>;

    /// Saves an order, replacing any stored version.
    async fn save_order(&self, order: &Order) -> Result<()>;

    /// Returns a user's orders, newest first.
    async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>>;

    /// Opens a new transaction scope.
    async fn begin(&self) -> Result<Self::Txn>;
}

/// A transaction scope with buffered writes.
///
/// Writes registered on the transaction are invisible until `commit`
/// applies them all under one lock. Preconditions are checked at commit
/// time against the stored state; a violated precondition fails the
/// commit with [`crate::StoreError::Conflict`] and applies nothing.
/// Dropping the transaction without committing is a rollback.
#[async_trait]
pub trait StoreTxn: Send {
    /// Buffers a cart write.
    fn save_cart(&mut self, cart: Cart);

    /// Buffers an order write.
    fn save_order(&mut self, order: Order);

    /// Requires the stored order to still have `status` at commit time.
    fn expect_order_status(&mut self, order_id: OrderId, status: OrderStatus);

    /// Checks all preconditions and applies all buffered writes
    /// atomically.
    async fn commit(self) -> Result<()>;
}
