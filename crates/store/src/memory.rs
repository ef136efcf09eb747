use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{Cart, Order, OrderStatus};
use tokio::sync::RwLock;

use crate::store::{Store, StoreTxn};
use crate::{Result, StoreError};

#[derive(Default)]
struct StoreState {
    carts: HashMap<UserId, Cart>,
    orders: HashMap<OrderId, Order>,
}

/// In-memory store implementation.
///
/// Carts and orders live behind one lock, so a committed transaction is
/// applied in a single critical section and readers never observe a
/// half-applied unit of work.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    type Txn = InMemoryTxn;

    async fn load_cart(&self, user_id: UserId) -> Result<Option<Cart>> {
        Ok(self.state.read().await.carts.get(&user_id).cloned())
    }

    async fn save_cart(&self, cart: &Cart) -> Result<()> {
        self.state
            .write()
            .await
            .carts
            .insert(cart.user_id(), cart.clone());
        Ok(())
    }

    async fn load_order(&self, order_id: OrderId) -> Result<Option<Order>> {
        Ok(self.state.read().await.orders.get(&order_id).cloned())
    }

    async fn save_order(&self, order: &Order) -> Result<()> {
        self.state
            .write()
            .await
            .orders
            .insert(order.id(), order.clone());
        Ok(())
    }

    async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|o| o.user_id() == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(orders)
    }

    async fn begin(&self) -> Result<InMemoryTxn> {
        Ok(InMemoryTxn {
            state: self.state.clone(),
            carts: Vec::new(),
            orders: Vec::new(),
            expectations: Vec::new(),
        })
    }
}

/// Buffered in-memory transaction.
pub struct InMemoryTxn {
    state: Arc<RwLock<StoreState>>,
    carts: Vec<Cart>,
    orders: Vec<Order>,
    expectations: Vec<(OrderId, OrderStatus)>,
}

#[async_trait]
impl StoreTxn for InMemoryTxn {
    fn save_cart(&mut self, cart: Cart) {
        self.carts.push(cart);
    }

    fn save_order(&mut self, order: Order) {
        self.orders.push(order);
    }

    fn expect_order_status(&mut self, order_id: OrderId, status: OrderStatus) {
        self.expectations.push((order_id, status));
    }

    async fn commit(self) -> Result<()> {
        let mut state = self.state.write().await;

        for (order_id, expected) in &self.expectations {
            match state.orders.get(order_id) {
                Some(order) if order.status() == *expected => {}
                _ => return Err(StoreError::Conflict { order_id: *order_id }),
            }
        }

        for cart in self.carts {
            state.carts.insert(cart.user_id(), cart);
        }
        for order in self.orders {
            state.orders.insert(order.id(), order);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Money, ProductId};

    fn cart_for(user_id: UserId) -> Cart {
        let mut cart = Cart::new(user_id);
        cart.add_item(ProductId::new("SKU-001"), Money::from_cents(1000), 2)
            .unwrap();
        cart
    }

    #[tokio::test]
    async fn load_missing_cart_returns_none() {
        let store = InMemoryStore::new();
        assert!(store.load_cart(UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_and_load_cart() {
        let store = InMemoryStore::new();
        let user_id = UserId::new();
        let cart = cart_for(user_id);

        store.save_cart(&cart).await.unwrap();

        let loaded = store.load_cart(user_id).await.unwrap().unwrap();
        assert_eq!(loaded, cart);
    }

    #[tokio::test]
    async fn save_and_load_order() {
        let store = InMemoryStore::new();
        let cart = cart_for(UserId::new());
        let order = Order::from_cart(OrderId::new(), &cart);

        store.save_order(&order).await.unwrap();

        let loaded = store.load_order(order.id()).await.unwrap().unwrap();
        assert_eq!(loaded, order);
    }

    #[tokio::test]
    async fn orders_for_user_newest_first() {
        let store = InMemoryStore::new();
        let user_id = UserId::new();
        let cart = cart_for(user_id);

        let first = Order::from_cart(OrderId::new(), &cart);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = Order::from_cart(OrderId::new(), &cart);

        store.save_order(&first).await.unwrap();
        store.save_order(&second).await.unwrap();
        store
            .save_order(&Order::from_cart(OrderId::new(), &cart_for(UserId::new())))
            .await
            .unwrap();

        let orders = store.orders_for_user(user_id).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id(), second.id());
        assert_eq!(orders[1].id(), first.id());
    }

    #[tokio::test]
    async fn buffered_writes_are_invisible_until_commit() {
        let store = InMemoryStore::new();
        let user_id = UserId::new();

        let mut txn = store.begin().await.unwrap();
        txn.save_cart(cart_for(user_id));

        assert!(store.load_cart(user_id).await.unwrap().is_none());

        txn.commit().await.unwrap();

        assert!(store.load_cart(user_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn dropping_a_transaction_discards_its_writes() {
        let store = InMemoryStore::new();
        let user_id = UserId::new();

        {
            let mut txn = store.begin().await.unwrap();
            txn.save_cart(cart_for(user_id));
        }

        assert!(store.load_cart(user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn commit_applies_cart_and_order_together() {
        let store = InMemoryStore::new();
        let user_id = UserId::new();
        let mut cart = cart_for(user_id);
        let order = Order::from_cart(OrderId::new(), &cart);
        cart.clear();

        let mut txn = store.begin().await.unwrap();
        txn.save_order(order.clone());
        txn.save_cart(cart);
        txn.commit().await.unwrap();

        assert!(store.load_cart(user_id).await.unwrap().unwrap().is_empty());
        assert_eq!(store.load_order(order.id()).await.unwrap().unwrap(), order);
    }

    #[tokio::test]
    async fn status_precondition_holds() {
        let store = InMemoryStore::new();
        let order = Order::from_cart(OrderId::new(), &cart_for(UserId::new()));
        store.save_order(&order).await.unwrap();

        let mut cancelled = order.clone();
        cancelled.cancel().unwrap();

        let mut txn = store.begin().await.unwrap();
        txn.expect_order_status(order.id(), OrderStatus::Pending);
        txn.save_order(cancelled);
        txn.commit().await.unwrap();

        let stored = store.load_order(order.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn violated_precondition_fails_commit_and_applies_nothing() {
        let store = InMemoryStore::new();
        let user_id = UserId::new();
        let order = Order::from_cart(OrderId::new(), &cart_for(user_id));
        store.save_order(&order).await.unwrap();

        // Another writer cancels the order first.
        let mut already_cancelled = order.clone();
        already_cancelled.cancel().unwrap();
        store.save_order(&already_cancelled).await.unwrap();

        let mut cancelled = order.clone();
        cancelled.cancel().unwrap();

        let mut txn = store.begin().await.unwrap();
        txn.expect_order_status(order.id(), OrderStatus::Pending);
        txn.save_order(cancelled);
        txn.save_cart(cart_for(user_id));

        let result = txn.commit().await;
        assert!(matches!(result, Err(StoreError::Conflict { .. })));

        // The buffered cart write was not applied either.
        assert!(store.load_cart(user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn precondition_on_missing_order_fails() {
        let store = InMemoryStore::new();

        let mut txn = store.begin().await.unwrap();
        txn.expect_order_status(OrderId::new(), OrderStatus::Pending);

        assert!(matches!(
            txn.commit().await,
            Err(StoreError::Conflict { .. })
        ));
    }
}
