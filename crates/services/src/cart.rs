//! Cart service with advisory stock checks.

use common::{ProductId, UserId};
use domain::Cart;
use inventory::{InventoryError, InventoryLedger, Product};
use store::Store;

use crate::{Result, ServiceError};

/// Service for cart mutations.
///
/// Stock checks here are advisory: multiple users may hold the same
/// product in their carts at once, so nothing is reserved until
/// checkout. The checks only reject requests that are already known to
/// exceed current stock.
pub struct CartService<S, L> {
    store: S,
    ledger: L,
}

impl<S: Store, L: InventoryLedger> CartService<S, L> {
    /// Creates a new cart service.
    pub fn new(store: S, ledger: L) -> Self {
        Self { store, ledger }
    }

    /// Provisions a cart for a user.
    ///
    /// Carts are created when identity is established and live for the
    /// user's lifetime; calling this again returns the existing cart.
    #[tracing::instrument(skip(self))]
    pub async fn create_cart(&self, user_id: UserId) -> Result<Cart> {
        if let Some(cart) = self.store.load_cart(user_id).await? {
            return Ok(cart);
        }

        let cart = Cart::new(user_id);
        self.store.save_cart(&cart).await?;
        tracing::info!(%user_id, "cart created");
        Ok(cart)
    }

    /// Returns the user's cart.
    #[tracing::instrument(skip(self))]
    pub async fn get_cart(&self, user_id: UserId) -> Result<Cart> {
        self.load(user_id).await
    }

    /// Adds `quantity` units of a product to the user's cart.
    ///
    /// The product's current price is captured as the line item's unit
    /// price on first add; a repeated add merges into the existing line
    /// item and keeps the captured price.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart> {
        let mut cart = self.load(user_id).await?;
        let product = self.ledger.lookup(&product_id).await?;
        check_available(&product, quantity)?;

        cart.add_item(product_id, product.price, quantity)?;
        self.store.save_cart(&cart).await?;
        Ok(cart)
    }

    /// Removes a product's line item from the cart. Removing a product
    /// that is not in the cart is a no-op.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, user_id: UserId, product_id: ProductId) -> Result<Cart> {
        let mut cart = self.load(user_id).await?;
        cart.remove_item(&product_id);
        self.store.save_cart(&cart).await?;
        Ok(cart)
    }

    /// Overwrites the quantity of an existing line item.
    #[tracing::instrument(skip(self))]
    pub async fn update_item_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart> {
        let mut cart = self.load(user_id).await?;
        if cart.line_item(&product_id).is_none() {
            return Err(domain::CartError::ItemNotFound { product_id }.into());
        }

        let product = self.ledger.lookup(&product_id).await?;
        check_available(&product, quantity)?;

        cart.set_item_quantity(&product_id, quantity)?;
        self.store.save_cart(&cart).await?;
        Ok(cart)
    }

    /// Empties the user's cart.
    #[tracing::instrument(skip(self))]
    pub async fn clear_cart(&self, user_id: UserId) -> Result<()> {
        let mut cart = self.load(user_id).await?;
        cart.clear();
        self.store.save_cart(&cart).await?;
        Ok(())
    }

    async fn load(&self, user_id: UserId) -> Result<Cart> {
        self.store
            .load_cart(user_id)
            .await?
            .ok_or(ServiceError::CartNotFound { user_id })
    }
}

/// Advisory pre-flight check of the requested quantity against current
/// stock. Not a hold: the authoritative check is the reservation made at
/// checkout.
fn check_available(product: &Product, quantity: u32) -> Result<()> {
    if quantity > product.stock {
        return Err(InventoryError::InsufficientStock {
            product_id: product.id.clone(),
            requested: quantity,
            available: product.stock,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;
    use inventory::InMemoryInventory;
    use store::InMemoryStore;

    async fn setup() -> (CartService<InMemoryStore, InMemoryInventory>, UserId) {
        let store = InMemoryStore::new();
        let ledger = InMemoryInventory::new();
        ledger
            .put(Product::new("SKU-001", "Widget", Money::from_cents(1000), 5))
            .await
            .unwrap();
        ledger
            .put(Product::new("SKU-002", "Gadget", Money::from_cents(500), 2))
            .await
            .unwrap();

        let service = CartService::new(store, ledger);
        let user_id = UserId::new();
        service.create_cart(user_id).await.unwrap();
        (service, user_id)
    }

    #[tokio::test]
    async fn create_cart_is_idempotent() {
        let (service, user_id) = setup().await;

        service
            .add_item(user_id, ProductId::new("SKU-001"), 2)
            .await
            .unwrap();
        let cart = service.create_cart(user_id).await.unwrap();

        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn get_missing_cart_fails() {
        let (service, _) = setup().await;
        let result = service.get_cart(UserId::new()).await;
        assert!(matches!(result, Err(ServiceError::CartNotFound { .. })));
    }

    #[tokio::test]
    async fn add_item_captures_current_price() {
        let (service, user_id) = setup().await;

        let cart = service
            .add_item(user_id, ProductId::new("SKU-001"), 3)
            .await
            .unwrap();

        let item = cart.line_item(&ProductId::new("SKU-001")).unwrap();
        assert_eq!(item.unit_price.cents(), 1000);
        assert_eq!(cart.total().cents(), 3000);
    }

    #[tokio::test]
    async fn add_unknown_product_fails() {
        let (service, user_id) = setup().await;
        let result = service
            .add_item(user_id, ProductId::new("SKU-404"), 1)
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Inventory(
                InventoryError::ProductNotFound { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn add_beyond_stock_fails_without_mutating_cart() {
        let (service, user_id) = setup().await;

        let result = service.add_item(user_id, ProductId::new("SKU-001"), 6).await;

        assert!(matches!(
            result,
            Err(ServiceError::Inventory(
                InventoryError::InsufficientStock { .. }
            ))
        ));
        assert!(service.get_cart(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn advisory_check_does_not_hold_stock() {
        let (service, user_id) = setup().await;
        let other_user = UserId::new();
        service.create_cart(other_user).await.unwrap();

        // Both carts can hold all five units; nothing is reserved yet.
        service
            .add_item(user_id, ProductId::new("SKU-001"), 5)
            .await
            .unwrap();
        service
            .add_item(other_user, ProductId::new("SKU-001"), 5)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_quantity_checks_stock() {
        let (service, user_id) = setup().await;
        service
            .add_item(user_id, ProductId::new("SKU-001"), 2)
            .await
            .unwrap();

        let result = service
            .update_item_quantity(user_id, ProductId::new("SKU-001"), 10)
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::Inventory(
                InventoryError::InsufficientStock { .. }
            ))
        ));

        // Line item unchanged.
        let cart = service.get_cart(user_id).await.unwrap();
        assert_eq!(cart.line_item(&ProductId::new("SKU-001")).unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn update_quantity_of_missing_item_fails() {
        let (service, user_id) = setup().await;
        let result = service
            .update_item_quantity(user_id, ProductId::new("SKU-001"), 1)
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Cart(domain::CartError::ItemNotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn remove_and_clear() {
        let (service, user_id) = setup().await;
        service
            .add_item(user_id, ProductId::new("SKU-001"), 2)
            .await
            .unwrap();
        service
            .add_item(user_id, ProductId::new("SKU-002"), 1)
            .await
            .unwrap();

        let cart = service
            .remove_item(user_id, ProductId::new("SKU-001"))
            .await
            .unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total().cents(), 500);

        service.clear_cart(user_id).await.unwrap();
        let cart = service.get_cart(user_id).await.unwrap();
        assert!(cart.is_empty());
        assert!(cart.total().is_zero());
    }

    #[tokio::test]
    async fn remove_absent_item_is_idempotent() {
        let (service, user_id) = setup().await;
        let cart = service
            .remove_item(user_id, ProductId::new("SKU-404"))
            .await
            .unwrap();
        assert!(cart.is_empty());
    }
}
