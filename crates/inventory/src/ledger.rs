//! Inventory ledger trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::ProductId;

use crate::error::InventoryError;
use crate::product::Product;
use crate::Result;

/// Trait for inventory operations.
///
/// `reserve` and `release` are the only stock mutators in the system and
/// each must be a single atomic read-modify-write: two concurrent
/// reservations may never jointly draw stock below zero.
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    /// Returns the product with the given id.
    async fn lookup(&self, product_id: &ProductId) -> Result<Product>;

    /// Atomically decrements stock by `quantity` and returns the new
    /// stock level.
    ///
    /// Fails with `InsufficientStock` when `quantity` exceeds the current
    /// stock, leaving the stock unchanged.
    async fn reserve(&self, product_id: &ProductId, quantity: u32) -> Result<u32>;

    /// Atomically increments stock by `quantity` and returns the new
    /// stock level. No upper bound is enforced.
    async fn release(&self, product_id: &ProductId, quantity: u32) -> Result<u32>;

    /// Inserts or replaces a product record.
    async fn put(&self, product: Product) -> Result<()>;

    /// Returns all products with stock remaining.
    async fn available(&self) -> Result<Vec<Product>>;

    /// Returns products whose name contains `name`, case-insensitively.
    async fn search(&self, name: &str) -> Result<Vec<Product>>;
}

/// In-memory inventory ledger.
///
/// Every stock mutation holds the write lock for the whole
/// read-modify-write, which serializes reservations per ledger and keeps
/// the non-negative stock invariant under concurrency.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryInventory {
    /// Creates a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current stock of a product, if it exists.
    pub fn stock_of(&self, product_id: &ProductId) -> Option<u32> {
        self.products
            .read()
            .unwrap()
            .get(product_id)
            .map(|p| p.stock)
    }

    /// Returns the number of products in the catalog.
    pub fn product_count(&self) -> usize {
        self.products.read().unwrap().len()
    }
}

#[async_trait]
impl InventoryLedger for InMemoryInventory {
    async fn lookup(&self, product_id: &ProductId) -> Result<Product> {
        self.products
            .read()
            .unwrap()
            .get(product_id)
            .cloned()
            .ok_or_else(|| InventoryError::ProductNotFound {
                product_id: product_id.clone(),
            })
    }

    async fn reserve(&self, product_id: &ProductId, quantity: u32) -> Result<u32> {
        let mut products = self.products.write().unwrap();
        let product =
            products
                .get_mut(product_id)
                .ok_or_else(|| InventoryError::ProductNotFound {
                    product_id: product_id.clone(),
                })?;

        if quantity > product.stock {
            return Err(InventoryError::InsufficientStock {
                product_id: product_id.clone(),
                requested: quantity,
                available: product.stock,
            });
        }

        product.stock -= quantity;
        Ok(product.stock)
    }

    async fn release(&self, product_id: &ProductId, quantity: u32) -> Result<u32> {
        let mut products = self.products.write().unwrap();
        let product =
            products
                .get_mut(product_id)
                .ok_or_else(|| InventoryError::ProductNotFound {
                    product_id: product_id.clone(),
                })?;

        product.stock += quantity;
        Ok(product.stock)
    }

    async fn put(&self, product: Product) -> Result<()> {
        self.products
            .write()
            .unwrap()
            .insert(product.id.clone(), product);
        Ok(())
    }

    async fn available(&self) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .unwrap()
            .values()
            .filter(|p| p.is_available())
            .cloned()
            .collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(products)
    }

    async fn search(&self, name: &str) -> Result<Vec<Product>> {
        let needle = name.to_lowercase();
        let mut products: Vec<Product> = self
            .products
            .read()
            .unwrap()
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;

    fn ledger_with(stock: u32) -> InMemoryInventory {
        let ledger = InMemoryInventory::new();
        ledger
            .products
            .write()
            .unwrap()
            .insert(
                ProductId::new("SKU-001"),
                Product::new("SKU-001", "Widget", Money::from_cents(1000), stock),
            );
        ledger
    }

    #[tokio::test]
    async fn lookup_unknown_product_fails() {
        let ledger = InMemoryInventory::new();
        let result = ledger.lookup(&ProductId::new("SKU-404")).await;
        assert!(matches!(
            result,
            Err(InventoryError::ProductNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn reserve_decrements_stock() {
        let ledger = ledger_with(5);
        let remaining = ledger.reserve(&ProductId::new("SKU-001"), 3).await.unwrap();
        assert_eq!(remaining, 2);
        assert_eq!(ledger.stock_of(&ProductId::new("SKU-001")), Some(2));
    }

    #[tokio::test]
    async fn reserve_beyond_stock_fails_and_leaves_stock_unchanged() {
        let ledger = ledger_with(5);
        let result = ledger.reserve(&ProductId::new("SKU-001"), 6).await;

        assert!(matches!(
            result,
            Err(InventoryError::InsufficientStock {
                requested: 6,
                available: 5,
                ..
            })
        ));
        assert_eq!(ledger.stock_of(&ProductId::new("SKU-001")), Some(5));
    }

    #[tokio::test]
    async fn release_increments_stock() {
        let ledger = ledger_with(0);
        let stock = ledger.release(&ProductId::new("SKU-001"), 4).await.unwrap();
        assert_eq!(stock, 4);
    }

    #[tokio::test]
    async fn reserve_then_release_restores_stock() {
        let ledger = ledger_with(5);
        let id = ProductId::new("SKU-001");

        ledger.reserve(&id, 5).await.unwrap();
        assert_eq!(ledger.stock_of(&id), Some(0));

        ledger.release(&id, 5).await.unwrap();
        assert_eq!(ledger.stock_of(&id), Some(5));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_reservations_never_overdraw() {
        let ledger = ledger_with(5);
        let id = ProductId::new("SKU-001");

        let mut handles = Vec::new();
        for _ in 0..20 {
            let ledger = ledger.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move { ledger.reserve(&id, 1).await }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 5);
        assert_eq!(ledger.stock_of(&id), Some(0));
    }

    #[tokio::test]
    async fn available_excludes_out_of_stock() {
        let ledger = InMemoryInventory::new();
        ledger
            .put(Product::new("SKU-001", "Widget", Money::from_cents(1000), 3))
            .await
            .unwrap();
        ledger
            .put(Product::new("SKU-002", "Gadget", Money::from_cents(500), 0))
            .await
            .unwrap();

        let available = ledger.available().await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, ProductId::new("SKU-001"));
    }

    #[tokio::test]
    async fn search_matches_case_insensitively() {
        let ledger = InMemoryInventory::new();
        ledger
            .put(Product::new("SKU-001", "Blue Widget", Money::from_cents(1000), 3))
            .await
            .unwrap();
        ledger
            .put(Product::new("SKU-002", "Gadget", Money::from_cents(500), 2))
            .await
            .unwrap();

        let found = ledger.search("widGET").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Blue Widget");
    }

    #[tokio::test]
    async fn put_replaces_existing_product() {
        let ledger = ledger_with(5);
        ledger
            .put(Product::new("SKU-001", "Widget v2", Money::from_cents(1200), 8))
            .await
            .unwrap();

        let product = ledger.lookup(&ProductId::new("SKU-001")).await.unwrap();
        assert_eq!(product.name, "Widget v2");
        assert_eq!(product.stock, 8);
        assert_eq!(ledger.product_count(), 1);
    }
}
