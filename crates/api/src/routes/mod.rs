//! Route handlers grouped by resource.

pub mod carts;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;

use inventory::InventoryLedger;
use services::{CancellationOrchestrator, CartService, CheckoutOrchestrator, OrderService};
use store::Store;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store, L: InventoryLedger> {
    pub carts: CartService<S, L>,
    pub checkout: CheckoutOrchestrator<S, L>,
    pub cancellation: CancellationOrchestrator<S, L>,
    pub orders: OrderService<S>,
    pub ledger: L,
}
