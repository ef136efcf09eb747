//! Application services for the storefront workspace.
//!
//! - [`CartService`] — cart mutations with advisory stock checks
//! - [`CheckoutOrchestrator`] — converts a cart into an order against
//!   live inventory, all-or-nothing
//! - [`CancellationOrchestrator`] — cancels a pending order and restores
//!   its reserved stock
//! - [`OrderService`] — order queries and fulfillment status progression
//!
//! Every operation either commits fully or leaves all owned state exactly
//! as it was before the call; the closed [`ServiceError`] set tells the
//! caller which business rule failed.

mod cancellation;
mod cart;
mod checkout;
mod error;
mod orders;

pub use cancellation::CancellationOrchestrator;
pub use cart::CartService;
pub use checkout::CheckoutOrchestrator;
pub use error::ServiceError;
pub use orders::OrderService;

/// Convenience type alias for service results.
pub type Result<T> = std::result::Result<T, ServiceError>;
