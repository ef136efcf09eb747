//! Store error types.

use common::OrderId;
use thiserror::Error;

/// Errors that can occur in the persistence provider.
///
/// `Backend` is the unspecified infrastructure failure kind; it is
/// distinct from every business-rule error in the system. `Conflict`
/// reports a failed commit precondition.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The storage backend failed.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// A commit precondition no longer holds.
    #[error("Order {order_id} was modified concurrently")]
    Conflict { order_id: OrderId },
}
