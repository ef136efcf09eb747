//! Persistence provider for the storefront workspace.
//!
//! Offers `load`/`save` for carts and orders keyed by identity, plus an
//! explicit transaction scope: a [`StoreTxn`] buffers writes and optional
//! commit preconditions, and applies everything atomically at
//! [`StoreTxn::commit`]. Dropping an uncommitted transaction discards the
//! buffer, so every exit path either commits fully or changes nothing.

mod error;
mod memory;
mod store;

pub use error::StoreError;
pub use memory::{InMemoryStore, InMemoryTxn};
pub use store::{Store, StoreTxn};

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
