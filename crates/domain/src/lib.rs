//! Domain layer for the storefront workspace.
//!
//! Pure state, no I/O:
//! - `Cart` — a user's mutable line items with a total re-derived after
//!   every mutation
//! - `Order` — an immutable-once-created snapshot of a cart, moving
//!   through a small status state machine
//!
//! Stock is owned by the inventory ledger; nothing in this crate touches
//! it.

mod cart;
mod order;
mod status;

pub use cart::{Cart, CartError, CartLineItem};
pub use order::{Order, OrderError, OrderLineItem};
pub use status::OrderStatus;
