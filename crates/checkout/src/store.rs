//! Data-store port consumed by the checkout workflow.
//!
//! Three typed operations over the external store: one joined read, one
//! order write, one bulk delete. Each is atomic at the single-record level;
//! no multi-statement transaction spans them.

use thiserror::Error;

use winkel_core::{CartItemId, UserId};

use crate::cart::CartSnapshot;
use crate::order::{Order, OrderDraft};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("record not found")]
    NotFound,

    /// Backend failure (connection, write error, poisoned lock, ...).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Typed store operations the checkout transaction needs.
pub trait CheckoutStore {
    /// Load the user's cart with each line's product and photo resolved, in
    /// a single read (no per-line round trips). Lines whose product has been
    /// deleted come back with `product: None` rather than failing.
    fn load_cart(&self, user_id: UserId) -> Result<CartSnapshot, StoreError>;

    /// Create the order in one call: charge id, total, nested items, user
    /// link.
    fn create_order(&self, draft: OrderDraft) -> Result<Order, StoreError>;

    /// Delete the given cart lines. Ids that no longer exist are ignored.
    fn delete_cart_items(&self, ids: &[CartItemId]) -> Result<(), StoreError>;
}
