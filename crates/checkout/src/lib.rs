//! `winkel-checkout` — the checkout transaction and its collaborator ports.
//!
//! Converts a user's cart into a paid order: one joined cart read, an
//! external payment capture, an order write snapshotting the purchased
//! lines, and idempotent cart cleanup. The data store and the payment
//! gateway are ports implemented elsewhere; everything in this crate is
//! deterministic orchestration over them.

pub mod cart;
pub mod order;
pub mod payment;
pub mod store;
pub mod workflow;

pub use cart::{CartLine, CartSnapshot, ProductSnapshot};
pub use order::{Order, OrderDraft, OrderItem, OrderItemDraft};
pub use payment::{CaptureRequest, Charge, ChargeStatus, PaymentError, PaymentGateway};
pub use store::{CheckoutStore, StoreError};
pub use workflow::{CheckoutError, checkout};
