//! `winkel-access` — pure access-control boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it turns a
//! per-request [`Session`] into per-resource [`AccessDecision`]s the
//! data-access layer enforces before every read/write. Evaluation is pure,
//! synchronous and side-effect-free.

pub mod permissions;
pub mod rules;
pub mod session;

pub use permissions::{AccessError, Permission, PermissionTable, PermissionTableBuilder};
pub use rules::{
    AccessDecision, RecordFilter, can_manage_order_items, can_manage_products, can_manage_users,
    can_order, can_read_products,
};
pub use session::{RoleClaims, Session, SessionData};
