//! `winkel-store` — in-memory implementation of the checkout data-store port.
//!
//! Intended for tests/dev. The production deployment wires the same port to
//! its real persistence layer.

pub mod in_memory;


pub use in_memory::{CartItemRecord, InMemoryStore, UserRecord};
