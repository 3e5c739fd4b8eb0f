//! Product catalog domain module.
//!
//! This crate contains the product value types the access rules and the
//! checkout snapshot logic reference. Persistence and admin surfaces are
//! external collaborators.

pub mod product;

pub use product::{Product, ProductImage, ProductStatus};
