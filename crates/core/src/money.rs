//! Money representation.

/// An amount in the smallest currency unit (e.g. euro cents).
///
/// Signed on purpose: cart line quantities are not validated here, so totals
/// are computed with signed arithmetic instead of underflowing. The
/// cart-mutation layer owns quantity validation.
pub type Amount = i64;

/// The single currency code this deployment charges in.
pub const CURRENCY: &str = "EUR";
