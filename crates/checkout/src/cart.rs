//! Cart aggregation: the joined read of a user's cart and its pricing.

use serde::{Deserialize, Serialize};

use winkel_catalog::Product;
use winkel_core::{Amount, CartItemId, ImageId, ProductId, UserId};

/// Product fields captured by the cart read.
///
/// A subset of the catalog product: exactly what pricing and the order
/// snapshot need, fetched in the same read as the cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Amount,
    pub photo: Option<ImageId>,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            photo: product.photo.as_ref().map(|p| p.id),
        }
    }
}

/// One cart line.
///
/// `product` is `None` when the referenced product was deleted after the
/// line was created. That is an expected state, not an error: the line is
/// excluded from pricing but still removed at cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartItemId,
    pub quantity: i64,
    pub product: Option<ProductSnapshot>,
}

impl CartLine {
    /// The line's contribution to the order total; zero for dangling lines.
    ///
    /// Quantity is deliberately not validated as positive here; the
    /// cart-mutation layer owns that check. Signed arithmetic keeps a bad
    /// quantity from underflowing.
    pub fn subtotal(&self) -> Amount {
        self.product
            .as_ref()
            .map_or(0, |product| self.quantity * product.price)
    }
}

/// A user's cart as loaded by the single joined read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub user_id: UserId,
    pub lines: Vec<CartLine>,
}

impl CartSnapshot {
    /// Lines whose product still exists; the set that is priced and
    /// snapshotted into the order.
    pub fn priced_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(|line| line.product.is_some())
    }

    /// Order total over surviving lines. Dangling lines contribute zero.
    pub fn total(&self) -> Amount {
        self.priced_lines().map(CartLine::subtotal).sum()
    }

    /// Every original line id, dangling ones included. Cleanup deletes all
    /// of them so no stale line survives a checkout.
    pub fn line_ids(&self) -> Vec<CartItemId> {
        self.lines.iter().map(|line| line.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
