//! Order assembly: snapshotting cart lines into an order-creation request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use winkel_core::{Amount, ChargeId, ImageId, OrderId, OrderItemId, UserId};

use crate::cart::CartSnapshot;
use crate::payment::Charge;

/// Order line to be created: name/description/price copied from the product
/// at purchase time, so later product edits or deletions never touch the
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemDraft {
    pub name: String,
    pub description: String,
    pub price: Amount,
    pub quantity: i64,
    pub photo: Option<ImageId>,
}

impl OrderItemDraft {
    pub fn subtotal(&self) -> Amount {
        self.quantity * self.price
    }
}

/// A persisted order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub name: String,
    pub description: String,
    pub price: Amount,
    pub quantity: i64,
    pub photo: Option<ImageId>,
}

/// The single order-creation request: charge id, total, nested items and the
/// owning user link, all in one store call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub total: Amount,
    pub charge_id: ChargeId,
    pub items: Vec<OrderItemDraft>,
    pub user_id: UserId,
}

impl OrderDraft {
    /// Snapshot the cart's surviving lines against a captured charge.
    ///
    /// The draft's total is the charge amount, which the workflow computed
    /// from the same snapshot, so `total == Σ item.subtotal()` holds by
    /// construction.
    pub fn from_cart(cart: &CartSnapshot, charge: &Charge) -> Self {
        let items = cart
            .lines
            .iter()
            .filter_map(|line| {
                line.product.as_ref().map(|product| OrderItemDraft {
                    name: product.name.clone(),
                    description: product.description.clone(),
                    price: product.price,
                    quantity: line.quantity,
                    photo: product.photo,
                })
            })
            .collect();

        Self {
            total: charge.amount,
            charge_id: charge.id.clone(),
            items,
            user_id: cart.user_id,
        }
    }
}

/// The durable record of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub total: Amount,
    pub charge_id: ChargeId,
    pub items: Vec<OrderItem>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Sum of line subtotals; equals `total` for any order produced by the
    /// checkout workflow.
    pub fn items_total(&self) -> Amount {
        self.items.iter().map(|i| i.quantity * i.price).sum()
    }
}
