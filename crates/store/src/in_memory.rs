//! In-memory record store.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use winkel_catalog::Product;
use winkel_checkout::{
    CartLine, CartSnapshot, CheckoutStore, Order, OrderDraft, OrderItem, ProductSnapshot,
    StoreError,
};
use winkel_core::{CartItemId, OrderId, OrderItemId, ProductId, UserId};

/// Stored user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Stored cart row: user → product link plus quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemRecord {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
}

/// In-memory store over `RwLock`ed maps.
///
/// Not optimized for performance; single-record atomicity only, like the
/// port it implements.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
    products: RwLock<HashMap<ProductId, Product>>,
    cart_items: RwLock<HashMap<CartItemId, CartItemRecord>>,
    orders: RwLock<HashMap<OrderId, Order>>,
}

fn poisoned(_: impl core::fmt::Debug) -> StoreError {
    StoreError::backend("lock poisoned")
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Seeding / test accessors ────────────────────────────────────────

    pub fn insert_user(&self, user: UserRecord) {
        if let Ok(mut users) = self.users.write() {
            users.insert(user.id, user);
        }
    }

    pub fn insert_product(&self, product: Product) {
        if let Ok(mut products) = self.products.write() {
            products.insert(product.id, product);
        }
    }

    /// Delete a product, leaving any cart lines that reference it dangling.
    pub fn remove_product(&self, id: ProductId) {
        if let Ok(mut products) = self.products.write() {
            products.remove(&id);
        }
    }

    pub fn insert_cart_item(&self, item: CartItemRecord) {
        if let Ok(mut items) = self.cart_items.write() {
            items.insert(item.id, item);
        }
    }

    pub fn cart_item_count(&self, user_id: UserId) -> usize {
        self.cart_items
            .read()
            .map(|items| items.values().filter(|i| i.user_id == user_id).count())
            .unwrap_or(0)
    }

    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.orders.read().ok()?.get(&id).cloned()
    }

    pub fn order_count(&self) -> usize {
        self.orders.read().map(|o| o.len()).unwrap_or(0)
    }
}

impl CheckoutStore for InMemoryStore {
    fn load_cart(&self, user_id: UserId) -> Result<CartSnapshot, StoreError> {
        let users = self.users.read().map_err(poisoned)?;
        if !users.contains_key(&user_id) {
            return Err(StoreError::NotFound);
        }

        let products = self.products.read().map_err(poisoned)?;
        let cart_items = self.cart_items.read().map_err(poisoned)?;

        // One pass joins lines to products; a deleted product becomes a
        // dangling line, not an error.
        let mut lines: Vec<CartLine> = cart_items
            .values()
            .filter(|item| item.user_id == user_id)
            .map(|item| CartLine {
                id: item.id,
                quantity: item.quantity,
                product: products.get(&item.product_id).map(ProductSnapshot::from),
            })
            .collect();
        // Map iteration order is arbitrary; keep snapshots deterministic.
        lines.sort_by_key(|line| *line.id.as_uuid());

        Ok(CartSnapshot { user_id, lines })
    }

    fn create_order(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        let order = Order {
            id: OrderId::new(),
            total: draft.total,
            charge_id: draft.charge_id,
            items: draft
                .items
                .into_iter()
                .map(|item| OrderItem {
                    id: OrderItemId::new(),
                    name: item.name,
                    description: item.description,
                    price: item.price,
                    quantity: item.quantity,
                    photo: item.photo,
                })
                .collect(),
            user_id: draft.user_id,
            created_at: Utc::now(),
        };

        let mut orders = self.orders.write().map_err(poisoned)?;
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    fn delete_cart_items(&self, ids: &[CartItemId]) -> Result<(), StoreError> {
        let mut cart_items = self.cart_items.write().map_err(poisoned)?;
        for id in ids {
            // Already-absent ids are fine; deletes are idempotent.
            cart_items.remove(id);
        }
        Ok(())
    }
}
