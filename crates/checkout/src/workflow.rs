//! The checkout transaction.
//!
//! Linear and strictly sequential: authenticate, load the cart, price it,
//! capture payment, create the order, clear the cart. Every step depends on
//! the previous one's output and any failure is terminal for the invocation;
//! no retry happens anywhere in this layer.
//!
//! Concurrent checkouts by the same user are not mutually excluded here; a
//! deployment must pair this with an external per-user lock or an
//! idempotency key on the payment call.

use thiserror::Error;
use tracing::{debug, error, info};

use winkel_access::Session;
use winkel_core::{CURRENCY, ChargeId, OrderId};

use crate::order::{Order, OrderDraft};
use crate::payment::{CaptureRequest, PaymentGateway};
use crate::store::{CheckoutStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// No signed-in user; raised before any store or payment call.
    #[error("you must be signed in to create an order")]
    Unauthenticated,

    /// The joined cart read failed. No money has moved.
    #[error("failed to load cart: {0}")]
    CartLoad(#[source] StoreError),

    /// The gateway declined or errored; message carried verbatim. No order
    /// exists and the cart is untouched.
    #[error("payment failed: {0}")]
    PaymentFailed(String),

    /// The order write failed *after* a successful charge: money has moved
    /// with no recorded order. Carries the charge id so a reconciliation
    /// process can pair the orphaned charge with the user.
    #[error("order creation failed after charge {charge_id} was captured: {source}")]
    OrderCreationFailed {
        charge_id: ChargeId,
        #[source]
        source: StoreError,
    },

    /// The order exists but stale cart lines could not be deleted.
    #[error("cart cleanup failed after order {order_id} was created: {source}")]
    CartCleanupFailed {
        order_id: OrderId,
        #[source]
        source: StoreError,
    },
}

/// Convert the session user's cart into a paid order.
///
/// Steps, in order:
/// 1. require a signed-in user;
/// 2. load the cart (user + lines + products + photos, one read);
/// 3. total the lines whose product still exists;
/// 4. capture payment for that total;
/// 5. snapshot surviving lines into order items;
/// 6. create the order (charge id, total, items, user link);
/// 7. delete *all* original cart lines, dangling ones included;
/// 8. return the order.
pub fn checkout<S, G>(
    store: &S,
    gateway: &G,
    session: &Session,
    payment_method_token: &str,
) -> Result<Order, CheckoutError>
where
    S: CheckoutStore,
    G: PaymentGateway,
{
    let Some(user_id) = session.user_id() else {
        return Err(CheckoutError::Unauthenticated);
    };

    let cart = store
        .load_cart(user_id)
        .map_err(CheckoutError::CartLoad)?;
    let amount = cart.total();
    debug!(%user_id, lines = cart.lines.len(), amount, "cart loaded and priced");

    let charge = gateway
        .capture(CaptureRequest {
            amount,
            currency: CURRENCY.to_string(),
            payment_method: payment_method_token.to_string(),
            confirm: true,
        })
        .map_err(|e| CheckoutError::PaymentFailed(e.message))?;
    debug!(charge = %charge.id, amount = charge.amount, "payment captured");

    let draft = OrderDraft::from_cart(&cart, &charge);
    let line_ids = cart.line_ids();

    let order = store.create_order(draft).map_err(|source| {
        // Money has moved without a recorded order. Reconciliation is a
        // deployment-level concern; surface loudly, do not retry or refund.
        error!(
            %user_id,
            charge = %charge.id,
            amount = charge.amount,
            "order creation failed after successful charge"
        );
        CheckoutError::OrderCreationFailed {
            charge_id: charge.id.clone(),
            source,
        }
    })?;

    store
        .delete_cart_items(&line_ids)
        .map_err(|source| CheckoutError::CartCleanupFailed {
            order_id: order.id,
            source,
        })?;

    info!(
        %user_id,
        order = %order.id,
        charge = %order.charge_id,
        total = order.total,
        items = order.items.len(),
        "checkout complete"
    );
    Ok(order)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use chrono::Utc;

    use winkel_access::{RoleClaims, SessionData};
    use winkel_core::{Amount, CartItemId, ProductId, UserId};

    use super::*;
    use crate::cart::{CartLine, CartSnapshot, ProductSnapshot};
    use crate::order::OrderItem;
    use crate::payment::{Charge, ChargeStatus, PaymentError};

    // ── Fakes ───────────────────────────────────────────────────────────

    /// Store fake tracking call order and the surviving cart state.
    struct FakeStore {
        cart: RefCell<Vec<CartLine>>,
        user_id: UserId,
        orders: RefCell<Vec<Order>>,
        loads: Cell<u32>,
        fail_create: bool,
        fail_cleanup: bool,
    }

    impl FakeStore {
        fn with_cart(user_id: UserId, lines: Vec<CartLine>) -> Self {
            Self {
                cart: RefCell::new(lines),
                user_id,
                orders: RefCell::new(Vec::new()),
                loads: Cell::new(0),
                fail_create: false,
                fail_cleanup: false,
            }
        }
    }

    impl CheckoutStore for FakeStore {
        fn load_cart(&self, user_id: UserId) -> Result<CartSnapshot, StoreError> {
            self.loads.set(self.loads.get() + 1);
            assert_eq!(user_id, self.user_id);
            Ok(CartSnapshot {
                user_id,
                lines: self.cart.borrow().clone(),
            })
        }

        fn create_order(&self, draft: OrderDraft) -> Result<Order, StoreError> {
            if self.fail_create {
                return Err(StoreError::backend("write refused"));
            }
            let order = Order {
                id: OrderId::new(),
                total: draft.total,
                charge_id: draft.charge_id,
                items: draft
                    .items
                    .into_iter()
                    .map(|i| OrderItem {
                        id: winkel_core::OrderItemId::new(),
                        name: i.name,
                        description: i.description,
                        price: i.price,
                        quantity: i.quantity,
                        photo: i.photo,
                    })
                    .collect(),
                user_id: draft.user_id,
                created_at: Utc::now(),
            };
            self.orders.borrow_mut().push(order.clone());
            Ok(order)
        }

        fn delete_cart_items(&self, ids: &[CartItemId]) -> Result<(), StoreError> {
            if self.fail_cleanup {
                return Err(StoreError::backend("delete refused"));
            }
            self.cart.borrow_mut().retain(|line| !ids.contains(&line.id));
            Ok(())
        }
    }

    /// Gateway fake: captures succeed unless a decline message is set.
    struct FakeGateway {
        decline: Option<String>,
        captures: Cell<u32>,
        last_request: RefCell<Option<CaptureRequest>>,
    }

    impl FakeGateway {
        fn approving() -> Self {
            Self {
                decline: None,
                captures: Cell::new(0),
                last_request: RefCell::new(None),
            }
        }

        fn declining(message: &str) -> Self {
            Self {
                decline: Some(message.to_string()),
                ..Self::approving()
            }
        }
    }

    impl PaymentGateway for FakeGateway {
        fn capture(&self, request: CaptureRequest) -> Result<Charge, PaymentError> {
            self.captures.set(self.captures.get() + 1);
            let amount = request.amount;
            *self.last_request.borrow_mut() = Some(request);
            match &self.decline {
                Some(message) => Err(PaymentError::new(message.clone())),
                None => Ok(Charge {
                    id: ChargeId::new("ch_fake"),
                    amount,
                    status: ChargeStatus::Succeeded,
                    created_at: Utc::now(),
                }),
            }
        }
    }

    fn signed_in(user_id: UserId) -> Session {
        Session::SignedIn(SessionData {
            user_id,
            name: "shopper".to_string(),
            role: RoleClaims::None,
        })
    }

    fn line(quantity: i64, price: Option<Amount>) -> CartLine {
        CartLine {
            id: CartItemId::new(),
            quantity,
            product: price.map(|price| ProductSnapshot {
                id: ProductId::new(),
                name: "item".to_string(),
                description: String::new(),
                price,
                photo: None,
            }),
        }
    }

    // ── Tests ───────────────────────────────────────────────────────────

    #[test]
    fn worked_example_prices_survivors_and_clears_everything() {
        // cart = [{qty:2, price:500}, {qty:1, product deleted}] → total 1000,
        // order of one item, both lines deleted.
        let user_id = UserId::new();
        let store = FakeStore::with_cart(user_id, vec![line(2, Some(500)), line(1, None)]);
        let gateway = FakeGateway::approving();

        let order = checkout(&store, &gateway, &signed_in(user_id), "tok_visa").unwrap();

        assert_eq!(order.total, 1000);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items_total(), 1000);
        assert_eq!(order.charge_id, ChargeId::new("ch_fake"));
        assert_eq!(order.user_id, user_id);
        assert!(store.cart.borrow().is_empty(), "dangling line must be cleared too");
    }

    #[test]
    fn capture_request_carries_fixed_currency_and_token() {
        let user_id = UserId::new();
        let store = FakeStore::with_cart(user_id, vec![line(1, Some(250))]);
        let gateway = FakeGateway::approving();

        checkout(&store, &gateway, &signed_in(user_id), "tok_mc").unwrap();

        let request = gateway.last_request.borrow().clone().unwrap();
        assert_eq!(request.currency, "EUR");
        assert_eq!(request.payment_method, "tok_mc");
        assert!(request.confirm);
        assert_eq!(request.amount, 250);
    }

    #[test]
    fn unauthenticated_fails_before_any_call() {
        let store = FakeStore::with_cart(UserId::new(), vec![line(1, Some(100))]);
        let gateway = FakeGateway::approving();

        let err = checkout(&store, &gateway, &Session::Anonymous, "tok").unwrap_err();

        assert_eq!(err, CheckoutError::Unauthenticated);
        assert_eq!(store.loads.get(), 0);
        assert_eq!(gateway.captures.get(), 0);
    }

    #[test]
    fn declined_payment_leaves_cart_and_orders_untouched() {
        let user_id = UserId::new();
        let store = FakeStore::with_cart(user_id, vec![line(2, Some(300))]);
        let gateway = FakeGateway::declining("card declined");

        let err = checkout(&store, &gateway, &signed_in(user_id), "tok").unwrap_err();

        assert_eq!(err, CheckoutError::PaymentFailed("card declined".to_string()));
        assert!(store.orders.borrow().is_empty());
        assert_eq!(store.cart.borrow().len(), 1);
    }

    #[test]
    fn order_write_failure_surfaces_the_captured_charge() {
        let user_id = UserId::new();
        let mut store = FakeStore::with_cart(user_id, vec![line(1, Some(900))]);
        store.fail_create = true;
        let gateway = FakeGateway::approving();

        let err = checkout(&store, &gateway, &signed_in(user_id), "tok").unwrap_err();

        match err {
            CheckoutError::OrderCreationFailed { charge_id, .. } => {
                assert_eq!(charge_id, ChargeId::new("ch_fake"));
            }
            other => panic!("expected OrderCreationFailed, got {other:?}"),
        }
        // Money moved; the cart must not have been cleared.
        assert_eq!(store.cart.borrow().len(), 1);
    }

    #[test]
    fn cleanup_failure_still_names_the_created_order() {
        let user_id = UserId::new();
        let mut store = FakeStore::with_cart(user_id, vec![line(1, Some(100))]);
        store.fail_cleanup = true;
        let gateway = FakeGateway::approving();

        let err = checkout(&store, &gateway, &signed_in(user_id), "tok").unwrap_err();

        let orders = store.orders.borrow();
        assert_eq!(orders.len(), 1);
        match err {
            CheckoutError::CartCleanupFailed { order_id, .. } => {
                assert_eq!(order_id, orders[0].id);
            }
            other => panic!("expected CartCleanupFailed, got {other:?}"),
        }
    }

    #[test]
    fn empty_cart_checks_out_as_a_zero_charge() {
        // Nothing blocks an empty cart; the gateway is asked for a zero
        // amount and decides for itself.
        let user_id = UserId::new();
        let store = FakeStore::with_cart(user_id, vec![]);
        let gateway = FakeGateway::approving();

        let order = checkout(&store, &gateway, &signed_in(user_id), "tok").unwrap();
        assert_eq!(order.total, 0);
        assert!(order.items.is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_lines() -> impl Strategy<Value = Vec<CartLine>> {
            proptest::collection::vec(
                (1i64..20, proptest::option::of(1i64..5_000))
                    .prop_map(|(quantity, price)| line(quantity, price)),
                0..10,
            )
        }

        proptest! {
            /// Order total always equals the charge amount and the sum of
            /// snapshotted item subtotals, for any mix of live and dangling
            /// lines.
            #[test]
            fn order_total_equals_charge_amount(lines in arb_lines()) {
                let user_id = UserId::new();
                let expected: Amount = lines
                    .iter()
                    .filter_map(|l| l.product.as_ref().map(|p| l.quantity * p.price))
                    .sum();
                let store = FakeStore::with_cart(user_id, lines);
                let gateway = FakeGateway::approving();

                let order = checkout(&store, &gateway, &signed_in(user_id), "tok").unwrap();

                prop_assert_eq!(order.total, expected);
                prop_assert_eq!(order.items_total(), expected);
                prop_assert!(store.cart.borrow().is_empty());
            }
        }
    }
}
