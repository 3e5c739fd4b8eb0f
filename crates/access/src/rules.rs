//! Resource-scoped access rules.
//!
//! One decision function per governed resource-operation. Each combines the
//! same three steps: sign-in gate, governing-permission check, and a
//! resource-specific narrowing filter. The functions are independent of each
//! other, so adding a rule for a new resource touches nothing here.
//!
//! Decisions are produced fresh per call and never persisted; the
//! data-access layer merges a returned filter into its query.

use serde::{Deserialize, Serialize};

use winkel_catalog::ProductStatus;
use winkel_core::UserId;

use crate::{Permission, PermissionTable, Session};

/// A predicate narrowing which records a caller may act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordFilter {
    /// Record's owning user id equals the caller's id.
    OwnerIs { user: UserId },
    /// Owning order's user id equals the caller's id (one level of
    /// indirection, for order items).
    OrderOwnerIs { user: UserId },
    /// The record itself is the caller (self-service only).
    RecordIs { id: UserId },
    /// Record status equals the given status (ownership irrelevant).
    StatusIs { status: ProductStatus },
}

/// Outcome of a rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Deny,
    Allow,
    Filtered(RecordFilter),
}

impl AccessDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    pub fn is_deny(&self) -> bool {
        matches!(self, AccessDecision::Deny)
    }
}

/// Shared rule shape: deny the anonymous, allow the governing permission,
/// otherwise narrow to the caller's own records.
fn decide(
    table: &PermissionTable,
    session: &Session,
    governing: Permission,
    narrow: impl FnOnce(UserId) -> RecordFilter,
) -> AccessDecision {
    let Some(caller) = session.user_id() else {
        return AccessDecision::Deny;
    };
    if table.check(governing, session) {
        return AccessDecision::Allow;
    }
    AccessDecision::Filtered(narrow(caller))
}

/// May the caller create/update/delete products?
pub fn can_manage_products(table: &PermissionTable, session: &Session) -> AccessDecision {
    decide(table, session, Permission::CanManageProducts, |caller| {
        RecordFilter::OwnerIs { user: caller }
    })
}

/// May the caller read products? Managers read everything; everyone else
/// only sees available products, regardless of ownership.
pub fn can_read_products(table: &PermissionTable, session: &Session) -> AccessDecision {
    decide(table, session, Permission::CanManageProducts, |_| {
        RecordFilter::StatusIs {
            status: ProductStatus::Available,
        }
    })
}

/// May the caller act on orders and cart items?
pub fn can_order(table: &PermissionTable, session: &Session) -> AccessDecision {
    decide(table, session, Permission::CanManageCart, |caller| {
        RecordFilter::OwnerIs { user: caller }
    })
}

/// May the caller act on order items? Ownership runs through the owning
/// order.
pub fn can_manage_order_items(table: &PermissionTable, session: &Session) -> AccessDecision {
    decide(table, session, Permission::CanManageCart, |caller| {
        RecordFilter::OrderOwnerIs { user: caller }
    })
}

/// May the caller act on user records? Without the management permission,
/// self-service only.
pub fn can_manage_users(table: &PermissionTable, session: &Session) -> AccessDecision {
    decide(table, session, Permission::CanManageUsers, |caller| {
        RecordFilter::RecordIs { id: caller }
    })
}
