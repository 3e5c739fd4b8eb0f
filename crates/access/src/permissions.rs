//! Permission table: named boolean capabilities over a session.
//!
//! Every [`Permission`] maps to a total, side-effect-free predicate of the
//! session. Enumerated permissions are claim lookups; custom predicates (like
//! [`Permission::IsAwesome`]) are ordinary entries in the same table, so the
//! rule engine's contract stays uniform.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Session;

/// Named capability checked via the permission table.
///
/// A closed enumeration: the ad-hoc `IsAwesome` predicate is one more variant
/// rather than a special case, and unknown names simply cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    CanManageProducts,
    CanSeeOtherUsers,
    CanManageUsers,
    CanManageRoles,
    CanManageCart,
    CanManageOrders,
    IsAwesome,
}

impl Permission {
    /// Every permission, in declaration order. Used to verify table
    /// completeness at startup.
    pub const ALL: [Permission; 7] = [
        Permission::CanManageProducts,
        Permission::CanSeeOtherUsers,
        Permission::CanManageUsers,
        Permission::CanManageRoles,
        Permission::CanManageCart,
        Permission::CanManageOrders,
        Permission::IsAwesome,
    ];
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Permission::CanManageProducts => "canManageProducts",
            Permission::CanSeeOtherUsers => "canSeeOtherUsers",
            Permission::CanManageUsers => "canManageUsers",
            Permission::CanManageRoles => "canManageRoles",
            Permission::CanManageCart => "canManageCart",
            Permission::CanManageOrders => "canManageOrders",
            Permission::IsAwesome => "isAwesome",
        };
        f.write_str(name)
    }
}

type Predicate = Box<dyn Fn(&Session) -> bool + Send + Sync>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// A permission has no registered predicate. Raised at table build time,
    /// never during evaluation.
    #[error("no predicate registered for permission '{0}'")]
    UnregisteredPermission(Permission),
}

/// Registered map from permission to predicate.
///
/// Built once at process start; [`PermissionTable::check`] is then a pure
/// lookup-and-call, safe to share across threads.
pub struct PermissionTable {
    predicates: HashMap<Permission, Predicate>,
}

impl PermissionTable {
    pub fn builder() -> PermissionTableBuilder {
        PermissionTableBuilder::default()
    }

    /// The standard table: a claim lookup for every enumerated permission,
    /// plus the name-substring predicate backing `IsAwesome`.
    pub fn standard() -> Self {
        let mut predicates: HashMap<Permission, Predicate> = HashMap::new();
        for permission in [
            Permission::CanManageProducts,
            Permission::CanSeeOtherUsers,
            Permission::CanManageUsers,
            Permission::CanManageRoles,
            Permission::CanManageCart,
            Permission::CanManageOrders,
        ] {
            predicates.insert(
                permission,
                Box::new(move |session: &Session| session.has_claim(permission)),
            );
        }
        predicates.insert(
            Permission::IsAwesome,
            Box::new(|session: &Session| {
                session.data().is_some_and(|d| d.name.contains("awesome"))
            }),
        );
        Self { predicates }
    }

    /// Evaluate a permission against a session.
    ///
    /// Total: a missing claim or role is `false`, never an error. An absent
    /// predicate (impossible for a built table) degrades to `false` as the
    /// most restrictive answer.
    pub fn check(&self, permission: Permission, session: &Session) -> bool {
        self.predicates
            .get(&permission)
            .is_some_and(|predicate| predicate(session))
    }
}

impl core::fmt::Debug for PermissionTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PermissionTable")
            .field("registered", &self.predicates.len())
            .finish()
    }
}

/// Builder that refuses to produce a table with unregistered permissions.
#[derive(Default)]
pub struct PermissionTableBuilder {
    predicates: HashMap<Permission, Predicate>,
}

impl PermissionTableBuilder {
    pub fn register(
        mut self,
        permission: Permission,
        predicate: impl Fn(&Session) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates.insert(permission, Box::new(predicate));
        self
    }

    /// Finish the table, rejecting any permission left without a predicate.
    pub fn build(self) -> Result<PermissionTable, AccessError> {
        for permission in Permission::ALL {
            if !self.predicates.contains_key(&permission) {
                return Err(AccessError::UnregisteredPermission(permission));
            }
        }
        Ok(PermissionTable {
            predicates: self.predicates,
        })
    }
}
