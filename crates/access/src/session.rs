//! Per-request identity/claims context.
//!
//! Sessions are supplied by the (out-of-scope) authentication layer and are
//! never persisted or mutated here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use winkel_core::UserId;

use crate::Permission;

/// The claims a session's role grants.
///
/// Absence of a role is its own typed state rather than a nullable chain:
/// a signed-in user with no role carries `RoleClaims::None` and fails every
/// permission check without any special-casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoleClaims {
    #[default]
    None,
    Granted(HashSet<Permission>),
}

impl RoleClaims {
    pub fn grants(&self, permission: Permission) -> bool {
        match self {
            RoleClaims::None => false,
            RoleClaims::Granted(claims) => claims.contains(&permission),
        }
    }
}

/// Identity data of a signed-in caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: UserId,
    pub name: String,
    pub role: RoleClaims,
}

/// Per-request session context.
///
/// An unauthenticated request is `Anonymous`; there is no half-signed-in
/// state, so every rule's sign-in gate is a single match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Session {
    Anonymous,
    SignedIn(SessionData),
}

impl Session {
    pub fn signed_in(&self) -> bool {
        matches!(self, Session::SignedIn(_))
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Session::Anonymous => None,
            Session::SignedIn(data) => Some(data.user_id),
        }
    }

    pub fn data(&self) -> Option<&SessionData> {
        match self {
            Session::Anonymous => None,
            Session::SignedIn(data) => Some(data),
        }
    }

    /// Whether this session's role grants the given claim.
    ///
    /// Anonymous sessions grant nothing.
    pub fn has_claim(&self, permission: Permission) -> bool {
        self.data().is_some_and(|d| d.role.grants(permission))
    }
}
