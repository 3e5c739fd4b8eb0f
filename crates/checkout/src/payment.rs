//! Payment gateway port.
//!
//! The gateway is a black box: one blocking capture call that either returns
//! a captured charge or fails with the provider's message. No retries and no
//! client-side timeout live at this layer; callers impose their own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use winkel_core::{Amount, ChargeId};

/// A single synchronous capture request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRequest {
    pub amount: Amount,
    /// Fixed per deployment; see [`winkel_core::CURRENCY`].
    pub currency: String,
    /// Opaque payment-method token collected client-side.
    pub payment_method: String,
    /// Capture immediately rather than authorize-only.
    pub confirm: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    Succeeded,
}

/// The gateway's record of captured funds. Immutable once returned;
/// referenced by exactly one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    pub id: ChargeId,
    pub amount: Amount,
    pub status: ChargeStatus,
    pub created_at: DateTime<Utc>,
}

/// Adapter failure (decline, network, anything). The provider's message is
/// carried verbatim to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct PaymentError {
    pub message: String,
}

impl PaymentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// External payment capture boundary.
pub trait PaymentGateway {
    /// Capture funds. Blocking; any failure aborts the checkout with no
    /// partial order created.
    fn capture(&self, request: CaptureRequest) -> Result<Charge, PaymentError>;
}
