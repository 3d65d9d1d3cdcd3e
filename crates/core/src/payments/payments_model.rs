//! Payment gateway request models and inbound payment status events.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Converts a decimal currency amount to integer minor units (cents).
///
/// Amounts are rounded half away from zero to two places first, so
/// `10.005` becomes `1001`.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    let cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        * Decimal::ONE_HUNDRED;
    cents
        .to_i64()
        .ok_or_else(|| Error::invalid_input(format!("Amount {} is out of range", amount)))
}

/// Pull funds from a linked external bank account into a ledger account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitRequest {
    /// Amount in minor units.
    pub amount: i64,
    /// Processor token of the external account being debited.
    pub source_token: String,
    pub destination_account_id: String,
    pub description: String,
    pub idempotency_key: String,
    pub tags: BTreeMap<String, String>,
}

/// Push funds from a ledger account out to a linked external bank account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRequest {
    /// Amount in minor units.
    pub amount: i64,
    pub source_account_id: String,
    /// Processor token of the external account being credited.
    pub destination_token: String,
    pub description: String,
    pub idempotency_key: String,
    pub tags: BTreeMap<String, String>,
}

/// Open a deposit account for an approved customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAccountRequest {
    pub customer_id: String,
    pub idempotency_key: String,
    pub tags: BTreeMap<String, String>,
}

/// Settlement progress reported by the provider for a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentEventKind {
    Clearing,
    Sent,
    Returned,
    Rejected,
    Canceled,
}

impl PaymentEventKind {
    /// Parses the provider's event type, e.g. `payment.sent`.
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "payment.clearing" => Some(PaymentEventKind::Clearing),
            "payment.sent" => Some(PaymentEventKind::Sent),
            "payment.returned" => Some(PaymentEventKind::Returned),
            "payment.rejected" => Some(PaymentEventKind::Rejected),
            "payment.canceled" => Some(PaymentEventKind::Canceled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEvent {
    pub payment_id: String,
    pub kind: PaymentEventKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEventOutcome {
    pub goals_updated: usize,
    pub transfers_updated: usize,
}
