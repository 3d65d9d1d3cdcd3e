//! Payment gateway and payment status service traits.

use async_trait::async_trait;

use super::payments_model::{
    CreditRequest, DebitRequest, DepositAccountRequest, PaymentEvent, PaymentEventOutcome,
};
use crate::errors::Result;

/// Contract the core needs from the banking provider.
///
/// Implementations are injected into each service at construction. Every
/// call is synchronous from the caller's point of view and fails with
/// `Error::Gateway` on transport, validation or provider failure. The
/// provider deduplicates on the supplied idempotency keys.
#[async_trait]
pub trait PaymentGatewayTrait: Send + Sync {
    /// Creates a debit and returns the provider's payment id.
    async fn create_debit(&self, request: &DebitRequest) -> Result<String>;

    /// Creates a credit and returns the provider's payment id.
    async fn create_credit(&self, request: &CreditRequest) -> Result<String>;

    /// Opens a ledger deposit account and returns its id.
    async fn create_deposit_account(&self, request: &DepositAccountRequest) -> Result<String>;
}

#[async_trait]
pub trait PaymentStatusServiceTrait: Send + Sync {
    /// Moves pending transfers recorded against the event's payment to their
    /// settled status.
    async fn apply_payment_event(&self, event: &PaymentEvent) -> Result<PaymentEventOutcome>;
}
