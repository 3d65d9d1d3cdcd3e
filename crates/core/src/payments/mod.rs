//! Payments module - gateway contract, payment requests and status events.

mod idempotency;
mod payment_status_service;
mod payments_model;
mod payments_traits;


pub use idempotency::{deposit_account_idempotency_key, scheduled_debit_idempotency_key};
pub use payment_status_service::PaymentStatusService;
pub use payments_model::{
    to_minor_units, CreditRequest, DebitRequest, DepositAccountRequest, PaymentEvent,
    PaymentEventKind, PaymentEventOutcome,
};
pub use payments_traits::{PaymentGatewayTrait, PaymentStatusServiceTrait};
