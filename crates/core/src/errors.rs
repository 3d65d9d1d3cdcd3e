//! Core error types for Nestegg.
//!
//! This module defines storage- and provider-agnostic error types. Concrete
//! stores and the banking provider adapter convert their own failures into
//! these types at the trait boundary.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the savings core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payment gateway failed: {0}")]
    Gateway(#[from] GatewayError),

    /// The external payment went through but some goals could not record it.
    #[error(
        "Payment {payment_id} (batch {batch_id}) was issued but not recorded on goals: {}",
        .failed_goal_ids.join(", ")
    )]
    PartialPersistence {
        batch_id: String,
        payment_id: String,
        failed_goal_ids: Vec<String>,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True for errors caused by the caller's request (bad input, unknown or
    /// foreign records). These are never retried.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::NotFound(_))
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Error::Validation(ValidationError::InvalidInput(message.into()))
    }
}

/// Storage-agnostic error type for ledger store operations.
///
/// Everything is carried as a `String` so document-store drivers can convert
/// their own error types without this crate depending on them.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    #[error("Store query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    /// A concurrent writer won the optimistic save.
    #[error("Write conflict: {0}")]
    WriteConflict(String),

    #[error("Internal store error: {0}")]
    Internal(String),
}

/// Errors surfaced by the payment gateway / banking provider.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Request rejected before sending: {0}")]
    Rejected(String),
}

/// Validation errors for client input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
