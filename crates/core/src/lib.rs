//! Nestegg Core - savings goals, recurring funding and account lifecycle.
//!
//! This crate holds the business rules and is agnostic of both the document
//! store and the banking provider. It defines the traits those collaborators
//! implement and injects them into each service at construction.

pub mod errors;
pub mod goals;
pub mod payments;
pub mod scheduler;
pub mod transfers;
pub mod users;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
