//! Transfers module - moving saved money from goals back to the user's bank.

mod transfers_model;
mod transfers_service;
mod transfers_traits;
mod validation;


pub use transfers_model::{Allocation, TransferBackRequest, TransferBackResult};
pub use transfers_service::TransferBackService;
pub use transfers_traits::TransferBackServiceTrait;
pub use validation::validate_allocations;
