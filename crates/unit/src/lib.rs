//! Nestegg Unit - banking provider adapter.
//!
//! Implements the core payment gateway contract against the Unit REST API
//! and turns Unit webhook deliveries into core lifecycle and payment events.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nestegg_unit::{UnitClient, UnitConfig};
//!
//! let config = UnitConfig::from_env()?;
//! let gateway = Arc::new(UnitClient::new(&config)?);
//! let scheduler = RecurringPaymentService::new(goals, users, gateway.clone());
//! ```

mod client;
mod config;
mod error;
mod types;
mod webhook;

pub use client::UnitClient;
pub use config::UnitConfig;
pub use error::{Result, UnitError};
pub use types::*;
pub use webhook::{decode_webhook, WebhookDispatcher, WebhookEvent, WebhookSummary};
