//! User domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Onboarding status as reported by the banking provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum UserStatus {
    #[default]
    Pending,
    AwaitingDocuments,
    PendingReview,
    Approved,
    Denied,
}

/// Domain model representing an account holder.
///
/// The provider identifiers fill in over time: application, then customer,
/// then the deposit account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub status: UserStatus,
    pub ledger_application_id: Option<String>,
    pub ledger_customer_id: Option<String>,
    pub ledger_account_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            email: email.into(),
            status: UserStatus::Pending,
            ledger_application_id: None,
            ledger_customer_id: None,
            ledger_account_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}
