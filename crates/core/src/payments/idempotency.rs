//! Idempotency keys handed to the banking provider.
//!
//! Keys are derived from stable inputs so that a retried or overlapping
//! invocation produces the same key and the provider can drop the duplicate.

use chrono::{DateTime, NaiveDate, Utc};
use sha2::{Digest, Sha256};

fn fingerprint(scope: &str, parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(scope.as_bytes());
    for part in parts {
        hasher.update(b"|");
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Key for the recurring debit of a goal on a given schedule date.
pub fn scheduled_debit_idempotency_key(goal_id: &str, schedule_date: NaiveDate) -> String {
    let date = schedule_date.format("%Y-%m-%d").to_string();
    fingerprint("scheduled-debit", &[goal_id, &date])
}

/// Key for the deposit account opened when the provider reports a customer.
///
/// `created_at` is the provider event's timestamp, which is stable across
/// webhook redeliveries.
pub fn deposit_account_idempotency_key(user_id: &str, created_at: DateTime<Utc>) -> String {
    let timestamp = created_at.to_rfc3339();
    fingerprint("deposit-account", &[user_id, &timestamp])
}
