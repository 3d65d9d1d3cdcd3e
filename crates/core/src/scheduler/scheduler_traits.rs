use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::scheduler_model::DailyBatchResult;
use crate::errors::Result;

#[async_trait]
pub trait RecurringPaymentServiceTrait: Send + Sync {
    /// Debits every goal due on the calendar day of `reference`.
    ///
    /// Per-goal failures are recorded in the result and never abort the
    /// batch. An error is returned only when the due goals cannot be listed.
    async fn run_daily_batch(&self, reference: DateTime<Utc>) -> Result<DailyBatchResult>;
}
