//! Background task that fires the daily savings batch.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use super::scheduler_traits::RecurringPaymentServiceTrait;

const DEFAULT_RUN_AT_HOUR_UTC: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Hour of the day (UTC, 0..=23) at which the batch runs.
    pub run_at_hour_utc: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            run_at_hour_utc: DEFAULT_RUN_AT_HOUR_UTC,
        }
    }
}

/// Time left until the next `hour:00` UTC strictly after `now`.
///
/// Hours outside 0..=23 fall back to the default run hour.
pub fn duration_until_next_run(now: DateTime<Utc>, hour: u32) -> Duration {
    let run_time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_else(|| {
        NaiveTime::from_hms_opt(DEFAULT_RUN_AT_HOUR_UTC, 0, 0).unwrap_or_default()
    });
    let today_run = now.date_naive().and_time(run_time).and_utc();
    let next_run = if today_run > now {
        today_run
    } else {
        today_run + ChronoDuration::days(1)
    };
    (next_run - now).to_std().unwrap_or_default()
}

/// Spawns a task that runs the batch once a day at the configured hour.
pub fn spawn_daily_batch(
    service: Arc<dyn RecurringPaymentServiceTrait>,
    config: SchedulerConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Savings scheduler started (daily at {:02}:00 UTC)",
            config.run_at_hour_utc
        );
        loop {
            let wait = duration_until_next_run(Utc::now(), config.run_at_hour_utc);
            tokio::time::sleep(wait).await;

            match service.run_daily_batch(Utc::now()).await {
                Ok(result) if result.failed > 0 => warn!(
                    "Savings batch for {} had {} failed goals",
                    result.date, result.failed
                ),
                Ok(result) => info!(
                    "Savings batch for {} processed {} goals",
                    result.date,
                    result.processed()
                ),
                Err(e) => error!("Savings batch could not run: {}", e),
            }
        }
    })
}
