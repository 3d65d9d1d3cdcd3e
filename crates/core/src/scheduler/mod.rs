//! Scheduler module - the daily recurring savings debit batch.

mod runner;
mod scheduler_model;
mod scheduler_service;
mod scheduler_traits;


pub use runner::{duration_until_next_run, spawn_daily_batch, SchedulerConfig};
pub use scheduler_model::{DailyBatchResult, GoalFunding};
pub use scheduler_service::RecurringPaymentService;
pub use scheduler_traits::RecurringPaymentServiceTrait;
