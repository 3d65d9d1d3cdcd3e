use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use rust_decimal::Decimal;

use super::scheduler_model::{DailyBatchResult, GoalFunding};
use super::scheduler_traits::RecurringPaymentServiceTrait;
use crate::errors::Result;
use crate::goals::{GoalRepositoryTrait, SavingsGoal, Transfer};
use crate::payments::{
    scheduled_debit_idempotency_key, to_minor_units, DebitRequest, PaymentGatewayTrait,
};
use crate::users::UserRepositoryTrait;
use crate::utils::{calendar_day_from_utc, CalendarDay};

const DEBIT_DESCRIPTION: &str = "Savings";

fn skipped(reason: impl Into<String>) -> GoalFunding {
    GoalFunding::Skipped {
        reason: reason.into(),
    }
}

/// Pulls each due goal's recurring amount from its linked bank account.
///
/// Goals are processed one after another with no cross-goal transaction.
pub struct RecurringPaymentService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
    gateway: Arc<dyn PaymentGatewayTrait>,
}

impl RecurringPaymentService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
        gateway: Arc<dyn PaymentGatewayTrait>,
    ) -> Self {
        Self {
            goal_repository,
            user_repository,
            gateway,
        }
    }

    /// Debits one goal and appends the pending transfer.
    async fn fund_goal(&self, mut goal: SavingsGoal, day: &CalendarDay) -> Result<GoalFunding> {
        if goal.is_paused {
            return Ok(skipped("goal is paused"));
        }
        if !goal.is_due(day) {
            return Ok(skipped("goal is not due today"));
        }
        if goal.savings_amount <= Decimal::ZERO {
            return Ok(skipped("no savings amount configured"));
        }
        let Some(source_token) = goal.external_account_token.clone() else {
            return Ok(skipped("no linked external account"));
        };

        let Some(user) = self.user_repository.get_by_id(&goal.user_id).await? else {
            return Ok(skipped("owner not found"));
        };
        let Some(destination_account_id) = user.ledger_account_id else {
            return Ok(skipped("owner has no ledger account"));
        };

        let request = DebitRequest {
            amount: to_minor_units(goal.savings_amount)?,
            source_token,
            destination_account_id,
            description: DEBIT_DESCRIPTION.to_string(),
            idempotency_key: scheduled_debit_idempotency_key(&goal.id, day.date),
            tags: BTreeMap::from([
                ("goalId".to_string(), goal.id.clone()),
                ("userId".to_string(), goal.user_id.clone()),
            ]),
        };
        let payment_id = self.gateway.create_debit(&request).await?;

        goal.append_transfer(Transfer::pending_debit(
            payment_id.clone(),
            goal.savings_amount,
            Utc::now(),
        ));
        self.goal_repository.save(goal).await?;

        Ok(GoalFunding::Debited { payment_id })
    }
}

#[async_trait]
impl RecurringPaymentServiceTrait for RecurringPaymentService {
    async fn run_daily_batch(&self, reference: DateTime<Utc>) -> Result<DailyBatchResult> {
        let day = calendar_day_from_utc(reference);
        let goals = self
            .goal_repository
            .list_scheduled_for(day.day_of_month, day.day_of_week)
            .await?;

        let mut result = DailyBatchResult::new(day.date);
        result.matched = goals.len();
        info!(
            "Daily savings batch for {} (day {} / {}): {} goals matched",
            day.date,
            day.day_of_month,
            day.day_of_week,
            goals.len()
        );

        for goal in goals {
            let goal_id = goal.id.clone();
            match self.fund_goal(goal, &day).await {
                Ok(funding) => {
                    match &funding {
                        GoalFunding::Debited { payment_id } => {
                            debug!("Goal {} debited, payment {}", goal_id, payment_id)
                        }
                        GoalFunding::Skipped { reason } => {
                            debug!("Goal {} skipped: {}", goal_id, reason)
                        }
                    }
                    result.add_funding(&funding);
                }
                Err(e) => {
                    error!("Failed to fund goal {}: {}", goal_id, e);
                    result.add_failure(&goal_id, e.to_string());
                }
            }
        }

        info!(
            "Daily savings batch for {} finished: {} debited, {} skipped, {} failed",
            result.date, result.debited, result.skipped, result.failed
        );
        Ok(result)
    }
}
