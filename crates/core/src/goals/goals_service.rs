use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use rust_decimal::Decimal;

use super::goals_model::{RecurringSavingsSetup, SavingsGoal};
use super::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use super::schedule_model::ScheduleDescriptor;
use crate::errors::{Error, Result, ValidationError};

pub struct GoalService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
}

impl GoalService {
    pub fn new(goal_repository: Arc<dyn GoalRepositoryTrait>) -> Self {
        Self { goal_repository }
    }

    async fn load_owned(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal> {
        let goal_ids = [goal_id.to_string()];
        self.goal_repository
            .list_by_ids_for_owner(&goal_ids, user_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("Savings goal {}", goal_id)))
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    async fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal> {
        self.load_owned(user_id, goal_id).await
    }

    async fn setup_recurring_savings(
        &self,
        user_id: &str,
        setup: RecurringSavingsSetup,
    ) -> Result<SavingsGoal> {
        if setup.savings_amount <= Decimal::ZERO {
            return Err(Error::invalid_input(
                "Savings amount must be greater than zero",
            ));
        }
        let token = setup.external_account_token.trim();
        if token.is_empty() {
            return Err(ValidationError::MissingField("externalAccountToken".to_string()).into());
        }
        let schedule = ScheduleDescriptor::from_setup(&setup.interval, setup.start_date)?;

        let mut goal = self.load_owned(user_id, &setup.goal_id).await?;
        debug!(
            "Setting up {:?} savings of {} for goal {}",
            schedule.interval, setup.savings_amount, goal.id
        );
        goal.schedule = Some(schedule);
        goal.savings_amount = setup.savings_amount;
        goal.external_account_token = Some(token.to_string());
        goal.updated_at = Utc::now();

        let saved = self.goal_repository.save(goal).await?;
        info!("Recurring savings configured for goal {}", saved.id);
        Ok(saved)
    }

    async fn set_paused(&self, user_id: &str, goal_id: &str, paused: bool) -> Result<SavingsGoal> {
        let mut goal = self.load_owned(user_id, goal_id).await?;
        if goal.is_paused == paused {
            return Ok(goal);
        }
        goal.is_paused = paused;
        goal.updated_at = Utc::now();
        self.goal_repository.save(goal).await
    }
}
