use async_trait::async_trait;

use super::goals_model::{RecurringSavingsSetup, SavingsGoal};
use crate::errors::Result;
use crate::utils::DayOfWeek;

/// Trait for savings goal persistence.
///
/// Backed by a per-document store: `save` is an upsert of one goal and no
/// multi-goal transaction is assumed.
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    /// Goals whose schedule fires on `day_of_month` OR on `day_of_week`.
    async fn list_scheduled_for(
        &self,
        day_of_month: u32,
        day_of_week: DayOfWeek,
    ) -> Result<Vec<SavingsGoal>>;

    /// Goals among `goal_ids` owned by `owner_id`. Ids that are unknown or
    /// owned by someone else are simply absent from the result.
    async fn list_by_ids_for_owner(
        &self,
        goal_ids: &[String],
        owner_id: &str,
    ) -> Result<Vec<SavingsGoal>>;

    /// Goals holding at least one transfer for the provider payment.
    async fn list_by_payment_id(&self, payment_id: &str) -> Result<Vec<SavingsGoal>>;

    async fn save(&self, goal: SavingsGoal) -> Result<SavingsGoal>;
}

/// Trait for savings goal service operations.
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    async fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal>;

    async fn setup_recurring_savings(
        &self,
        user_id: &str,
        setup: RecurringSavingsSetup,
    ) -> Result<SavingsGoal>;

    async fn set_paused(&self, user_id: &str, goal_id: &str, paused: bool) -> Result<SavingsGoal>;
}
