use async_trait::async_trait;

use super::lifecycle_model::{LifecycleEvent, LifecycleOutcome};
use super::users_model::User;
use crate::errors::Result;

/// Trait for user persistence.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn get_by_id(&self, user_id: &str) -> Result<Option<User>>;

    /// Looks a user up by the provider's application id.
    async fn get_by_application_id(&self, application_id: &str) -> Result<Option<User>>;

    /// Upserts one user document.
    async fn save(&self, user: User) -> Result<User>;
}

/// Consumes provider lifecycle events one at a time, in delivery order.
#[async_trait]
pub trait AccountLifecycleServiceTrait: Send + Sync {
    async fn apply_event(&self, event: LifecycleEvent) -> Result<LifecycleOutcome>;

    /// Parses a raw event type and flat payload, then applies it.
    async fn apply_lifecycle_event(
        &self,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<LifecycleOutcome>;
}
