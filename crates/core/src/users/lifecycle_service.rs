use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};

use super::lifecycle_model::{LifecycleEvent, LifecycleOutcome};
use super::users_model::{User, UserStatus};
use super::users_traits::{AccountLifecycleServiceTrait, UserRepositoryTrait};
use crate::errors::Result;
use crate::payments::{deposit_account_idempotency_key, DepositAccountRequest, PaymentGatewayTrait};

/// Advances users through onboarding as provider events arrive.
///
/// Transitions are not validated against the current status: whatever event
/// arrives is applied, last write wins. The only side effect is the deposit
/// account opened on `customer.created`, which is keyed for idempotency.
pub struct AccountLifecycleService {
    user_repository: Arc<dyn UserRepositoryTrait>,
    gateway: Arc<dyn PaymentGatewayTrait>,
}

impl AccountLifecycleService {
    pub fn new(
        user_repository: Arc<dyn UserRepositoryTrait>,
        gateway: Arc<dyn PaymentGatewayTrait>,
    ) -> Self {
        Self {
            user_repository,
            gateway,
        }
    }

    async fn set_status(&self, mut user: User, status: UserStatus) -> Result<LifecycleOutcome> {
        debug!("User {} status {:?} -> {:?}", user.id, user.status, status);
        user.status = status;
        user.updated_at = Utc::now();
        let saved = self.user_repository.save(user).await?;
        Ok(LifecycleOutcome::StatusChanged {
            user_id: saved.id,
            status: saved.status,
        })
    }

    async fn on_customer_created(
        &self,
        mut user: User,
        customer_id: String,
        created_at: DateTime<Utc>,
    ) -> Result<LifecycleOutcome> {
        user.status = UserStatus::Approved;
        user.ledger_customer_id = Some(customer_id.clone());
        user.updated_at = Utc::now();

        let request = DepositAccountRequest {
            customer_id,
            idempotency_key: deposit_account_idempotency_key(&user.id, created_at),
            tags: BTreeMap::from([("userId".to_string(), user.id.clone())]),
        };

        match self.gateway.create_deposit_account(&request).await {
            Ok(account_id) => {
                info!("Opened deposit account {} for user {}", account_id, user.id);
                user.ledger_account_id = Some(account_id.clone());
                let saved = self.user_repository.save(user).await?;
                Ok(LifecycleOutcome::AccountProvisioned {
                    user_id: saved.id,
                    account_id,
                })
            }
            Err(e) => {
                error!(
                    "Failed to open deposit account for user {}: {}. Reverting status to pending",
                    user.id, e
                );
                user.status = UserStatus::Pending;
                if let Err(save_err) = self.user_repository.save(user).await {
                    error!("Failed to persist status rollback: {}", save_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl AccountLifecycleServiceTrait for AccountLifecycleService {
    async fn apply_event(&self, event: LifecycleEvent) -> Result<LifecycleOutcome> {
        let Some(application_id) = event.application_id() else {
            warn!("Ignoring unrecognized lifecycle event '{}'", event.event_type());
            return Ok(LifecycleOutcome::Unrecognized {
                event_type: event.event_type().to_string(),
            });
        };

        let Some(user) = self
            .user_repository
            .get_by_application_id(application_id)
            .await?
        else {
            info!(
                "No user for application {}, dropping '{}'",
                application_id,
                event.event_type()
            );
            return Ok(LifecycleOutcome::NoMatchingUser {
                application_id: application_id.to_string(),
            });
        };

        if let Some(status) = event.target_status() {
            return self.set_status(user, status).await;
        }

        match event {
            LifecycleEvent::CustomerCreated {
                customer_id,
                created_at,
                ..
            } => self.on_customer_created(user, customer_id, created_at).await,
            LifecycleEvent::DocumentApproved { .. } => {
                debug!("Document approved for user {}", user.id);
                Ok(LifecycleOutcome::Informational)
            }
            other => {
                warn!("Unhandled lifecycle event '{}'", other.event_type());
                Ok(LifecycleOutcome::Unrecognized {
                    event_type: other.event_type().to_string(),
                })
            }
        }
    }

    async fn apply_lifecycle_event(
        &self,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<LifecycleOutcome> {
        let event = LifecycleEvent::from_parts(event_type, payload)?;
        self.apply_event(event).await
    }
}
