use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::transfers_model::{TransferBackRequest, TransferBackResult};
use super::transfers_traits::TransferBackServiceTrait;
use super::validation::{validate_allocations, validate_request_shape};
use crate::errors::{Error, Result};
use crate::goals::{GoalRepositoryTrait, SavingsGoal, Transfer};
use crate::payments::{to_minor_units, CreditRequest, PaymentGatewayTrait};
use crate::users::UserRepositoryTrait;

const CREDIT_DESCRIPTION: &str = "Withdrawal";

/// Returns saved money to the user's bank in one external credit spread over
/// several goals.
///
/// Runs as a saga: validate everything, issue the single credit, then record
/// it on each goal independently.
pub struct TransferBackService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
    gateway: Arc<dyn PaymentGatewayTrait>,
}

impl TransferBackService {
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
}

#[async_trait]
impl TransferBackServiceTrait for TransferBackService {
    async fn reconcile_batch(
        &self,
        user_id: &str,
        request: TransferBackRequest,
    ) -> Result<TransferBackResult> {
        let TransferBackRequest {
            total_amount,
            allocations,
        } = request;
        validate_request_shape(total_amount, &allocations)?;

        let goal_ids: Vec<String> = allocations.iter().map(|a| a.goal_id.clone()).collect();
        let owned_goals = self
            .goal_repository
            .list_by_ids_for_owner(&goal_ids, user_id)
            .await?;
        validate_allocations(total_amount, &allocations, &owned_goals)?;

        let mut goals: HashMap<String, SavingsGoal> = owned_goals
            .into_iter()
            .map(|g| (g.id.clone(), g))
            .collect();

        let destination_token = allocations
            .iter()
            .filter_map(|a| goals.get(&a.goal_id))
            .find_map(|g| g.external_account_token.clone())
            .ok_or_else(|| {
                Error::invalid_input("None of the selected goals has a linked bank account")
            })?;
        let user = self
            .user_repository
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))?;
        let source_account_id = user
            .ledger_account_id
            .ok_or_else(|| Error::NotFound(format!("Ledger account for user {}", user_id)))?;

        let batch_id = Uuid::now_v7().to_string();
        let credit = CreditRequest {
            amount: to_minor_units(total_amount)?,
            source_account_id,
            destination_token,
            description: CREDIT_DESCRIPTION.to_string(),
            idempotency_key: batch_id.clone(),
            tags: BTreeMap::from([
                ("batchId".to_string(), batch_id.clone()),
                ("userId".to_string(), user_id.to_string()),
            ]),
        };
        debug!(
            "Transfer-back batch {}: {} over {} goals",
            batch_id,
            total_amount,
            allocations.len()
        );
        let payment_id = self.gateway.create_credit(&credit).await?;

        let now = Utc::now();
        let mut goals_processed = 0;
        let mut failed_goal_ids = Vec::new();
        for allocation in allocations.iter().filter(|a| a.amount > Decimal::ZERO) {
            let Some(mut goal) = goals.remove(&allocation.goal_id) else {
                continue;
            };
            goal.append_transfer(Transfer::pending_credit(
                payment_id.clone(),
                batch_id.clone(),
                allocation.amount,
                now,
            ));
            match self.goal_repository.save(goal).await {
                Ok(_) => goals_processed += 1,
                Err(e) => {
                    error!(
                        "Payment {} (batch {}) not recorded on goal {}: {}",
                        payment_id, batch_id, allocation.goal_id, e
                    );
                    failed_goal_ids.push(allocation.goal_id.clone());
                }
            }
        }

        if !failed_goal_ids.is_empty() {
            return Err(Error::PartialPersistence {
                batch_id,
                payment_id,
                failed_goal_ids,
            });
        }

        info!(
            "Transfer-back batch {} issued payment {} across {} goals",
            batch_id, payment_id, goals_processed
        );
        Ok(TransferBackResult {
            payment_id,
            batch_id,
            goals_processed,
        })
    }
}
