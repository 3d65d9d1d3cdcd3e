use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::payments_model::{PaymentEvent, PaymentEventKind, PaymentEventOutcome};
use super::payments_traits::PaymentStatusServiceTrait;
use crate::errors::Result;
use crate::goals::{GoalRepositoryTrait, TransferStatus};

/// Applies provider settlement events to the transfers recorded on goals.
pub struct PaymentStatusService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
}

impl PaymentStatusService {
    pub fn new(goal_repository: Arc<dyn GoalRepositoryTrait>) -> Self {
        Self { goal_repository }
    }
}

fn settled_status(kind: &PaymentEventKind) -> Option<TransferStatus> {
    match kind {
        PaymentEventKind::Sent => Some(TransferStatus::Completed),
        PaymentEventKind::Returned | PaymentEventKind::Rejected => Some(TransferStatus::Failed),
        PaymentEventKind::Clearing | PaymentEventKind::Canceled => None,
    }
}

#[async_trait]
impl PaymentStatusServiceTrait for PaymentStatusService {
    async fn apply_payment_event(&self, event: &PaymentEvent) -> Result<PaymentEventOutcome> {
        let Some(status) = settled_status(&event.kind) else {
            debug!("Payment {} is {:?}, nothing to settle", event.payment_id, event.kind);
            return Ok(PaymentEventOutcome::default());
        };

        let goals = self
            .goal_repository
            .list_by_payment_id(&event.payment_id)
            .await?;
        if goals.is_empty() {
            info!("No goals reference payment {}", event.payment_id);
            return Ok(PaymentEventOutcome::default());
        }

        let mut outcome = PaymentEventOutcome::default();
        for mut goal in goals {
            let changed = goal.settle_transfers(&event.payment_id, status);
            if changed == 0 {
                continue;
            }
            self.goal_repository.save(goal).await?;
            outcome.goals_updated += 1;
            outcome.transfers_updated += changed;
        }

        info!(
            "Payment {} marked {:?} on {} goals",
            event.payment_id, status, outcome.goals_updated
        );
        Ok(outcome)
    }
}
