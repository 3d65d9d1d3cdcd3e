use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The share of a transfer-back drawn from one goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub goal_id: String,
    pub amount: Decimal,
}

impl Allocation {
    pub fn new(goal_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            goal_id: goal_id.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBackRequest {
    pub total_amount: Decimal,
    pub allocations: Vec<Allocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBackResult {
    pub payment_id: String,
    pub batch_id: String,
    pub goals_processed: usize,
}
