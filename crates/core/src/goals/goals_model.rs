//! Savings goal domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schedule_model::ScheduleDescriptor;
use crate::utils::CalendarDay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferType {
    Debit,
    Credit,
}

/// A movement of money recorded on a goal.
///
/// `amount` is this goal's share, which can be less than the full provider
/// payment when one payment is fanned out over several goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub external_payment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub status: TransferStatus,
    #[serde(rename = "type")]
    pub transfer_type: TransferType,
}

impl Transfer {
    pub fn pending_debit(external_payment_id: String, amount: Decimal, date: DateTime<Utc>) -> Self {
        Self {
            external_payment_id,
            batch_id: None,
            amount,
            date,
            status: TransferStatus::Pending,
            transfer_type: TransferType::Debit,
        }
    }

    pub fn pending_credit(
        external_payment_id: String,
        batch_id: String,
        amount: Decimal,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            external_payment_id,
            batch_id: Some(batch_id),
            amount,
            date,
            status: TransferStatus::Pending,
            transfer_type: TransferType::Credit,
        }
    }
}

/// Domain model representing a savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount: Decimal,
    /// Confirmed funds held for this goal.
    pub current_amount: Decimal,
    /// Amount pulled on every scheduled run.
    pub savings_amount: Decimal,
    pub schedule: Option<ScheduleDescriptor>,
    pub external_account_token: Option<String>,
    #[serde(default)]
    pub is_paused: bool,
    /// Append-only, in chronological order.
    #[serde(default)]
    transfers: Vec<Transfer>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavingsGoal {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        name: impl Into<String>,
        target_amount: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            name: name.into(),
            target_amount,
            current_amount: Decimal::ZERO,
            savings_amount: Decimal::ZERO,
            schedule: None,
            external_account_token: None,
            is_paused: false,
            transfers: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn append_transfer(&mut self, transfer: Transfer) {
        self.updated_at = transfer.date;
        self.transfers.push(transfer);
    }

    /// Whether the daily batch should fund this goal on `day`.
    pub fn is_due(&self, day: &CalendarDay) -> bool {
        !self.is_paused
            && self
                .schedule
                .as_ref()
                .map(|schedule| schedule.matches(day))
                .unwrap_or(false)
    }

    /// Share of the target reached, 0..=100.
    pub fn progress_percent(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let pct = self.current_amount / self.target_amount * Decimal::ONE_HUNDRED;
        pct.min(Decimal::ONE_HUNDRED).round_dp(2)
    }

    /// Settles every pending transfer recorded against `payment_id`.
    ///
    /// Completed debits add to `current_amount` and completed credits draw it
    /// down (never below zero). Transfers that already left `Pending` are not
    /// touched. Returns how many transfers changed.
    pub fn settle_transfers(&mut self, payment_id: &str, status: TransferStatus) -> usize {
        if status == TransferStatus::Pending {
            return 0;
        }
        let mut changed = 0;
        let mut balance = self.current_amount;
        for transfer in self
            .transfers
            .iter_mut()
            .filter(|t| t.external_payment_id == payment_id && t.status == TransferStatus::Pending)
        {
            transfer.status = status;
            if status == TransferStatus::Completed {
                balance = match transfer.transfer_type {
                    TransferType::Debit => balance + transfer.amount,
                    TransferType::Credit => (balance - transfer.amount).max(Decimal::ZERO),
                };
            }
            changed += 1;
        }
        if changed > 0 {
            self.current_amount = balance;
            self.updated_at = Utc::now();
        }
        changed
    }
}

/// Input for attaching a recurring savings plan to an existing goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringSavingsSetup {
    pub goal_id: String,
    /// `Weekly` or `Monthly`.
    pub interval: String,
    pub start_date: DateTime<Utc>,
    pub savings_amount: Decimal,
    pub external_account_token: String,
}
