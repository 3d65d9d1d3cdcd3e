//! Allocation checks run before any money moves.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use super::transfers_model::Allocation;
use crate::errors::{Error, Result};
use crate::goals::SavingsGoal;
use crate::payments::to_minor_units;

/// Rejects malformed requests that need no goal data: a non-positive total,
/// no allocations, or the same goal listed twice.
pub(crate) fn validate_request_shape(
    total_amount: Decimal,
    allocations: &[Allocation],
) -> Result<()> {
    if total_amount <= Decimal::ZERO {
        return Err(Error::invalid_input("Total amount must be greater than zero"));
    }
    if allocations.is_empty() {
        return Err(Error::invalid_input("At least one allocation is required"));
    }
    let mut seen = HashSet::new();
    for allocation in allocations {
        if !seen.insert(allocation.goal_id.as_str()) {
            return Err(Error::invalid_input(format!(
                "Goal {} is allocated more than once",
                allocation.goal_id
            )));
        }
    }
    Ok(())
}

/// Validates an allocation set against the requester's goals.
///
/// `owned_goals` must be the goals loaded for the requester; any allocated
/// goal missing from it is treated as not found. Checks, in order:
/// request shape, goal existence and ownership, conservation (allocations sum
/// to the total to the cent), and the per-goal ceiling
/// `0 <= amount <= current_amount`.
///
/// `current_amount` holds confirmed funds only. Credits from an earlier batch
/// that are still pending are not subtracted from it.
pub fn validate_allocations(
    total_amount: Decimal,
    allocations: &[Allocation],
    owned_goals: &[SavingsGoal],
) -> Result<()> {
    validate_request_shape(total_amount, allocations)?;

    let goals: HashMap<&str, &SavingsGoal> =
        owned_goals.iter().map(|g| (g.id.as_str(), g)).collect();
    for allocation in allocations {
        if !goals.contains_key(allocation.goal_id.as_str()) {
            return Err(Error::NotFound(format!("Savings goal {}", allocation.goal_id)));
        }
    }

    let mut allocated_cents = 0i64;
    for allocation in allocations {
        allocated_cents = allocated_cents
            .checked_add(to_minor_units(allocation.amount)?)
            .ok_or_else(|| Error::invalid_input("Allocation total is out of range"))?;
    }
    let total_cents = to_minor_units(total_amount)?;
    if allocated_cents != total_cents {
        return Err(Error::invalid_input(format!(
            "Allocations sum to {} cents but the total is {} cents",
            allocated_cents, total_cents
        )));
    }

    for allocation in allocations {
        let goal = goals[allocation.goal_id.as_str()];
        if allocation.amount < Decimal::ZERO {
            return Err(Error::invalid_input(format!(
                "Allocation for goal {} is negative",
                goal.id
            )));
        }
        if allocation.amount > goal.current_amount {
            return Err(Error::invalid_input(format!(
                "Allocation of {} exceeds the {} available in goal {}",
                allocation.amount, goal.current_amount, goal.id
            )));
        }
    }

    Ok(())
}
