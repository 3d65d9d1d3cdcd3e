//! In-memory collaborators shared by the service tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use crate::errors::{DatabaseError, Error, GatewayError, Result};
use crate::goals::{
    GoalRepositoryTrait, SavingsGoal, ScheduleCadence, ScheduleDescriptor, ScheduleInterval,
};
use crate::payments::{CreditRequest, DebitRequest, DepositAccountRequest, PaymentGatewayTrait};
use crate::users::{User, UserRepositoryTrait, UserStatus};
use crate::utils::DayOfWeek;

// --- Users ---

#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
    saves: Arc<AtomicUsize>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    pub fn user(&self, user_id: &str) -> User {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .expect("user in mock repository")
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepositoryTrait for MockUserRepository {
    async fn get_by_id(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned())
    }

    async fn get_by_application_id(&self, application_id: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.ledger_application_id.as_deref() == Some(application_id))
            .cloned())
    }

    async fn save(&self, user: User) -> Result<User> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        Ok(user)
    }
}

// --- Goals ---

#[derive(Clone, Default)]
pub struct MockGoalRepository {
    goals: Arc<Mutex<Vec<SavingsGoal>>>,
    failing_saves: Arc<Mutex<HashSet<String>>>,
    saves: Arc<AtomicUsize>,
    fail_queries: Arc<Mutex<bool>>,
}

impl MockGoalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_goal(&self, goal: SavingsGoal) {
        self.goals.lock().unwrap().push(goal);
    }

    pub fn goal(&self, goal_id: &str) -> SavingsGoal {
        self.goals
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.id == goal_id)
            .cloned()
            .expect("goal in mock repository")
    }

    pub fn fail_saves_for(&self, goal_id: &str) {
        self.failing_saves.lock().unwrap().insert(goal_id.to_string());
    }

    pub fn fail_queries(&self) {
        *self.fail_queries.lock().unwrap() = true;
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn check_queries(&self) -> Result<()> {
        if *self.fail_queries.lock().unwrap() {
            return Err(DatabaseError::ConnectionFailed("store offline".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl GoalRepositoryTrait for MockGoalRepository {
    async fn list_scheduled_for(
        &self,
        day_of_month: u32,
        day_of_week: DayOfWeek,
    ) -> Result<Vec<SavingsGoal>> {
        self.check_queries()?;
        Ok(self
            .goals
            .lock()
            .unwrap()
            .iter()
            .filter(|g| {
                g.schedule.as_ref().is_some_and(|s| {
                    s.day_of_month() == Some(day_of_month) || s.day_of_week() == Some(day_of_week)
                })
            })
            .cloned()
            .collect())
    }

    async fn list_by_ids_for_owner(
        &self,
        goal_ids: &[String],
        owner_id: &str,
    ) -> Result<Vec<SavingsGoal>> {
        self.check_queries()?;
        Ok(self
            .goals
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.user_id == owner_id && goal_ids.contains(&g.id))
            .cloned()
            .collect())
    }

    async fn list_by_payment_id(&self, payment_id: &str) -> Result<Vec<SavingsGoal>> {
        self.check_queries()?;
        Ok(self
            .goals
            .lock()
            .unwrap()
            .iter()
            .filter(|g| {
                g.transfers()
                    .iter()
                    .any(|t| t.external_payment_id == payment_id)
            })
            .cloned()
            .collect())
    }

    async fn save(&self, goal: SavingsGoal) -> Result<SavingsGoal> {
        if self.failing_saves.lock().unwrap().contains(&goal.id) {
            return Err(DatabaseError::WriteConflict(goal.id.clone()).into());
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        let mut goals = self.goals.lock().unwrap();
        match goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => *existing = goal.clone(),
            None => goals.push(goal.clone()),
        }
        Ok(goal)
    }
}

// --- Gateway ---

#[derive(Clone, Default)]
pub struct MockPaymentGateway {
    pub debits: Arc<Mutex<Vec<DebitRequest>>>,
    pub credits: Arc<Mutex<Vec<CreditRequest>>>,
    pub deposit_accounts: Arc<Mutex<Vec<DepositAccountRequest>>>,
    failing_tokens: Arc<Mutex<HashSet<String>>>,
    fail_credits: Arc<Mutex<bool>>,
    fail_deposit_accounts: Arc<Mutex<bool>>,
    counter: Arc<AtomicUsize>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Debits sourced from `token` fail.
    pub fn fail_debits_from(&self, token: &str) {
        self.failing_tokens.lock().unwrap().insert(token.to_string());
    }

    pub fn fail_credits(&self) {
        *self.fail_credits.lock().unwrap() = true;
    }

    pub fn set_fail_deposit_accounts(&self, fail: bool) {
        *self.fail_deposit_accounts.lock().unwrap() = fail;
    }

    pub fn debit_count(&self) -> usize {
        self.debits.lock().unwrap().len()
    }

    pub fn credit_count(&self) -> usize {
        self.credits.lock().unwrap().len()
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", prefix, n)
    }
}

fn provider_down() -> Error {
    GatewayError::Api {
        status: 503,
        message: "provider unavailable".to_string(),
    }
    .into()
}

#[async_trait]
impl PaymentGatewayTrait for MockPaymentGateway {
    async fn create_debit(&self, request: &DebitRequest) -> Result<String> {
        if self
            .failing_tokens
            .lock()
            .unwrap()
            .contains(&request.source_token)
        {
            return Err(provider_down());
        }
        self.debits.lock().unwrap().push(request.clone());
        Ok(self.next_id("pay"))
    }

    async fn create_credit(&self, request: &CreditRequest) -> Result<String> {
        if *self.fail_credits.lock().unwrap() {
            return Err(provider_down());
        }
        self.credits.lock().unwrap().push(request.clone());
        Ok(self.next_id("pay"))
    }

    async fn create_deposit_account(&self, request: &DepositAccountRequest) -> Result<String> {
        if *self.fail_deposit_accounts.lock().unwrap() {
            return Err(provider_down());
        }
        self.deposit_accounts.lock().unwrap().push(request.clone());
        Ok(self.next_id("acct"))
    }
}

// --- Fixtures ---

pub fn approved_user(id: &str) -> User {
    let mut user = User::new(id, format!("{}@example.com", id));
    user.status = UserStatus::Approved;
    user.ledger_application_id = Some(format!("app-{}", id));
    user.ledger_customer_id = Some(format!("cust-{}", id));
    user.ledger_account_id = Some(format!("acct-{}", id));
    user
}

pub fn monthly_goal(id: &str, user_id: &str, day_of_month: u32, savings: Decimal) -> SavingsGoal {
    scheduled_goal(id, user_id, ScheduleCadence::DayOfMonth(day_of_month), savings)
}

pub fn weekly_goal(id: &str, user_id: &str, day: DayOfWeek, savings: Decimal) -> SavingsGoal {
    scheduled_goal(id, user_id, ScheduleCadence::DayOfWeek(day), savings)
}

fn scheduled_goal(
    id: &str,
    user_id: &str,
    cadence: ScheduleCadence,
    savings: Decimal,
) -> SavingsGoal {
    let interval = match cadence {
        ScheduleCadence::DayOfMonth(_) => ScheduleInterval::Monthly,
        ScheduleCadence::DayOfWeek(_) => ScheduleInterval::Weekly,
    };
    let mut goal = SavingsGoal::new(id, user_id, format!("Goal {}", id), savings * Decimal::TEN);
    goal.savings_amount = savings;
    goal.external_account_token = Some(format!("processor-{}", id));
    goal.schedule = Some(ScheduleDescriptor {
        cadence,
        interval,
        start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    });
    goal
}

pub fn funded_goal(id: &str, user_id: &str, current: Decimal) -> SavingsGoal {
    let mut goal = SavingsGoal::new(id, user_id, format!("Goal {}", id), current * Decimal::TWO);
    goal.current_amount = current;
    goal.external_account_token = Some(format!("processor-{}", id));
    goal
}
