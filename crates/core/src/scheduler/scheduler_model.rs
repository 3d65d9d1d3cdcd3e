use chrono::NaiveDate;
use serde::Serialize;

/// Outcome of funding a single goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum GoalFunding {
    #[serde(rename_all = "camelCase")]
    Debited { payment_id: String },
    Skipped { reason: String },
}

/// Summary of one daily batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBatchResult {
    pub date: NaiveDate,
    /// Goals returned by the schedule query.
    pub matched: usize,
    pub debited: usize,
    pub skipped: usize,
    pub failed: usize,
    /// (goal id, error message)
    pub failures: Vec<(String, String)>,
}

impl DailyBatchResult {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            matched: 0,
            debited: 0,
            skipped: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }

    /// Goals that had a debit issued and recorded.
    pub fn processed(&self) -> usize {
        self.debited
    }

    pub fn add_funding(&mut self, funding: &GoalFunding) {
        match funding {
            GoalFunding::Debited { .. } => self.debited += 1,
            GoalFunding::Skipped { .. } => self.skipped += 1,
        }
    }

    pub fn add_failure(&mut self, goal_id: &str, error: String) {
        self.failed += 1;
        self.failures.push((goal_id.to_string(), error));
    }
}
