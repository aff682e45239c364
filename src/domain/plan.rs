//! The plan snapshot: one user's complete financial state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    account::Account, activity::FinancialActivity, fixed_expense::FixedExpense, goal::Goal,
    savings::SavingsLog, settings::PlanSettings, transaction::Transaction, user::User,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 3;

/// Complete application state for one user, persisted wholesale as a single
/// JSON document. All mutation goes through the services in
/// [`crate::core::services`]; the snapshot itself only offers lookups and
/// collection upkeep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub owner: User,
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Most-recent-first.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub fixed_expenses: Vec<FixedExpense>,
    #[serde(default)]
    pub activities: Vec<FinancialActivity>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    /// Most-recent-first.
    #[serde(default)]
    pub savings: Vec<SavingsLog>,
    /// Kz-denominated running emergency reserve counter, tracked separately
    /// from any single account balance.
    #[serde(default)]
    pub emergency_fund_current: f64,
    #[serde(default)]
    pub settings: PlanSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Plan::schema_version_default")]
    pub schema_version: u8,
}

impl Plan {
    pub fn new(owner: User) -> Self {
        let now = Utc::now();
        Self {
            owner,
            accounts: Vec::new(),
            transactions: Vec::new(),
            fixed_expenses: Vec::new(),
            activities: Vec::new(),
            goals: Vec::new(),
            savings: Vec::new(),
            emergency_fund_current: 0.0,
            settings: PlanSettings::default(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn account(&self, id: Uuid) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn account_mut(&mut self, id: Uuid) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.id == id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn savings_log(&self, id: Uuid) -> Option<&SavingsLog> {
        self.savings.iter().find(|log| log.id == id)
    }

    pub fn activity(&self, id: Uuid) -> Option<&FinancialActivity> {
        self.activities.iter().find(|activity| activity.id == id)
    }

    pub fn activity_mut(&mut self, id: Uuid) -> Option<&mut FinancialActivity> {
        self.activities.iter_mut().find(|activity| activity.id == id)
    }

    pub fn fixed_expense_mut(&mut self, id: Uuid) -> Option<&mut FixedExpense> {
        self.fixed_expenses.iter_mut().find(|exp| exp.id == id)
    }

    pub fn goal_mut(&mut self, id: Uuid) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|goal| goal.id == id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
