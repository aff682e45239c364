//! Planned financial activities (future expenses with an estimated cost).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Identifiable, NamedEntity};
use crate::domain::transaction::{Category, EntryStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialActivity {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub subcategory: String,
    pub cost_estimate: f64,
    /// Month the activity is planned for, `YYYY-MM`.
    pub planned_month: String,
    pub priority: Priority,
    pub status: EntryStatus,
    #[serde(default)]
    pub observations: String,
    /// Account the activity will be paid from, when chosen up front.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_account_id: Option<Uuid>,
    /// Back-reference to the expense created when the activity was paid.
    /// Present only while the activity is Completed; enables reversal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<Uuid>,
}

impl FinancialActivity {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        cost_estimate: f64,
        planned_month: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            subcategory: String::new(),
            cost_estimate,
            planned_month: planned_month.into(),
            priority: Priority::Medium,
            status: EntryStatus::Planned,
            observations: String::new(),
            funding_account_id: None,
            transaction_id: None,
        }
    }
}

impl Identifiable for FinancialActivity {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for FinancialActivity {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
/// Scheduling priority; orders dashboards, never balances.
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(label)
    }
}
