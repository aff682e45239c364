//! Savings goals. Purely presentational; goals never mutate balances.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Identifiable, NamedEntity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub current_amount: f64,
    pub target_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_account_id: Option<Uuid>,
}

impl Goal {
    pub fn new(name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            current_amount: 0.0,
            target_amount,
            linked_account_id: None,
        }
    }

    /// Completion ratio clamped to the 0..=100 percent range.
    pub fn progress_percent(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        ((self.current_amount / self.target_amount) * 100.0).clamp(0.0, 100.0)
    }
}

impl Identifiable for Goal {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Goal {
    fn name(&self) -> &str {
        &self.name
    }
}
