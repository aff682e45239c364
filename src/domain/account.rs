//! Wallet accounts tracked by the plan.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::Currency;
use crate::domain::common::{Identifiable, NamedEntity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub currency: Currency,
    pub balance: f64,
    /// Counted toward consolidated net worth.
    #[serde(default = "default_true")]
    pub include_in_total: bool,
    /// Counted toward the consolidated reserve figure.
    #[serde(default)]
    pub is_savings_account: bool,
}

impl Account {
    pub fn new(name: impl Into<String>, currency: Currency, opening_balance: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            currency,
            balance: opening_balance,
            include_in_total: true,
            is_savings_account: false,
        }
    }
}

impl Identifiable for Account {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

fn default_true() -> bool {
    true
}
