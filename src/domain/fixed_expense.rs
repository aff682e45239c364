//! Recurring monthly costs that can be toggled without deletion.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Identifiable, NamedEntity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedExpense {
    pub id: Uuid,
    pub name: String,
    pub value: f64,
    pub category: FixedCategory,
    /// Inactive expenses are kept but excluded from budget totals.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl FixedExpense {
    pub fn new(name: impl Into<String>, value: f64, category: FixedCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            value,
            category,
            active: true,
        }
    }
}

impl Identifiable for FixedExpense {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for FixedExpense {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FixedCategory {
    Housing,
    Services,
    Transport,
    Subscriptions,
    Other,
}

impl FixedCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "housing" => Some(FixedCategory::Housing),
            "services" => Some(FixedCategory::Services),
            "transport" => Some(FixedCategory::Transport),
            "subscriptions" => Some(FixedCategory::Subscriptions),
            "other" => Some(FixedCategory::Other),
            _ => None,
        }
    }
}

impl fmt::Display for FixedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FixedCategory::Housing => "Housing",
            FixedCategory::Services => "Services",
            FixedCategory::Transport => "Transport",
            FixedCategory::Subscriptions => "Subscriptions",
            FixedCategory::Other => "Other",
        };
        f.write_str(label)
    }
}

fn default_active() -> bool {
    true
}
