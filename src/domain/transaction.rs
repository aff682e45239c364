//! Ledger transactions and their classification enums.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Identifiable;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub description: String,
    /// Always stored positive; direction is implied by `kind`.
    pub amount: f64,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub category: Category,
    pub account_id: Uuid,
    /// Transfer destination; unset for all other kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<Uuid>,
    pub status: EntryStatus,
}

impl Transaction {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        kind: TransactionKind,
        category: Category,
        account_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            date,
            kind,
            category,
            account_id,
            to_account_id: None,
            status: EntryStatus::Completed,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Direction of a ledger movement.
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
    Adjustment,
}

impl TransactionKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            "transfer" => Some(TransactionKind::Transfer),
            "adjustment" => Some(TransactionKind::Adjustment),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
            TransactionKind::Transfer => "Transfer",
            TransactionKind::Adjustment => "Adjustment",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Lifecycle state shared by transactions and planned activities.
pub enum EntryStatus {
    Planned,
    InProgress,
    Completed,
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryStatus::Planned => "Planned",
            EntryStatus::InProgress => "In Progress",
            EntryStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Spending buckets used across transactions and activities.
pub enum Category {
    Car,
    Home,
    Personal,
    Relationship,
    Investments,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Car => "Car",
            Category::Home => "Home",
            Category::Personal => "Personal",
            Category::Relationship => "Relationship",
            Category::Investments => "Investments",
        };
        f.write_str(label)
    }
}

impl Category {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "car" => Some(Category::Car),
            "home" => Some(Category::Home),
            "personal" => Some(Category::Personal),
            "relationship" => Some(Category::Relationship),
            "investments" => Some(Category::Investments),
            _ => None,
        }
    }
}
