//! Validated mutations and read paths over a [`crate::domain::Plan`].
//!
//! Services hold no state; each call validates its inputs fully before
//! touching the snapshot, so a returned error means nothing was applied.

pub mod account_service;
pub mod activity_service;
pub mod fixed_expense_service;
pub mod goal_service;
pub mod savings_service;
pub mod settings_service;
pub mod summary_service;
pub mod transaction_service;

pub use account_service::AccountService;
pub use activity_service::ActivityService;
pub use fixed_expense_service::FixedExpenseService;
pub use goal_service::GoalService;
pub use savings_service::{PourDraft, SavingsService};
pub use settings_service::{SettingsService, SettingsUpdate};
pub use summary_service::{MonthlyBudget, MonthlySavings, SummaryService};
pub use transaction_service::{TransactionDraft, TransactionService};

use crate::errors::PlanError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] PlanError),
    #[error("{0}")]
    Invalid(String),
}
