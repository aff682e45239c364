//! Data model for the plan and every record type it owns.

pub mod account;
pub mod activity;
pub mod common;
pub mod fixed_expense;
pub mod goal;
pub mod plan;
pub mod savings;
pub mod settings;
pub mod transaction;
pub mod user;

pub use account::Account;
pub use activity::{FinancialActivity, Priority};
pub use common::{current_month, is_month_key, Identifiable, NamedEntity};
pub use fixed_expense::{FixedCategory, FixedExpense};
pub use goal::Goal;
pub use plan::{Plan, CURRENT_SCHEMA_VERSION};
pub use savings::SavingsLog;
pub use settings::PlanSettings;
pub use transaction::{Category, EntryStatus, Transaction, TransactionKind};
pub use user::User;
