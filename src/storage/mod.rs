pub mod json_backend;
pub mod migrate;

use crate::domain::{Plan, User};
use crate::errors::Result;

pub use json_backend::JsonStorage;
pub use migrate::{plan_warnings, upgrade_plan_document, LoadReport};

/// Abstraction over persistence backends that store one plan per user.
pub trait StorageBackend: Send + Sync {
    fn save(&self, plan: &Plan) -> Result<()>;
    fn load(&self, user: &User) -> Result<LoadReport>;
    fn exists(&self, user: &User) -> bool;
    fn backup(&self, plan: &Plan, note: Option<&str>) -> Result<()>;
    fn list_backups(&self, user: &User) -> Result<Vec<String>>;
    fn restore(&self, user: &User, backup_name: &str) -> Result<LoadReport>;
}
