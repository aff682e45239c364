use thiserror::Error;

/// Unified error type for domain, storage, and export layers.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("No plan loaded")]
    PlanNotLoaded,
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Savings log not found: {0}")]
    SavingsLogNotFound(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unsupported schema version {found} (this build reads up to {supported})")]
    UnsupportedSchema { found: u64, supported: u8 },
}

pub type Result<T> = std::result::Result<T, PlanError>;

impl From<std::io::Error> for PlanError {
    fn from(err: std::io::Error) -> Self {
        PlanError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::Storage(err.to_string())
    }
}

impl From<csv::Error> for PlanError {
    fn from(err: csv::Error) -> Self {
        PlanError::Storage(err.to_string())
    }
}
