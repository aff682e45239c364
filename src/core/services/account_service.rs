//! Validated account mutations, including the integrity-checked removal
//! policy.

use chrono::Utc;
use uuid::Uuid;

use crate::core::services::{
    ServiceError, ServiceResult, TransactionDraft, TransactionService,
};
use crate::currency::Currency;
use crate::domain::{Account, Category, EntryStatus, Plan, TransactionKind};
use crate::errors::PlanError;

pub struct AccountService;

impl AccountService {
    /// Creates an account with an opening balance after validating name
    /// uniqueness.
    pub fn create(
        plan: &mut Plan,
        name: &str,
        currency: Currency,
        opening_balance: f64,
    ) -> ServiceResult<Uuid> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Invalid("Account name is required".into()));
        }
        Self::validate_name(plan, None, trimmed)?;
        let account = Account::new(trimmed, currency, opening_balance);
        let id = account.id;
        plan.accounts.push(account);
        plan.touch();
        Ok(id)
    }

    pub fn rename(plan: &mut Plan, id: Uuid, name: &str) -> ServiceResult<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Invalid("Account name is required".into()));
        }
        Self::validate_name(plan, Some(id), trimmed)?;
        let account = plan
            .account_mut(id)
            .ok_or_else(|| PlanError::AccountNotFound(id.to_string()))?;
        account.name = trimmed.to_string();
        plan.touch();
        Ok(())
    }

    /// Toggles whether the account counts toward consolidated net worth.
    pub fn set_include_in_total(plan: &mut Plan, id: Uuid, include: bool) -> ServiceResult<()> {
        let account = plan
            .account_mut(id)
            .ok_or_else(|| PlanError::AccountNotFound(id.to_string()))?;
        account.include_in_total = include;
        plan.touch();
        Ok(())
    }

    /// Toggles whether the account counts toward the consolidated reserve.
    pub fn set_savings_flag(plan: &mut Plan, id: Uuid, is_savings: bool) -> ServiceResult<()> {
        let account = plan
            .account_mut(id)
            .ok_or_else(|| PlanError::AccountNotFound(id.to_string()))?;
        account.is_savings_account = is_savings;
        plan.touch();
        Ok(())
    }

    /// Reassigns the balance directly, recording the delta as an Adjustment
    /// so history stays the single source of balance movement.
    pub fn set_balance(plan: &mut Plan, id: Uuid, new_balance: f64) -> ServiceResult<()> {
        let current = plan
            .account(id)
            .ok_or_else(|| PlanError::AccountNotFound(id.to_string()))?
            .balance;
        let delta = new_balance - current;
        if delta == 0.0 {
            return Ok(());
        }
        TransactionService::record(
            plan,
            TransactionDraft {
                description: "Manual balance adjustment".into(),
                amount: delta,
                date: Utc::now().date_naive(),
                kind: TransactionKind::Adjustment,
                category: Category::Personal,
                account_id: id,
                to_account_id: None,
                status: EntryStatus::Completed,
            },
        )?;
        Ok(())
    }

    /// Removes an account.
    ///
    /// Balance-bearing records (transactions, savings logs) block the
    /// removal; presentational links on goals and activities are detached
    /// instead of orphaned.
    pub fn remove(plan: &mut Plan, id: Uuid) -> ServiceResult<()> {
        if plan.account(id).is_none() {
            return Err(PlanError::AccountNotFound(id.to_string()).into());
        }
        let referenced = plan
            .transactions
            .iter()
            .any(|txn| txn.account_id == id || txn.to_account_id == Some(id));
        if referenced {
            return Err(ServiceError::Invalid(
                "Account has linked transactions; remove them first".into(),
            ));
        }
        let poured = plan
            .savings
            .iter()
            .any(|log| log.target_account_id == id || log.surplus_account_id == Some(id));
        if poured {
            return Err(ServiceError::Invalid(
                "Account has linked savings history; remove those logs first".into(),
            ));
        }
        for goal in &mut plan.goals {
            if goal.linked_account_id == Some(id) {
                goal.linked_account_id = None;
            }
        }
        for activity in &mut plan.activities {
            if activity.funding_account_id == Some(id) {
                activity.funding_account_id = None;
            }
        }
        plan.accounts.retain(|account| account.id != id);
        plan.touch();
        Ok(())
    }

    fn validate_name(plan: &Plan, exclude: Option<Uuid>, candidate: &str) -> ServiceResult<()> {
        let normalized = candidate.trim().to_ascii_lowercase();
        let duplicate = plan.accounts.iter().any(|account| {
            account.name.trim().to_ascii_lowercase() == normalized && exclude != Some(account.id)
        });
        if duplicate {
            Err(ServiceError::Invalid(format!(
                "Account `{}` already exists",
                candidate
            )))
        } else {
            Ok(())
        }
    }
}
