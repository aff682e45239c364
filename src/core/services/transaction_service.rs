//! Transaction application and reversal against account balances.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{Category, EntryStatus, Plan, Transaction, TransactionKind};
use crate::errors::PlanError;

/// Draft input for recording a transaction.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub category: Category,
    pub account_id: Uuid,
    pub to_account_id: Option<Uuid>,
    pub status: EntryStatus,
}

/// Applies income/expense/transfer movements to account balances.
///
/// Only `Completed` entries move balances; `Planned` entries are recorded
/// into history and realized later via [`TransactionService::complete`].
pub struct TransactionService;

impl TransactionService {
    /// Validates a draft, applies its balance effect when completed, and
    /// prepends it to history. Returns the generated transaction id.
    pub fn record(plan: &mut Plan, draft: TransactionDraft) -> ServiceResult<Uuid> {
        Self::validate_draft(plan, &draft)?;

        let mut transaction = Transaction::new(
            draft.description,
            draft.amount,
            draft.date,
            draft.kind,
            draft.category,
            draft.account_id,
        );
        transaction.to_account_id = draft.to_account_id;
        transaction.status = draft.status;

        if transaction.status == EntryStatus::Completed {
            Self::apply_effect(plan, &transaction, 1.0)?;
        }
        let id = transaction.id;
        plan.transactions.insert(0, transaction);
        plan.touch();
        tracing::debug!(%id, "transaction recorded");
        Ok(id)
    }

    /// Realizes a planned transaction: applies the balance effect and marks
    /// it completed.
    pub fn complete(plan: &mut Plan, id: Uuid) -> ServiceResult<()> {
        let transaction = plan
            .transaction(id)
            .ok_or_else(|| PlanError::TransactionNotFound(id.to_string()))?
            .clone();
        if transaction.status == EntryStatus::Completed {
            return Err(ServiceError::Invalid(
                "Transaction is already completed".into(),
            ));
        }
        Self::apply_effect(plan, &transaction, 1.0)?;
        if let Some(stored) = plan.transactions.iter_mut().find(|txn| txn.id == id) {
            stored.status = EntryStatus::Completed;
        }
        plan.touch();
        Ok(())
    }

    /// Removes a transaction, reversing its balance effect exactly when it
    /// had been completed. Fails without mutating anything if a referenced
    /// account no longer exists.
    pub fn remove(plan: &mut Plan, id: Uuid) -> ServiceResult<()> {
        let transaction = plan
            .transaction(id)
            .ok_or_else(|| PlanError::TransactionNotFound(id.to_string()))?
            .clone();
        if transaction.status == EntryStatus::Completed {
            Self::apply_effect(plan, &transaction, -1.0)?;
        }
        plan.transactions.retain(|txn| txn.id != id);
        plan.touch();
        Ok(())
    }

    /// Applies the balance effect of `transaction` scaled by `direction`
    /// (`1.0` to apply, `-1.0` to reverse). All referenced accounts are
    /// checked before any balance moves.
    fn apply_effect(plan: &mut Plan, transaction: &Transaction, direction: f64) -> ServiceResult<()> {
        if plan.account(transaction.account_id).is_none() {
            return Err(PlanError::AccountNotFound(transaction.account_id.to_string()).into());
        }
        if transaction.kind == TransactionKind::Transfer {
            let destination = transaction.to_account_id.ok_or_else(|| {
                ServiceError::Invalid("Transfer is missing a destination account".into())
            })?;
            if plan.account(destination).is_none() {
                return Err(PlanError::AccountNotFound(destination.to_string()).into());
            }
        }

        let amount = transaction.amount * direction;
        match transaction.kind {
            TransactionKind::Income | TransactionKind::Adjustment => {
                if let Some(account) = plan.account_mut(transaction.account_id) {
                    account.balance += amount;
                }
            }
            TransactionKind::Expense => {
                if let Some(account) = plan.account_mut(transaction.account_id) {
                    account.balance -= amount;
                }
            }
            TransactionKind::Transfer => {
                if let Some(account) = plan.account_mut(transaction.account_id) {
                    account.balance -= amount;
                }
                if let Some(destination) = transaction.to_account_id {
                    if let Some(account) = plan.account_mut(destination) {
                        account.balance += amount;
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_draft(plan: &Plan, draft: &TransactionDraft) -> ServiceResult<()> {
        match draft.kind {
            // Adjustments carry their sign; everything else stores positive
            // amounts with direction implied by the kind.
            TransactionKind::Adjustment => {
                if draft.amount == 0.0 {
                    return Err(ServiceError::Invalid(
                        "Adjustment amount must be non-zero".into(),
                    ));
                }
            }
            _ => {
                if draft.amount <= 0.0 {
                    return Err(ServiceError::Invalid("Amount must be positive".into()));
                }
            }
        }
        if plan.account(draft.account_id).is_none() {
            return Err(PlanError::AccountNotFound(draft.account_id.to_string()).into());
        }
        match (draft.kind, draft.to_account_id) {
            (TransactionKind::Transfer, None) => Err(ServiceError::Invalid(
                "Transfer requires a destination account".into(),
            )),
            (TransactionKind::Transfer, Some(destination)) => {
                if destination == draft.account_id {
                    return Err(ServiceError::Invalid(
                        "Transfer destination must differ from the source".into(),
                    ));
                }
                if plan.account(destination).is_none() {
                    return Err(PlanError::AccountNotFound(destination.to_string()).into());
                }
                Ok(())
            }
            (_, Some(_)) => Err(ServiceError::Invalid(
                "Only transfers carry a destination account".into(),
            )),
            (_, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use crate::domain::{Account, User};

    fn plan_with_account(balance: f64) -> (Plan, Uuid) {
        let mut plan = Plan::new(User::new("Test", "test@example.com"));
        let account = Account::new("Wallet", Currency::Kz, balance);
        let id = account.id;
        plan.accounts.push(account);
        (plan, id)
    }

    fn draft(kind: TransactionKind, amount: f64, account_id: Uuid) -> TransactionDraft {
        TransactionDraft {
            description: "test".into(),
            amount,
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            kind,
            category: Category::Personal,
            account_id,
            to_account_id: None,
            status: EntryStatus::Completed,
        }
    }

    #[test]
    fn planned_entries_leave_balances_alone() {
        let (mut plan, account_id) = plan_with_account(1_000.0);
        let mut d = draft(TransactionKind::Expense, 400.0, account_id);
        d.status = EntryStatus::Planned;
        TransactionService::record(&mut plan, d).expect("record succeeds");
        assert_eq!(plan.account(account_id).unwrap().balance, 1_000.0);
        assert_eq!(plan.transactions.len(), 1);
    }

    #[test]
    fn history_is_most_recent_first() {
        let (mut plan, account_id) = plan_with_account(1_000.0);
        let first =
            TransactionService::record(&mut plan, draft(TransactionKind::Income, 10.0, account_id))
                .unwrap();
        let second =
            TransactionService::record(&mut plan, draft(TransactionKind::Income, 20.0, account_id))
                .unwrap();
        assert_eq!(plan.transactions[0].id, second);
        assert_eq!(plan.transactions[1].id, first);
    }

    #[test]
    fn rejects_non_positive_amounts() {
        let (mut plan, account_id) = plan_with_account(0.0);
        let err =
            TransactionService::record(&mut plan, draft(TransactionKind::Expense, 0.0, account_id))
                .expect_err("zero amount must fail");
        assert!(matches!(err, ServiceError::Invalid(_)));
    }

    #[test]
    fn rejects_self_transfer() {
        let (mut plan, account_id) = plan_with_account(100.0);
        let mut d = draft(TransactionKind::Transfer, 50.0, account_id);
        d.to_account_id = Some(account_id);
        let err = TransactionService::record(&mut plan, d).expect_err("self transfer must fail");
        assert!(matches!(err, ServiceError::Invalid(_)));
    }

    #[test]
    fn complete_realizes_a_planned_entry() {
        let (mut plan, account_id) = plan_with_account(500.0);
        let mut d = draft(TransactionKind::Expense, 200.0, account_id);
        d.status = EntryStatus::Planned;
        let id = TransactionService::record(&mut plan, d).unwrap();
        TransactionService::complete(&mut plan, id).expect("complete succeeds");
        assert_eq!(plan.account(account_id).unwrap().balance, 300.0);
        assert_eq!(plan.transactions[0].status, EntryStatus::Completed);
    }

    #[test]
    fn remove_is_a_no_op_on_balances_for_planned_entries() {
        let (mut plan, account_id) = plan_with_account(500.0);
        let mut d = draft(TransactionKind::Expense, 200.0, account_id);
        d.status = EntryStatus::Planned;
        let id = TransactionService::record(&mut plan, d).unwrap();
        TransactionService::remove(&mut plan, id).expect("remove succeeds");
        assert_eq!(plan.account(account_id).unwrap().balance, 500.0);
        assert!(plan.transactions.is_empty());
    }
}
