//! Planned activities and the pay/revert flow that bridges them into the
//! transaction ledger.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::services::{
    ServiceError, ServiceResult, TransactionDraft, TransactionService,
};
use crate::domain::{is_month_key, EntryStatus, FinancialActivity, Plan, TransactionKind};
use crate::errors::PlanError;

pub struct ActivityService;

impl ActivityService {
    pub fn add(plan: &mut Plan, activity: FinancialActivity) -> ServiceResult<Uuid> {
        if activity.name.trim().is_empty() {
            return Err(ServiceError::Invalid("Activity name is required".into()));
        }
        if activity.cost_estimate <= 0.0 {
            return Err(ServiceError::Invalid(
                "Cost estimate must be positive".into(),
            ));
        }
        if !is_month_key(&activity.planned_month) {
            return Err(ServiceError::Invalid(format!(
                "`{}` is not a valid YYYY-MM month",
                activity.planned_month
            )));
        }
        if let Some(account_id) = activity.funding_account_id {
            if plan.account(account_id).is_none() {
                return Err(PlanError::AccountNotFound(account_id.to_string()).into());
            }
        }
        let id = activity.id;
        plan.activities.push(activity);
        plan.touch();
        Ok(id)
    }

    pub fn remove(plan: &mut Plan, id: Uuid) -> ServiceResult<()> {
        let before = plan.activities.len();
        plan.activities.retain(|activity| activity.id != id);
        if plan.activities.len() == before {
            return Err(ServiceError::Invalid("Activity not found".into()));
        }
        plan.touch();
        Ok(())
    }

    /// Realizes an activity into a completed expense against its funding
    /// account and stores the back-reference for later reversal.
    pub fn mark_paid(plan: &mut Plan, id: Uuid, date: NaiveDate) -> ServiceResult<Uuid> {
        let activity = plan
            .activity(id)
            .ok_or_else(|| ServiceError::Invalid("Activity not found".into()))?
            .clone();
        if activity.status == EntryStatus::Completed {
            return Err(ServiceError::Invalid("Activity is already paid".into()));
        }
        let account_id = activity.funding_account_id.ok_or_else(|| {
            ServiceError::Invalid("Activity has no funding account selected".into())
        })?;

        let transaction_id = TransactionService::record(
            plan,
            TransactionDraft {
                description: activity.name.clone(),
                amount: activity.cost_estimate,
                date,
                kind: TransactionKind::Expense,
                category: activity.category,
                account_id,
                to_account_id: None,
                status: EntryStatus::Completed,
            },
        )?;

        if let Some(stored) = plan.activity_mut(id) {
            stored.status = EntryStatus::Completed;
            stored.transaction_id = Some(transaction_id);
        }
        plan.touch();
        Ok(transaction_id)
    }

    /// Undoes `mark_paid`: removes the linked expense (restoring the
    /// balance) and returns the activity to Planned.
    pub fn revert_paid(plan: &mut Plan, id: Uuid) -> ServiceResult<()> {
        let activity = plan
            .activity(id)
            .ok_or_else(|| ServiceError::Invalid("Activity not found".into()))?
            .clone();
        let transaction_id = activity.transaction_id.ok_or_else(|| {
            ServiceError::Invalid("Activity has no linked payment to revert".into())
        })?;
        TransactionService::remove(plan, transaction_id)?;
        if let Some(stored) = plan.activity_mut(id) {
            stored.status = EntryStatus::Planned;
            stored.transaction_id = None;
        }
        plan.touch();
        Ok(())
    }

    /// Whether the estimate crosses the configured high-cost threshold.
    pub fn is_high_cost(plan: &Plan, activity: &FinancialActivity) -> bool {
        activity.cost_estimate >= plan.settings.high_cost_threshold
    }
}
