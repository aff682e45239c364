//! Savings allocation: splitting a pour between the emergency reserve and a
//! surplus destination, and reversing that split on deletion.

use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::currency::{convert_to_kz, Currency, EUR_TO_KZ_RATE};
use crate::domain::{is_month_key, Plan, SavingsLog};
use crate::errors::PlanError;

/// Draft input for a savings pour.
#[derive(Debug, Clone)]
pub struct PourDraft {
    pub amount: f64,
    pub currency: Currency,
    /// Month the pour is attributed to, `YYYY-MM`.
    pub month: String,
    /// Primary reserve destination; must match the pour currency.
    pub target_account_id: Uuid,
    /// Required for Kz pours whose amount exceeds the remaining gap.
    pub surplus_account_id: Option<Uuid>,
}

pub struct SavingsService;

impl SavingsService {
    /// Applies a pour and records its [`SavingsLog`].
    ///
    /// Kz pours: `allocated = min(amount, max(0, target - current))` goes to
    /// the reserve account and the emergency counter; the rest is surplus and
    /// goes to the surplus account. EUR pours credit the chosen EUR account
    /// in full and touch the (Kz-denominated) counter only when
    /// `settings.eur_pours_fund_emergency` is set.
    pub fn pour(plan: &mut Plan, draft: PourDraft) -> ServiceResult<Uuid> {
        if draft.amount <= 0.0 {
            return Err(ServiceError::Invalid("Pour amount must be positive".into()));
        }
        if !is_month_key(&draft.month) {
            return Err(ServiceError::Invalid(format!(
                "`{}` is not a valid YYYY-MM month",
                draft.month
            )));
        }

        let (allocated, surplus) = match draft.currency {
            Currency::Kz => {
                let gap =
                    (plan.settings.emergency_fund_target - plan.emergency_fund_current).max(0.0);
                let allocated = draft.amount.min(gap);
                (allocated, draft.amount - allocated)
            }
            // The emergency gap is defined in Kz; EUR pours never split.
            Currency::Eur => (0.0, draft.amount),
        };

        Self::ensure_destination(plan, draft.target_account_id, draft.currency)?;
        let surplus_destination = match draft.currency {
            Currency::Kz if surplus > 0.0 => {
                let id = draft.surplus_account_id.ok_or_else(|| {
                    ServiceError::Invalid(
                        "Pour exceeds the emergency gap; select a surplus account".into(),
                    )
                })?;
                Self::ensure_destination(plan, id, draft.currency)?;
                Some(id)
            }
            Currency::Kz => None,
            // EUR pours credit the target in full; a surplus account would
            // redirect the whole amount, so it is rejected outright.
            Currency::Eur => {
                if draft.surplus_account_id.is_some() {
                    return Err(ServiceError::Invalid(
                        "EUR pours credit the target account in full; surplus accounts apply to Kz pours only".into(),
                    ));
                }
                None
            }
        };

        let counter_delta = match draft.currency {
            Currency::Kz => allocated,
            Currency::Eur if plan.settings.eur_pours_fund_emergency => {
                convert_to_kz(draft.amount, Currency::Eur, EUR_TO_KZ_RATE)
            }
            Currency::Eur => 0.0,
        };

        if let Some(account) = plan.account_mut(draft.target_account_id) {
            account.balance += allocated;
        }
        let surplus_target = surplus_destination.unwrap_or(draft.target_account_id);
        if let Some(account) = plan.account_mut(surplus_target) {
            account.balance += surplus;
        }
        plan.emergency_fund_current += counter_delta;

        let log = SavingsLog {
            id: Uuid::new_v4(),
            month: draft.month,
            amount_poured: draft.amount,
            currency: draft.currency,
            allocated_to_emergency: allocated,
            target_account_id: draft.target_account_id,
            surplus_account_id: surplus_destination,
            counter_delta_kz: counter_delta,
        };
        let id = log.id;
        plan.savings.insert(0, log);
        plan.touch();
        tracing::debug!(%id, allocated, surplus, "savings pour applied");
        Ok(id)
    }

    /// Undoes a pour exactly: debits the reserve and surplus destinations by
    /// the recorded split, rolls back the emergency counter, and drops the
    /// log. Fails without mutating anything when a referenced account was
    /// deleted in the interim.
    pub fn remove_log(plan: &mut Plan, id: Uuid) -> ServiceResult<()> {
        let log = plan
            .savings_log(id)
            .ok_or_else(|| PlanError::SavingsLogNotFound(id.to_string()))?
            .clone();

        if plan.account(log.target_account_id).is_none() {
            return Err(PlanError::AccountNotFound(log.target_account_id.to_string()).into());
        }
        let surplus = log.surplus();
        let surplus_target = log.surplus_account_id.unwrap_or(log.target_account_id);
        if surplus > 0.0 && plan.account(surplus_target).is_none() {
            return Err(PlanError::AccountNotFound(surplus_target.to_string()).into());
        }

        if let Some(account) = plan.account_mut(log.target_account_id) {
            account.balance -= log.allocated_to_emergency;
        }
        if let Some(account) = plan.account_mut(surplus_target) {
            account.balance -= surplus;
        }
        plan.emergency_fund_current -= log.counter_delta_kz;
        plan.savings.retain(|entry| entry.id != id);
        plan.touch();
        Ok(())
    }

    fn ensure_destination(plan: &Plan, id: Uuid, currency: Currency) -> ServiceResult<()> {
        let account = plan
            .account(id)
            .ok_or_else(|| PlanError::AccountNotFound(id.to_string()))?;
        if account.currency != currency {
            return Err(ServiceError::Invalid(format!(
                "Account `{}` holds {}, not {}",
                account.name, account.currency, currency
            )));
        }
        Ok(())
    }
}
