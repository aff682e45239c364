//! Savings goals. Detached from the ledger: progress edits never move
//! account balances.

use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{Goal, Plan};
use crate::errors::PlanError;

pub struct GoalService;

impl GoalService {
    pub fn add(plan: &mut Plan, goal: Goal) -> ServiceResult<Uuid> {
        if goal.name.trim().is_empty() {
            return Err(ServiceError::Invalid("Goal name is required".into()));
        }
        if goal.target_amount <= 0.0 {
            return Err(ServiceError::Invalid("Goal target must be positive".into()));
        }
        if let Some(account_id) = goal.linked_account_id {
            if plan.account(account_id).is_none() {
                return Err(PlanError::AccountNotFound(account_id.to_string()).into());
            }
        }
        let id = goal.id;
        plan.goals.push(goal);
        plan.touch();
        Ok(id)
    }

    pub fn set_progress(plan: &mut Plan, id: Uuid, current_amount: f64) -> ServiceResult<()> {
        if current_amount < 0.0 {
            return Err(ServiceError::Invalid(
                "Goal progress cannot be negative".into(),
            ));
        }
        let goal = plan
            .goal_mut(id)
            .ok_or_else(|| ServiceError::Invalid("Goal not found".into()))?;
        goal.current_amount = current_amount;
        plan.touch();
        Ok(())
    }

    pub fn remove(plan: &mut Plan, id: Uuid) -> ServiceResult<()> {
        let before = plan.goals.len();
        plan.goals.retain(|goal| goal.id != id);
        if plan.goals.len() == before {
            return Err(ServiceError::Invalid("Goal not found".into()));
        }
        plan.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;

    #[test]
    fn progress_updates_do_not_touch_accounts() {
        let mut plan = Plan::new(User::new("Test", "test@example.com"));
        let id = GoalService::add(&mut plan, Goal::new("Laptop", 800_000.0)).expect("add goal");
        GoalService::set_progress(&mut plan, id, 200_000.0).expect("progress");
        assert_eq!(plan.goals[0].current_amount, 200_000.0);
        assert_eq!(plan.goals[0].progress_percent(), 25.0);
        assert!(plan.transactions.is_empty());
    }
}
