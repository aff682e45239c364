//! Fixed monthly expenses: created once, toggled active/inactive.

use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{FixedCategory, FixedExpense, Plan};

pub struct FixedExpenseService;

impl FixedExpenseService {
    pub fn add(
        plan: &mut Plan,
        name: &str,
        value: f64,
        category: FixedCategory,
    ) -> ServiceResult<Uuid> {
        if name.trim().is_empty() {
            return Err(ServiceError::Invalid("Expense name is required".into()));
        }
        if value <= 0.0 {
            return Err(ServiceError::Invalid("Expense value must be positive".into()));
        }
        let expense = FixedExpense::new(name.trim(), value, category);
        let id = expense.id;
        plan.fixed_expenses.push(expense);
        plan.touch();
        Ok(id)
    }

    /// Flips the active flag; inactive expenses stay in the list but drop
    /// out of budget totals.
    pub fn toggle(plan: &mut Plan, id: Uuid) -> ServiceResult<bool> {
        let expense = plan
            .fixed_expense_mut(id)
            .ok_or_else(|| ServiceError::Invalid("Fixed expense not found".into()))?;
        expense.active = !expense.active;
        let active = expense.active;
        plan.touch();
        Ok(active)
    }

    pub fn remove(plan: &mut Plan, id: Uuid) -> ServiceResult<()> {
        let before = plan.fixed_expenses.len();
        plan.fixed_expenses.retain(|expense| expense.id != id);
        if plan.fixed_expenses.len() == before {
            return Err(ServiceError::Invalid("Fixed expense not found".into()));
        }
        plan.touch();
        Ok(())
    }
}
