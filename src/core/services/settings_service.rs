//! Settings updates with the derived mandatory-savings rule.

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::Plan;

/// Partial settings changeset; unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub monthly_salary: Option<f64>,
    pub savings_percentage_rule: Option<f64>,
    pub emergency_fund_target: Option<f64>,
    pub monthly_budget_limit: Option<f64>,
    pub fixed_expenses_limit: Option<f64>,
    pub high_cost_threshold: Option<f64>,
    pub eur_pours_fund_emergency: Option<bool>,
}

pub struct SettingsService;

impl SettingsService {
    /// Applies a changeset and recomputes `mandatory_savings` whenever
    /// salary or the percentage rule moved (one-way derivation).
    pub fn update(plan: &mut Plan, update: SettingsUpdate) -> ServiceResult<()> {
        if let Some(rule) = update.savings_percentage_rule {
            if !(0.0..=100.0).contains(&rule) {
                return Err(ServiceError::Invalid(
                    "Savings percentage must be between 0 and 100".into(),
                ));
            }
        }
        for (label, value) in [
            ("Salary", update.monthly_salary),
            ("Emergency fund target", update.emergency_fund_target),
            ("Monthly budget limit", update.monthly_budget_limit),
            ("Fixed expenses limit", update.fixed_expenses_limit),
            ("High cost threshold", update.high_cost_threshold),
        ] {
            if let Some(v) = value {
                if v < 0.0 {
                    return Err(ServiceError::Invalid(format!(
                        "{} cannot be negative",
                        label
                    )));
                }
            }
        }

        let settings = &mut plan.settings;
        let mut derive = false;
        if let Some(salary) = update.monthly_salary {
            settings.monthly_salary = salary;
            derive = true;
        }
        if let Some(rule) = update.savings_percentage_rule {
            settings.savings_percentage_rule = rule;
            derive = true;
        }
        if let Some(target) = update.emergency_fund_target {
            settings.emergency_fund_target = target;
        }
        if let Some(limit) = update.monthly_budget_limit {
            settings.monthly_budget_limit = limit;
        }
        if let Some(limit) = update.fixed_expenses_limit {
            settings.fixed_expenses_limit = limit;
        }
        if let Some(threshold) = update.high_cost_threshold {
            settings.high_cost_threshold = threshold;
        }
        if let Some(flag) = update.eur_pours_fund_emergency {
            settings.eur_pours_fund_emergency = flag;
        }
        if derive {
            settings.recompute_mandatory_savings();
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
    fn salary_change_rederives_mandatory_savings() {
        let mut plan = Plan::new(User::new("Test", "test@example.com"));
        SettingsService::update(
            &mut plan,
            SettingsUpdate {
                monthly_salary: Some(2_000_000.0),
                ..Default::default()
            },
        )
        .expect("update");
        assert_eq!(plan.settings.mandatory_savings, 800_000.0);
    }

    #[test]
    fn rejects_out_of_range_percentage() {
        let mut plan = Plan::new(User::new("Test", "test@example.com"));
        let err = SettingsService::update(
            &mut plan,
            SettingsUpdate {
                savings_percentage_rule: Some(140.0),
                ..Default::default()
            },
        )
        .expect_err("must fail");
        assert!(matches!(err, ServiceError::Invalid(_)));
    }
}
