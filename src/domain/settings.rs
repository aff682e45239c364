//! Plan-wide configuration values.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSettings {
    pub monthly_salary: f64,
    /// Percentage of salary that must be set aside each month.
    pub savings_percentage_rule: f64,
    /// Derived from salary and the percentage rule; never edited directly.
    pub mandatory_savings: f64,
    pub emergency_fund_target: f64,
    pub monthly_budget_limit: f64,
    pub fixed_expenses_limit: f64,
    /// Activities at or above this estimate are flagged as high cost.
    #[serde(default = "defaults::high_cost_threshold")]
    pub high_cost_threshold: f64,
    /// Whether EUR pours contribute (converted) to the emergency counter.
    /// The fund itself stays Kz-denominated.
    #[serde(default)]
    pub eur_pours_fund_emergency: bool,
}

impl PlanSettings {
    /// Recomputes the derived mandatory savings from salary and rule.
    pub fn recompute_mandatory_savings(&mut self) {
        self.mandatory_savings = self.monthly_salary * self.savings_percentage_rule / 100.0;
    }
}

impl Default for PlanSettings {
    fn default() -> Self {
        let mut settings = Self {
            monthly_salary: defaults::MONTHLY_SALARY,
            savings_percentage_rule: defaults::SAVINGS_PERCENTAGE_RULE,
            mandatory_savings: 0.0,
            emergency_fund_target: defaults::EMERGENCY_FUND_TARGET,
            monthly_budget_limit: defaults::MONTHLY_BUDGET_LIMIT,
            fixed_expenses_limit: defaults::FIXED_EXPENSES_LIMIT,
            high_cost_threshold: defaults::high_cost_threshold(),
            eur_pours_fund_emergency: false,
        };
        settings.recompute_mandatory_savings();
        settings
    }
}

pub mod defaults {
    pub const MONTHLY_SALARY: f64 = 1_250_000.0;
    pub const SAVINGS_PERCENTAGE_RULE: f64 = 40.0;
    pub const EMERGENCY_FUND_TARGET: f64 = 1_500_000.0;
    pub const MONTHLY_BUDGET_LIMIT: f64 = 750_000.0;
    pub const FIXED_EXPENSES_LIMIT: f64 = 500_000.0;
    pub const HIGH_COST_THRESHOLD: f64 = 150_000.0;

    pub fn high_cost_threshold() -> f64 {
        HIGH_COST_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mandatory_savings_is_derived() {
        let settings = PlanSettings::default();
        assert_eq!(settings.mandatory_savings, 500_000.0);
    }

    #[test]
    fn recompute_tracks_salary_changes() {
        let mut settings = PlanSettings::default();
        settings.monthly_salary = 1_000_000.0;
        settings.savings_percentage_rule = 25.0;
        settings.recompute_mandatory_savings();
        assert_eq!(settings.mandatory_savings, 250_000.0);
    }
}
