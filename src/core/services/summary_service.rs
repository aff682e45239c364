//! Read-only aggregations: consolidated totals, budget usage, and the
//! monthly savings report.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::currency::{convert_to_kz, Currency};
use crate::domain::Plan;

/// Budget usage for one month, measured against the configured limit.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyBudget {
    pub month: String,
    pub fixed_total: f64,
    pub activities_total: f64,
    pub limit: f64,
    pub remaining: f64,
    pub over_budget: bool,
}

/// Per-month pour totals, one bucket per denomination.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlySavings {
    pub month: String,
    pub kz_poured: f64,
    pub eur_poured: f64,
}

pub struct SummaryService;

impl SummaryService {
    /// Consolidated net worth in Kz: `include_in_total` accounts only, EUR
    /// balances converted at the given rate.
    pub fn net_worth(plan: &Plan, rate: f64) -> f64 {
        plan.accounts
            .iter()
            .filter(|account| account.include_in_total)
            .map(|account| convert_to_kz(account.balance, account.currency, rate))
            .sum()
    }

    /// Consolidated reserve in Kz across `is_savings_account` accounts.
    pub fn total_reserve(plan: &Plan, rate: f64) -> f64 {
        plan.accounts
            .iter()
            .filter(|account| account.is_savings_account)
            .map(|account| convert_to_kz(account.balance, account.currency, rate))
            .sum()
    }

    /// Raw Kz balance total (no conversion, no flags).
    pub fn kz_balance_total(plan: &Plan) -> f64 {
        Self::currency_total(plan, Currency::Kz)
    }

    /// Raw EUR balance total (no conversion, no flags).
    pub fn eur_balance_total(plan: &Plan) -> f64 {
        Self::currency_total(plan, Currency::Eur)
    }

    fn currency_total(plan: &Plan, currency: Currency) -> f64 {
        plan.accounts
            .iter()
            .filter(|account| account.currency == currency)
            .map(|account| account.balance)
            .sum()
    }

    /// Budget usage for `month`: active fixed expenses plus activities
    /// planned for that month, against the monthly limit.
    pub fn monthly_budget(plan: &Plan, month: &str) -> MonthlyBudget {
        let fixed_total: f64 = plan
            .fixed_expenses
            .iter()
            .filter(|expense| expense.active)
            .map(|expense| expense.value)
            .sum();
        let activities_total: f64 = plan
            .activities
            .iter()
            .filter(|activity| activity.planned_month == month)
            .map(|activity| activity.cost_estimate)
            .sum();
        let limit = plan.settings.monthly_budget_limit;
        let remaining = limit - fixed_total - activities_total;
        MonthlyBudget {
            month: month.to_string(),
            fixed_total,
            activities_total,
            limit,
            remaining,
            over_budget: remaining < 0.0,
        }
    }

    /// Emergency fund completion, clamped to 0..=100 percent.
    pub fn emergency_progress(plan: &Plan) -> f64 {
        let target = plan.settings.emergency_fund_target;
        if target <= 0.0 {
            return 0.0;
        }
        ((plan.emergency_fund_current / target) * 100.0).clamp(0.0, 100.0)
    }

    /// Pour totals per month, ascending by month key.
    pub fn monthly_savings_report(plan: &Plan) -> Vec<MonthlySavings> {
        let mut buckets: BTreeMap<String, (f64, f64)> = BTreeMap::new();
        for log in &plan.savings {
            let entry = buckets.entry(log.month.clone()).or_default();
            match log.currency {
                Currency::Kz => entry.0 += log.amount_poured,
                Currency::Eur => entry.1 += log.amount_poured,
            }
        }
        buckets
            .into_iter()
            .map(|(month, (kz, eur))| MonthlySavings {
                month,
                kz_poured: kz,
                eur_poured: eur,
            })
            .collect()
    }
}
