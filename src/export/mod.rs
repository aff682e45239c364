//! CSV exports for the planned-activity and savings histories.

use std::{fs::File, io::Write, path::Path};

use crate::domain::Plan;
use crate::errors::Result;

/// Writes the planned activities as CSV, one row per activity.
pub fn write_activities_csv<W: Write>(plan: &Plan, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "name",
        "category",
        "subcategory",
        "cost_estimate_kz",
        "planned_month",
        "priority",
        "status",
        "funding_account",
        "observations",
    ])?;
    for activity in &plan.activities {
        let funding_account = activity
            .funding_account_id
            .and_then(|id| plan.account(id))
            .map(|account| account.name.clone())
            .unwrap_or_default();
        writer.write_record([
            activity.name.as_str(),
            &activity.category.to_string(),
            activity.subcategory.as_str(),
            &format_number(activity.cost_estimate),
            activity.planned_month.as_str(),
            &activity.priority.to_string(),
            &activity.status.to_string(),
            funding_account.as_str(),
            activity.observations.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the savings history as CSV, one row per pour.
pub fn write_savings_csv<W: Write>(plan: &Plan, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "month",
        "amount_poured",
        "currency",
        "allocated_to_emergency",
        "surplus",
        "target_account",
        "surplus_account",
    ])?;
    for log in &plan.savings {
        let target_account = plan
            .account(log.target_account_id)
            .map(|account| account.name.clone())
            .unwrap_or_default();
        let surplus_account = log
            .surplus_account_id
            .and_then(|id| plan.account(id))
            .map(|account| account.name.clone())
            .unwrap_or_default();
        writer.write_record([
            log.month.as_str(),
            &format_number(log.amount_poured),
            &log.currency.to_string(),
            &format_number(log.allocated_to_emergency),
            &format_number(log.surplus()),
            target_account.as_str(),
            surplus_account.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_activities_to_path(plan: &Plan, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_activities_csv(plan, file)
}

pub fn export_savings_to_path(plan: &Plan, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_savings_csv(plan, file)
}

fn format_number(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    use crate::currency::Currency;
    use crate::domain::{
        Account, Category, FinancialActivity, Plan, Priority, SavingsLog, User,
    };

    fn plan_with_history() -> Plan {
        let mut plan = Plan::new(User::new("Test", "test@example.com"));
        let account = Account::new("Conta Principal", Currency::Kz, 500_000.0);
        let account_id = account.id;
        plan.accounts.push(account);
        let mut activity =
            FinancialActivity::new("Revisão do carro", Category::Car, 120_000.0, "2026-09");
        activity.subcategory = "Manutenção".to_string();
        activity.priority = Priority::High;
        activity.funding_account_id = Some(account_id);
        plan.activities.push(activity);
        plan.savings.push(SavingsLog {
            id: Uuid::new_v4(),
            month: "2026-08".to_string(),
            amount_poured: 200_000.0,
            currency: Currency::Kz,
            allocated_to_emergency: 150_000.0,
            target_account_id: account_id,
            surplus_account_id: None,
            counter_delta_kz: 150_000.0,
        });
        plan
    }

    #[test]
    fn activities_csv_has_header_and_rows() {
        let plan = plan_with_history();
        let mut buffer = Vec::new();
        write_activities_csv(&plan, &mut buffer).expect("write csv");
        let text = String::from_utf8(buffer).expect("utf8");
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("name,category"));
        let row = lines.next().unwrap();
        assert!(row.contains("Revisão do carro"));
        assert!(row.contains("120000.00"));
        assert!(row.contains("Conta Principal"));
    }

    #[test]
    fn savings_csv_includes_split_columns() {
        let plan = plan_with_history();
        let mut buffer = Vec::new();
        write_savings_csv(&plan, &mut buffer).expect("write csv");
        let text = String::from_utf8(buffer).expect("utf8");
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains("2026-08"));
        assert!(row.contains("200000.00"));
        assert!(row.contains("150000.00"));
        assert!(row.contains("50000.00"));
    }
}
