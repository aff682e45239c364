//! Versioned schema upgrades for persisted plan documents.
//!
//! Documents carry a `schema_version`; each step upgrades exactly one
//! version over the raw JSON value and records a human-readable note.
//! Version history:
//!   v0: field-presence era: no version tag, accounts without visibility
//!        flags, collections possibly missing.
//!   v1: account visibility flags and all collections present.
//!   v2: high-cost threshold; mandatory savings derived from salary.
//!   v3: EUR emergency policy flag; pours record their counter delta.

use serde_json::{json, Value};

use crate::domain::{Plan, CURRENT_SCHEMA_VERSION};
use crate::errors::{PlanError, Result};

/// Outcome of loading a persisted plan.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub plan: Plan,
    /// Notes for each migration step that ran, oldest first.
    pub migrations: Vec<String>,
    /// Non-fatal referential-integrity findings.
    pub warnings: Vec<String>,
    /// Version the document carried on disk.
    pub loaded_version: u8,
}

/// Upgrades a raw plan document to the current schema and deserializes it.
pub fn upgrade_plan_document(mut doc: Value) -> Result<(Plan, Vec<String>, u8)> {
    // Compare before narrowing so oversized versions cannot wrap into range.
    let raw_version = doc
        .get("schema_version")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    if raw_version > u64::from(CURRENT_SCHEMA_VERSION) {
        return Err(PlanError::UnsupportedSchema {
            found: raw_version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }
    let loaded_version = raw_version as u8;

    let mut migrations = Vec::new();
    let mut version = loaded_version;
    while version < CURRENT_SCHEMA_VERSION {
        let note = match version {
            0 => migrate_v0_to_v1(&mut doc),
            1 => migrate_v1_to_v2(&mut doc),
            2 => migrate_v2_to_v3(&mut doc),
            other => {
                return Err(PlanError::Storage(format!(
                    "no migration step defined from schema v{}",
                    other
                )))
            }
        };
        version += 1;
        migrations.push(format!("v{} → v{}: {}", version - 1, version, note));
    }
    if let Some(obj) = doc.as_object_mut() {
        obj.insert("schema_version".into(), json!(CURRENT_SCHEMA_VERSION));
    }

    let plan: Plan = serde_json::from_value(doc)?;
    Ok((plan, migrations, loaded_version))
}

fn migrate_v0_to_v1(doc: &mut Value) -> &'static str {
    if let Some(obj) = doc.as_object_mut() {
        for key in [
            "accounts",
            "transactions",
            "fixed_expenses",
            "activities",
            "goals",
            "savings",
        ] {
            obj.entry(key).or_insert_with(|| json!([]));
        }
        if let Some(accounts) = obj.get_mut("accounts").and_then(Value::as_array_mut) {
            for account in accounts {
                if let Some(account) = account.as_object_mut() {
                    account.entry("include_in_total").or_insert(json!(true));
                    account.entry("is_savings_account").or_insert(json!(false));
                }
            }
        }
    }
    "added account visibility flags and missing collections"
}

fn migrate_v1_to_v2(doc: &mut Value) -> &'static str {
    if let Some(settings) = doc.get_mut("settings").and_then(Value::as_object_mut) {
        settings
            .entry("high_cost_threshold")
            .or_insert(json!(crate::domain::settings::defaults::HIGH_COST_THRESHOLD));
        let salary = settings
            .get("monthly_salary")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        let rule = settings
            .get("savings_percentage_rule")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        settings.insert("mandatory_savings".into(), json!(salary * rule / 100.0));
    }
    "added high-cost threshold and rederived mandatory savings"
}

fn migrate_v2_to_v3(doc: &mut Value) -> &'static str {
    if let Some(settings) = doc.get_mut("settings").and_then(Value::as_object_mut) {
        settings
            .entry("eur_pours_fund_emergency")
            .or_insert(json!(false));
    }
    if let Some(savings) = doc.get_mut("savings").and_then(Value::as_array_mut) {
        for log in savings {
            if let Some(log) = log.as_object_mut() {
                let allocated = log
                    .get("allocated_to_emergency")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                log.entry("counter_delta_kz").or_insert(json!(allocated));
            }
        }
    }
    "added EUR emergency policy flag and pour counter deltas"
}

/// Reports orphaned account references left by the pre-integrity era.
/// Non-fatal: display degrades but nothing crashes.
pub fn plan_warnings(plan: &Plan) -> Vec<String> {
    use std::collections::HashSet;

    let account_ids: HashSet<_> = plan.accounts.iter().map(|a| a.id).collect();
    let mut warnings = Vec::new();

    for txn in &plan.transactions {
        if !account_ids.contains(&txn.account_id) {
            warnings.push(format!(
                "transaction {} references unknown account {}",
                txn.id, txn.account_id
            ));
        }
        if let Some(destination) = txn.to_account_id {
            if !account_ids.contains(&destination) {
                warnings.push(format!(
                    "transaction {} references unknown destination {}",
                    txn.id, destination
                ));
            }
        }
    }
    for log in &plan.savings {
        if !account_ids.contains(&log.target_account_id) {
            warnings.push(format!(
                "savings log {} references unknown reserve account {}",
                log.id, log.target_account_id
            ));
        }
        if let Some(surplus) = log.surplus_account_id {
            if !account_ids.contains(&surplus) {
                warnings.push(format!(
                    "savings log {} references unknown surplus account {}",
                    log.id, surplus
                ));
            }
        }
    }
    for activity in &plan.activities {
        if let Some(account) = activity.funding_account_id {
            if !account_ids.contains(&account) {
                warnings.push(format!(
                    "activity {} references unknown funding account {}",
                    activity.id, account
                ));
            }
        }
    }
    for goal in &plan.goals {
        if let Some(account) = goal.linked_account_id {
            if !account_ids.contains(&account) {
                warnings.push(format!(
                    "goal {} references unknown linked account {}",
                    goal.id, account
                ));
            }
        }
    }
    warnings
}
