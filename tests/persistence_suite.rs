mod common;

use std::fs;

use serde_json::json;
use tempfile::TempDir;

use kwanza_plan::{
    domain::CURRENT_SCHEMA_VERSION,
    storage::{json_backend::JsonStorage, StorageBackend},
};

use common::sample_plan;

fn storage_in(temp: &TempDir) -> JsonStorage {
    JsonStorage::new(Some(temp.path().to_path_buf()), Some(2)).expect("storage")
}

#[test]
fn save_load_roundtrip_preserves_the_plan() {
    let temp = TempDir::new().unwrap();
    let storage = storage_in(&temp);
    let (plan, main, _, _) = sample_plan();

    storage.save(&plan).expect("save");
    let report = storage.load(&plan.owner).expect("load");

    assert_eq!(report.plan.accounts.len(), 3);
    assert_eq!(report.plan.account(main).unwrap().balance, 1_000_000.0);
    assert_eq!(report.plan.schema_version, CURRENT_SCHEMA_VERSION);
    assert!(report.migrations.is_empty());
}

#[test]
fn failed_atomic_save_leaves_the_previous_file_intact() {
    let temp = TempDir::new().unwrap();
    let storage = storage_in(&temp);
    let (mut plan, main, _, _) = sample_plan();

    storage.save(&plan).expect("initial save");
    let path = storage.profile_path(&plan.owner);
    let original = fs::read_to_string(&path).expect("read original");

    // A directory squatting on the temp path forces File::create to fail.
    let mut tmp = path.clone();
    tmp.set_extension("json.tmp");
    fs::create_dir_all(&tmp).unwrap();

    plan.account_mut(main).unwrap().balance = 0.0;
    assert!(storage.save(&plan).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn backups_are_pruned_to_the_retention_limit() {
    let temp = TempDir::new().unwrap();
    let storage = storage_in(&temp);
    let (plan, _, _, _) = sample_plan();
    storage.save(&plan).unwrap();

    for note in ["one", "two", "three", "four"] {
        storage.backup(&plan, Some(note)).unwrap();
    }
    let backups = storage.list_backups(&plan.owner).unwrap();
    assert!(backups.len() <= 2, "kept {} backups", backups.len());
}

#[test]
fn restore_brings_back_the_backed_up_state() {
    let temp = TempDir::new().unwrap();
    let storage = storage_in(&temp);
    let (mut plan, main, _, _) = sample_plan();

    storage.save(&plan).unwrap();
    storage.backup(&plan, Some("before")).unwrap();

    plan.account_mut(main).unwrap().balance = 1.0;
    storage.save(&plan).unwrap();

    let backups = storage.list_backups(&plan.owner).unwrap();
    let report = storage.restore(&plan.owner, &backups[0]).expect("restore");
    assert_eq!(report.plan.account(main).unwrap().balance, 1_000_000.0);
}

#[test]
fn legacy_documents_migrate_on_load() {
    let temp = TempDir::new().unwrap();
    let storage = storage_in(&temp);
    let user = storage
        .login_or_register("Legacy", "legacy@example.com")
        .unwrap();

    // A first-generation document: no schema_version, no flags, and no
    // derived settings fields.
    let account_id = uuid::Uuid::new_v4();
    let doc = json!({
        "owner": { "id": user.id, "name": user.name, "email": user.email },
        "accounts": [{
            "id": account_id,
            "name": "Conta Antiga",
            "currency": "Kz",
            "balance": 800_000.0
        }],
        "transactions": [],
        "fixed_expenses": [],
        "emergency_fund_current": 0.0,
        "settings": {
            "monthly_salary": 1_000_000.0,
            "savings_percentage_rule": 30.0,
            "mandatory_savings": 0.0,
            "emergency_fund_target": 1_500_000.0,
            "monthly_budget_limit": 750_000.0,
            "fixed_expenses_limit": 500_000.0
        },
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    });
    let path = storage.profile_path(&user);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();

    let report = storage.load(&user).expect("migrating load");
    assert_eq!(report.loaded_version, 0);
    assert_eq!(report.plan.schema_version, CURRENT_SCHEMA_VERSION);
    assert!(!report.migrations.is_empty());
    assert!(report.plan.account(account_id).unwrap().include_in_total);
    // Re-derived from salary and rule by the v2 step.
    assert_eq!(report.plan.settings.mandatory_savings, 300_000.0);
}

#[test]
fn newer_documents_are_refused() {
    let temp = TempDir::new().unwrap();
    let storage = storage_in(&temp);
    let user = storage
        .login_or_register("Future", "future@example.com")
        .unwrap();
    let doc = json!({ "schema_version": 99 });
    let path = storage.profile_path(&user);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, doc.to_string()).unwrap();

    assert!(storage.load(&user).is_err());
}

#[test]
fn orphaned_references_surface_as_warnings() {
    let temp = TempDir::new().unwrap();
    let storage = storage_in(&temp);
    let (mut plan, _, _, eur) = sample_plan();
    // Detach an account the savings history still points at.
    kwanza_plan::core::services::SavingsService::pour(
        &mut plan,
        kwanza_plan::core::services::PourDraft {
            amount: 50.0,
            currency: kwanza_plan::currency::Currency::Eur,
            month: "2026-08".to_string(),
            target_account_id: eur,
            surplus_account_id: None,
        },
    )
    .unwrap();
    plan.accounts.retain(|account| account.id != eur);

    storage.save(&plan).unwrap();
    let report = storage.load(&plan.owner).unwrap();
    assert!(!report.warnings.is_empty());
}
