mod common;

use kwanza_plan::{
    core::services::{PourDraft, SavingsService},
    currency::{Currency, EUR_TO_KZ_RATE},
};

use common::sample_plan;

fn kz_pour(amount: f64, target: uuid::Uuid, surplus: Option<uuid::Uuid>) -> PourDraft {
    PourDraft {
        amount,
        currency: Currency::Kz,
        month: "2026-08".to_string(),
        target_account_id: target,
        surplus_account_id: surplus,
    }
}

#[test]
fn pour_splits_between_gap_and_surplus() {
    let (mut plan, main, reserve, _) = sample_plan();
    plan.settings.emergency_fund_target = 500_000.0;
    plan.emergency_fund_current = 400_000.0;

    SavingsService::pour(&mut plan, kz_pour(250_000.0, reserve, Some(main))).unwrap();

    let log = &plan.savings[0];
    assert_eq!(log.allocated_to_emergency, 100_000.0);
    assert_eq!(log.surplus(), 150_000.0);
    assert_eq!(plan.emergency_fund_current, 500_000.0);
    assert_eq!(plan.account(reserve).unwrap().balance, 100_000.0);
    assert_eq!(plan.account(main).unwrap().balance, 1_150_000.0);
}

#[test]
fn counter_never_exceeds_the_target() {
    let (mut plan, main, reserve, _) = sample_plan();
    plan.settings.emergency_fund_target = 300_000.0;

    SavingsService::pour(&mut plan, kz_pour(200_000.0, reserve, Some(main))).unwrap();
    SavingsService::pour(&mut plan, kz_pour(200_000.0, reserve, Some(main))).unwrap();

    assert_eq!(plan.emergency_fund_current, 300_000.0);
    assert!(plan.emergency_fund_current <= plan.settings.emergency_fund_target);
}

#[test]
fn pour_then_remove_restores_every_figure() {
    let (mut plan, main, reserve, _) = sample_plan();
    plan.settings.emergency_fund_target = 500_000.0;
    plan.emergency_fund_current = 450_000.0;
    let main_before = plan.account(main).unwrap().balance;
    let reserve_before = plan.account(reserve).unwrap().balance;

    let id = SavingsService::pour(&mut plan, kz_pour(180_000.0, reserve, Some(main))).unwrap();
    SavingsService::remove_log(&mut plan, id).unwrap();

    assert_eq!(plan.emergency_fund_current, 450_000.0);
    assert_eq!(plan.account(main).unwrap().balance, main_before);
    assert_eq!(plan.account(reserve).unwrap().balance, reserve_before);
    assert!(plan.savings.is_empty());
}

#[test]
fn eur_pour_credits_in_full_and_skips_the_counter() {
    let (mut plan, _, _, eur) = sample_plan();
    let before = plan.account(eur).unwrap().balance;

    SavingsService::pour(
        &mut plan,
        PourDraft {
            amount: 200.0,
            currency: Currency::Eur,
            month: "2026-08".to_string(),
            target_account_id: eur,
            surplus_account_id: None,
        },
    )
    .unwrap();

    assert_eq!(plan.account(eur).unwrap().balance, before + 200.0);
    assert_eq!(plan.emergency_fund_current, 0.0);
    assert_eq!(plan.savings[0].allocated_to_emergency, 0.0);
    assert_eq!(plan.savings[0].surplus(), 200.0);
}

#[test]
fn eur_pour_funds_the_counter_when_the_policy_is_on() {
    let (mut plan, _, _, eur) = sample_plan();
    plan.settings.eur_pours_fund_emergency = true;
    plan.settings.emergency_fund_target = 10_000_000.0;

    let id = SavingsService::pour(
        &mut plan,
        PourDraft {
            amount: 100.0,
            currency: Currency::Eur,
            month: "2026-08".to_string(),
            target_account_id: eur,
            surplus_account_id: None,
        },
    )
    .unwrap();

    let expected = 100.0 * EUR_TO_KZ_RATE;
    assert!((plan.emergency_fund_current - expected).abs() < 1e-9);

    // Reversal stays exact even if the policy is flipped off afterwards.
    plan.settings.eur_pours_fund_emergency = false;
    SavingsService::remove_log(&mut plan, id).unwrap();
    assert!(plan.emergency_fund_current.abs() < 1e-9);
}

#[test]
fn eur_pour_rejects_a_surplus_account() {
    let (mut plan, main, _, eur) = sample_plan();
    let main_before = plan.account(main).unwrap().balance;
    let eur_before = plan.account(eur).unwrap().balance;

    let result = SavingsService::pour(
        &mut plan,
        PourDraft {
            amount: 200.0,
            currency: Currency::Eur,
            month: "2026-08".to_string(),
            target_account_id: eur,
            surplus_account_id: Some(main),
        },
    );

    assert!(result.is_err());
    assert_eq!(plan.account(eur).unwrap().balance, eur_before);
    assert_eq!(plan.account(main).unwrap().balance, main_before);
    assert_eq!(plan.emergency_fund_current, 0.0);
    assert!(plan.savings.is_empty());
}

#[test]
fn pour_rejects_a_currency_mismatched_target() {
    let (mut plan, _, reserve, _) = sample_plan();
    let result = SavingsService::pour(
        &mut plan,
        PourDraft {
            amount: 100.0,
            currency: Currency::Eur,
            month: "2026-08".to_string(),
            target_account_id: reserve,
            surplus_account_id: None,
        },
    );
    assert!(result.is_err());
    assert!(plan.savings.is_empty());
}

#[test]
fn removal_is_all_or_nothing_when_an_account_is_gone() {
    let (mut plan, main, reserve, _) = sample_plan();
    plan.settings.emergency_fund_target = 100_000.0;
    let id = SavingsService::pour(&mut plan, kz_pour(150_000.0, reserve, Some(main))).unwrap();

    // Simulate a document edited out from under us.
    let surplus_id = plan.savings[0].surplus_account_id.unwrap();
    plan.accounts.retain(|account| account.id != surplus_id);

    let counter_before = plan.emergency_fund_current;
    let reserve_before = plan.account(reserve).unwrap().balance;
    assert!(SavingsService::remove_log(&mut plan, id).is_err());
    assert_eq!(plan.emergency_fund_current, counter_before);
    assert_eq!(plan.account(reserve).unwrap().balance, reserve_before);
    assert_eq!(plan.savings.len(), 1);
}
