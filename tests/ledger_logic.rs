mod common;

use chrono::NaiveDate;
use kwanza_plan::{
    core::services::{TransactionDraft, TransactionService},
    domain::{Category, EntryStatus, TransactionKind},
};

use common::{expense_draft, sample_plan, transfer_draft};

#[test]
fn completed_expense_debits_and_removal_restores() {
    let (mut plan, main, _, _) = sample_plan();
    let before = plan.account(main).unwrap().balance;

    let id = TransactionService::record(&mut plan, expense_draft(main, 75_000.0)).unwrap();
    assert_eq!(plan.account(main).unwrap().balance, before - 75_000.0);

    TransactionService::remove(&mut plan, id).unwrap();
    assert_eq!(plan.account(main).unwrap().balance, before);
    assert!(plan.transactions.is_empty());
}

#[test]
fn income_credits_the_account() {
    let (mut plan, main, _, _) = sample_plan();
    let before = plan.account(main).unwrap().balance;
    TransactionService::record(
        &mut plan,
        TransactionDraft {
            description: "Salary".to_string(),
            amount: 1_250_000.0,
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            kind: TransactionKind::Income,
            category: Category::Personal,
            account_id: main,
            to_account_id: None,
            status: EntryStatus::Completed,
        },
    )
    .unwrap();
    assert_eq!(plan.account(main).unwrap().balance, before + 1_250_000.0);
}

#[test]
fn transfer_conserves_the_combined_balance() {
    let (mut plan, main, reserve, _) = sample_plan();
    let combined =
        plan.account(main).unwrap().balance + plan.account(reserve).unwrap().balance;

    TransactionService::record(&mut plan, transfer_draft(main, reserve, 300_000.0)).unwrap();

    assert_eq!(plan.account(main).unwrap().balance, 700_000.0);
    assert_eq!(plan.account(reserve).unwrap().balance, 300_000.0);
    assert_eq!(
        plan.account(main).unwrap().balance + plan.account(reserve).unwrap().balance,
        combined
    );
}

#[test]
fn planned_entries_have_no_balance_effect_until_completed() {
    let (mut plan, main, _, _) = sample_plan();
    let before = plan.account(main).unwrap().balance;

    let mut draft = expense_draft(main, 50_000.0);
    draft.status = EntryStatus::Planned;
    let id = TransactionService::record(&mut plan, draft).unwrap();
    assert_eq!(plan.account(main).unwrap().balance, before);

    TransactionService::complete(&mut plan, id).unwrap();
    assert_eq!(plan.account(main).unwrap().balance, before - 50_000.0);
}

#[test]
fn transfer_requires_a_distinct_existing_destination() {
    let (mut plan, main, _, _) = sample_plan();
    let result = TransactionService::record(&mut plan, transfer_draft(main, main, 10_000.0));
    assert!(result.is_err());
}

#[test]
fn history_is_most_recent_first() {
    let (mut plan, main, _, _) = sample_plan();
    TransactionService::record(&mut plan, expense_draft(main, 1_000.0)).unwrap();
    let second = TransactionService::record(&mut plan, expense_draft(main, 2_000.0)).unwrap();
    assert_eq!(plan.transactions[0].id, second);
}
