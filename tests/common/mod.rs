#![allow(dead_code)]

use chrono::NaiveDate;
use uuid::Uuid;

use kwanza_plan::{
    core::services::{AccountService, TransactionDraft},
    currency::Currency,
    domain::{Category, EntryStatus, Plan, TransactionKind, User},
};

/// A plan with a Kz spending account, a Kz reserve, and a EUR wallet.
pub fn sample_plan() -> (Plan, Uuid, Uuid, Uuid) {
    let mut plan = Plan::new(User::new("Test", "test@example.com"));
    let main = AccountService::create(&mut plan, "Conta Principal", Currency::Kz, 1_000_000.0)
        .expect("main account");
    let reserve = AccountService::create(&mut plan, "Reserva", Currency::Kz, 0.0)
        .expect("reserve account");
    AccountService::set_savings_flag(&mut plan, reserve, true).expect("savings flag");
    let eur = AccountService::create(&mut plan, "Carteira EUR", Currency::Eur, 500.0)
        .expect("eur account");
    (plan, main, reserve, eur)
}

pub fn expense_draft(account_id: Uuid, amount: f64) -> TransactionDraft {
    TransactionDraft {
        description: "Groceries".to_string(),
        amount,
        date: NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
        kind: TransactionKind::Expense,
        category: Category::Home,
        account_id,
        to_account_id: None,
        status: EntryStatus::Completed,
    }
}

pub fn transfer_draft(from: Uuid, to: Uuid, amount: f64) -> TransactionDraft {
    TransactionDraft {
        description: "Move to reserve".to_string(),
        amount,
        date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
        kind: TransactionKind::Transfer,
        category: Category::Investments,
        account_id: from,
        to_account_id: Some(to),
        status: EntryStatus::Completed,
    }
}
