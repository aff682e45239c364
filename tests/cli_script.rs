use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kwanza_cli").expect("binary builds");
    cmd.env("KWANZA_PLAN_HOME", home.path());
    cmd
}

#[test]
fn no_arguments_prints_usage() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: kwanza_cli"));
}

#[test]
fn commands_without_a_session_fail_cleanly() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("summary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no user logged in"));
}

#[test]
fn login_creates_a_fresh_plan() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["login", "maria@example.com", "Maria"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created a fresh plan"));

    cli(&home)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("maria@example.com"));
}

#[test]
fn account_and_transaction_flow_end_to_end() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["login", "maria@example.com", "Maria"])
        .assert()
        .success();
    cli(&home)
        .args(["account", "add", "Principal", "kz", "1000000"])
        .assert()
        .success();
    cli(&home)
        .args([
            "txn", "add", "expense", "75000", "Principal", "home", "Groceries",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transaction recorded"));
    cli(&home)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("925 000 Kz"));
    cli(&home)
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("net worth"));
}

#[test]
fn pour_reports_the_split() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["login", "maria@example.com"])
        .assert()
        .success();
    cli(&home)
        .args(["account", "add", "Reserva", "kz", "0"])
        .assert()
        .success();
    cli(&home)
        .args(["account", "savings-flag", "Reserva", "on"])
        .assert()
        .success();
    cli(&home)
        .args(["pour", "200000", "kz", "Reserva", "--month", "2026-08"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Poured"));
    cli(&home)
        .args(["savings", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-08"));
}

#[test]
fn unknown_account_is_a_clean_error() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["login", "maria@example.com"])
        .assert()
        .success();
    cli(&home)
        .args(["txn", "add", "expense", "100", "Missing", "home"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no account named"));
}
