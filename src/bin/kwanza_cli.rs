use std::{env, path::PathBuf, process};

use chrono::{NaiveDate, Utc};
use colored::Colorize;
use uuid::Uuid;

use kwanza_plan::{
    config::{Config, ConfigManager},
    core::services::{
        AccountService, ActivityService, FixedExpenseService, GoalService, PourDraft,
        SavingsService, SettingsService, SettingsUpdate, SummaryService, TransactionDraft,
        TransactionService,
    },
    currency::{convert_to_kz, format_amount, format_kz, Currency},
    domain::{
        current_month, Category, EntryStatus, FinancialActivity, FixedCategory, Goal,
        Identifiable, Plan, Priority, TransactionKind, User,
    },
    export, init,
    storage::{JsonStorage, StorageBackend},
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("{} {err}", "Error:".red().bold());
        process::exit(1);
    }
}

fn run() -> CliResult {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        process::exit(1);
    };

    let config_manager = ConfigManager::new();
    let config = config_manager.load()?;
    let storage = JsonStorage::new(None, Some(config.backup_retention))?;

    match command.as_str() {
        "login" => cmd_login(&storage, &config_manager, config, &args[1..]),
        "logout" => {
            storage.record_session(None)?;
            println!("Logged out.");
            Ok(())
        }
        "whoami" => {
            match storage.current_session()? {
                Some(user) => println!("{} <{}>", user.name, user.email),
                None => println!("Not logged in."),
            }
            Ok(())
        }
        "account" => cmd_account(&storage, &args[1..]),
        "txn" => cmd_txn(&storage, &args[1..]),
        "pour" => cmd_pour(&storage, &args[1..]),
        "savings" => cmd_savings(&storage, &args[1..]),
        "activity" => cmd_activity(&storage, &args[1..]),
        "fixed" => cmd_fixed(&storage, &args[1..]),
        "goal" => cmd_goal(&storage, &args[1..]),
        "settings" => cmd_settings(&storage, &args[1..]),
        "summary" => cmd_summary(&storage, &config),
        "convert" => cmd_convert(&config, &args[1..]),
        "export" => cmd_export(&storage, &args[1..]),
        "backup" => {
            let plan = load_plan(&storage)?;
            storage.backup(&plan, args.get(1).map(String::as_str))?;
            println!("Backup written.");
            Ok(())
        }
        "backups" => {
            let user = session_user(&storage)?;
            for name in storage.list_backups(&user)? {
                println!("{name}");
            }
            Ok(())
        }
        "restore" => {
            let user = session_user(&storage)?;
            let name = expect_arg(&args, 1, "restore <backup-name>")?;
            let report = storage.restore(&user, name)?;
            print_load_notes(&report.migrations, &report.warnings);
            println!("Restored `{name}`.");
            Ok(())
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }
}

// ---- commands ---------------------------------------------------------

fn cmd_login(
    storage: &JsonStorage,
    config_manager: &ConfigManager,
    mut config: Config,
    args: &[String],
) -> CliResult {
    let email = expect_arg(args, 0, "login <email> [name]")?;
    let name = args.get(1).map(String::as_str).unwrap_or("");
    let user = storage.login_or_register(name, email)?;
    storage.record_session(Some(&user))?;
    config.last_user_email = Some(user.email.clone());
    config_manager.save(&config)?;

    if storage.exists(&user) {
        let report = storage.load(&user)?;
        print_load_notes(&report.migrations, &report.warnings);
    } else {
        let plan = Plan::new(user.clone());
        storage.save(&plan)?;
        println!("Created a fresh plan for {}.", user.name);
    }
    println!("Logged in as {} <{}>.", user.name, user.email);
    Ok(())
}

fn cmd_account(storage: &JsonStorage, args: &[String]) -> CliResult {
    let action = expect_arg(args, 0, "account <add|list|...>")?;
    match action {
        "add" => {
            let name = expect_arg(args, 1, "account add <name> <kz|eur> <balance>")?;
            let currency = parse_currency(expect_arg(
                args,
                2,
                "account add <name> <kz|eur> <balance>",
            )?)?;
            let balance = parse_number(expect_arg(
                args,
                3,
                "account add <name> <kz|eur> <balance>",
            )?)?;
            with_plan(storage, |plan| {
                AccountService::create(plan, name, currency, balance)?;
                Ok(())
            })?;
            println!("Account `{name}` created.");
        }
        "list" => {
            let plan = load_plan(storage)?;
            for account in &plan.accounts {
                let mut flags = Vec::new();
                if account.is_savings_account {
                    flags.push("savings");
                }
                if !account.include_in_total {
                    flags.push("excluded");
                }
                let suffix = if flags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", flags.join(", "))
                };
                println!(
                    "{:<24} {}{}",
                    account.name,
                    format_amount(account.balance, account.currency),
                    suffix
                );
            }
        }
        "rename" => {
            let name = expect_arg(args, 1, "account rename <name> <new-name>")?;
            let new_name = expect_arg(args, 2, "account rename <name> <new-name>")?;
            with_plan(storage, |plan| {
                let id = account_id_by_name(plan, name)?;
                AccountService::rename(plan, id, new_name)?;
                Ok(())
            })?;
            println!("Account renamed to `{new_name}`.");
        }
        "set-balance" => {
            let name = expect_arg(args, 1, "account set-balance <name> <amount>")?;
            let amount = parse_number(expect_arg(
                args,
                2,
                "account set-balance <name> <amount>",
            )?)?;
            with_plan(storage, |plan| {
                let id = account_id_by_name(plan, name)?;
                AccountService::set_balance(plan, id, amount)?;
                Ok(())
            })?;
            println!("Balance of `{name}` set; an adjustment entry was recorded.");
        }
        "include" | "savings-flag" => {
            let name = expect_arg(args, 1, "account <include|savings-flag> <name> <on|off>")?;
            let enabled = parse_switch(expect_arg(
                args,
                2,
                "account <include|savings-flag> <name> <on|off>",
            )?)?;
            with_plan(storage, |plan| {
                let id = account_id_by_name(plan, name)?;
                if action == "include" {
                    AccountService::set_include_in_total(plan, id, enabled)?;
                } else {
                    AccountService::set_savings_flag(plan, id, enabled)?;
                }
                Ok(())
            })?;
            println!("Flag updated on `{name}`.");
        }
        "remove" => {
            let name = expect_arg(args, 1, "account remove <name>")?;
            with_plan(storage, |plan| {
                let id = account_id_by_name(plan, name)?;
                AccountService::remove(plan, id)?;
                Ok(())
            })?;
            println!("Account `{name}` removed.");
        }
        _ => return usage_error("account <add|list|rename|set-balance|include|savings-flag|remove>"),
    }
    Ok(())
}

fn cmd_txn(storage: &JsonStorage, args: &[String]) -> CliResult {
    let action = expect_arg(args, 0, "txn <add|list|complete|remove>")?;
    match action {
        "add" => {
            let (positional, options) = split_options(&args[1..]);
            if positional.len() < 4 {
                return usage_error(
                    "txn add <kind> <amount> <account> <category> [description...] \
                     [--to <account>] [--date YYYY-MM-DD] [--planned]",
                );
            }
            let kind = TransactionKind::parse(&positional[0])
                .ok_or_else(|| invalid(format!("unknown transaction kind `{}`", positional[0])))?;
            let amount = parse_number(&positional[1])?;
            let account_name = positional[2].clone();
            let category = Category::parse(&positional[3])
                .ok_or_else(|| invalid(format!("unknown category `{}`", positional[3])))?;
            let description = if positional.len() > 4 {
                positional[4..].join(" ")
            } else {
                kind.to_string()
            };
            let date = match options.value("--date") {
                Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")?,
                None => Utc::now().date_naive(),
            };
            let status = if options.flag("--planned") {
                EntryStatus::Planned
            } else {
                EntryStatus::Completed
            };
            with_plan(storage, |plan| {
                let account_id = account_id_by_name(plan, &account_name)?;
                let to_account_id = options
                    .value("--to")
                    .map(|name| account_id_by_name(plan, name))
                    .transpose()?;
                TransactionService::record(
                    plan,
                    TransactionDraft {
                        description: description.clone(),
                        amount,
                        date,
                        kind,
                        category,
                        account_id,
                        to_account_id,
                        status,
                    },
                )?;
                Ok(())
            })?;
            println!("Transaction recorded.");
        }
        "list" => {
            let plan = load_plan(storage)?;
            let month_filter = args.get(1).map(String::as_str);
            for txn in &plan.transactions {
                let month = txn.date.format("%Y-%m").to_string();
                if let Some(filter) = month_filter {
                    if month != filter {
                        continue;
                    }
                }
                let account = plan
                    .account(txn.account_id)
                    .map(|a| a.name.as_str())
                    .unwrap_or("?");
                println!(
                    "{}  {}  {:<10}  {:<12}  {:>16}  {}  {}",
                    short_id(txn.id),
                    txn.date,
                    txn.kind,
                    txn.category,
                    format_kz(txn.amount),
                    account,
                    txn.description
                );
            }
        }
        "complete" => {
            let prefix = expect_arg(args, 1, "txn complete <id-prefix>")?;
            with_plan(storage, |plan| {
                let id = resolve_id(&plan.transactions, prefix, "transaction")?;
                TransactionService::complete(plan, id)?;
                Ok(())
            })?;
            println!("Transaction completed.");
        }
        "remove" => {
            let prefix = expect_arg(args, 1, "txn remove <id-prefix>")?;
            with_plan(storage, |plan| {
                let id = resolve_id(&plan.transactions, prefix, "transaction")?;
                TransactionService::remove(plan, id)?;
                Ok(())
            })?;
            println!("Transaction removed; balances were restored.");
        }
        _ => return usage_error("txn <add|list|complete|remove>"),
    }
    Ok(())
}

fn cmd_pour(storage: &JsonStorage, args: &[String]) -> CliResult {
    let usage = "pour <amount> <kz|eur> <target-account> [--surplus <account>] [--month YYYY-MM]";
    let (positional, options) = split_options(args);
    if positional.len() < 3 {
        return usage_error(usage);
    }
    let amount = parse_number(&positional[0])?;
    let currency = parse_currency(&positional[1])?;
    let target_name = positional[2].clone();
    let month = options
        .value("--month")
        .map(str::to_string)
        .unwrap_or_else(current_month);

    with_plan(storage, |plan| {
        let target_account_id = account_id_by_name(plan, &target_name)?;
        let surplus_account_id = options
            .value("--surplus")
            .map(|name| account_id_by_name(plan, name))
            .transpose()?;
        let id = SavingsService::pour(
            plan,
            PourDraft {
                amount,
                currency,
                month: month.clone(),
                target_account_id,
                surplus_account_id,
            },
        )?;
        let log = plan.savings_log(id).cloned();
        if let Some(log) = log {
            println!(
                "Poured {} for {}: {} to the emergency reserve, {} surplus.",
                format_amount(log.amount_poured, log.currency),
                log.month,
                format_amount(log.allocated_to_emergency, log.currency),
                format_amount(log.surplus(), log.currency),
            );
        }
        Ok(())
    })?;
    Ok(())
}

fn cmd_savings(storage: &JsonStorage, args: &[String]) -> CliResult {
    let action = expect_arg(args, 0, "savings <list|remove>")?;
    match action {
        "list" => {
            let plan = load_plan(storage)?;
            for log in &plan.savings {
                println!(
                    "{}  {}  {:>16}  allocated {:>16}  surplus {:>16}",
                    short_id(log.id),
                    log.month,
                    format_amount(log.amount_poured, log.currency),
                    format_amount(log.allocated_to_emergency, log.currency),
                    format_amount(log.surplus(), log.currency),
                );
            }
        }
        "remove" => {
            let prefix = expect_arg(args, 1, "savings remove <id-prefix>")?;
            with_plan(storage, |plan| {
                let id = resolve_id(&plan.savings, prefix, "savings entry")?;
                SavingsService::remove_log(plan, id)?;
                Ok(())
            })?;
            println!("Savings entry removed; balances and the counter were restored.");
        }
        _ => return usage_error("savings <list|remove>"),
    }
    Ok(())
}

fn cmd_activity(storage: &JsonStorage, args: &[String]) -> CliResult {
    let action = expect_arg(args, 0, "activity <add|list|pay|unpay|remove>")?;
    match action {
        "add" => {
            let usage = "activity add <name> <category> <cost> <month> [priority]";
            let name = expect_arg(args, 1, usage)?;
            let category = Category::parse(expect_arg(args, 2, usage)?)
                .ok_or_else(|| invalid(format!("unknown category `{}`", args[2])))?;
            let cost = parse_number(expect_arg(args, 3, usage)?)?;
            let month = expect_arg(args, 4, usage)?;
            let priority = match args.get(5) {
                Some(raw) => Priority::parse(raw)
                    .ok_or_else(|| invalid(format!("unknown priority `{raw}`")))?,
                None => Priority::Medium,
            };
            with_plan(storage, |plan| {
                let mut activity = FinancialActivity::new(name, category, cost, month);
                activity.priority = priority;
                let high_cost = ActivityService::is_high_cost(plan, &activity);
                ActivityService::add(plan, activity)?;
                if high_cost {
                    println!(
                        "{}",
                        "Note: this activity is above the high-cost threshold.".yellow()
                    );
                }
                Ok(())
            })?;
            println!("Activity `{name}` planned.");
        }
        "list" => {
            let plan = load_plan(storage)?;
            for activity in &plan.activities {
                let marker = if ActivityService::is_high_cost(&plan, activity) {
                    " (high cost)".yellow().to_string()
                } else {
                    String::new()
                };
                println!(
                    "{:<24} {}  {:<12} {:<8} {:<11} {}{}",
                    activity.name,
                    activity.planned_month,
                    activity.category,
                    activity.priority,
                    activity.status,
                    format_kz(activity.cost_estimate),
                    marker
                );
            }
        }
        "pay" => {
            let usage = "activity pay <name> <account> [YYYY-MM-DD]";
            let name = expect_arg(args, 1, usage)?;
            let account_name = expect_arg(args, 2, usage)?;
            let date = match args.get(3) {
                Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")?,
                None => Utc::now().date_naive(),
            };
            with_plan(storage, |plan| {
                let account_id = account_id_by_name(plan, account_name)?;
                let id = activity_id_by_name(plan, name)?;
                if let Some(activity) = plan.activity_mut(id) {
                    activity.funding_account_id = Some(account_id);
                }
                ActivityService::mark_paid(plan, id, date)?;
                Ok(())
            })?;
            println!("Activity `{name}` paid.");
        }
        "unpay" => {
            let name = expect_arg(args, 1, "activity unpay <name>")?;
            with_plan(storage, |plan| {
                let id = activity_id_by_name(plan, name)?;
                ActivityService::revert_paid(plan, id)?;
                Ok(())
            })?;
            println!("Payment reverted for `{name}`.");
        }
        "remove" => {
            let name = expect_arg(args, 1, "activity remove <name>")?;
            with_plan(storage, |plan| {
                let id = activity_id_by_name(plan, name)?;
                ActivityService::remove(plan, id)?;
                Ok(())
            })?;
            println!("Activity `{name}` removed.");
        }
        _ => return usage_error("activity <add|list|pay|unpay|remove>"),
    }
    Ok(())
}

fn cmd_fixed(storage: &JsonStorage, args: &[String]) -> CliResult {
    let action = expect_arg(args, 0, "fixed <add|list|toggle|remove>")?;
    match action {
        "add" => {
            let usage = "fixed add <name> <value> <category>";
            let name = expect_arg(args, 1, usage)?;
            let value = parse_number(expect_arg(args, 2, usage)?)?;
            let category = FixedCategory::parse(expect_arg(args, 3, usage)?)
                .ok_or_else(|| invalid(format!("unknown fixed category `{}`", args[3])))?;
            with_plan(storage, |plan| {
                FixedExpenseService::add(plan, name, value, category)?;
                Ok(())
            })?;
            println!("Fixed expense `{name}` added.");
        }
        "list" => {
            let plan = load_plan(storage)?;
            for expense in &plan.fixed_expenses {
                let state = if expense.active {
                    "active".green().to_string()
                } else {
                    "inactive".dimmed().to_string()
                };
                println!(
                    "{:<24} {:<14} {:>16}  {state}",
                    expense.name,
                    expense.category.to_string(),
                    format_kz(expense.value),
                );
            }
        }
        "toggle" => {
            let name = expect_arg(args, 1, "fixed toggle <name>")?;
            let mut now_active = false;
            with_plan(storage, |plan| {
                let id = fixed_id_by_name(plan, name)?;
                now_active = FixedExpenseService::toggle(plan, id)?;
                Ok(())
            })?;
            println!(
                "`{name}` is now {}.",
                if now_active { "active" } else { "inactive" }
            );
        }
        "remove" => {
            let name = expect_arg(args, 1, "fixed remove <name>")?;
            with_plan(storage, |plan| {
                let id = fixed_id_by_name(plan, name)?;
                FixedExpenseService::remove(plan, id)?;
                Ok(())
            })?;
            println!("Fixed expense `{name}` removed.");
        }
        _ => return usage_error("fixed <add|list|toggle|remove>"),
    }
    Ok(())
}

fn cmd_goal(storage: &JsonStorage, args: &[String]) -> CliResult {
    let action = expect_arg(args, 0, "goal <add|list|progress|remove>")?;
    match action {
        "add" => {
            let usage = "goal add <name> <target> [account]";
            let name = expect_arg(args, 1, usage)?;
            let target = parse_number(expect_arg(args, 2, usage)?)?;
            let account_name = args.get(3).cloned();
            with_plan(storage, |plan| {
                let linked_account_id = account_name
                    .as_deref()
                    .map(|name| account_id_by_name(plan, name))
                    .transpose()?;
                let mut goal = Goal::new(name, target);
                goal.linked_account_id = linked_account_id;
                GoalService::add(plan, goal)?;
                Ok(())
            })?;
            println!("Goal `{name}` added.");
        }
        "list" => {
            let plan = load_plan(storage)?;
            for goal in &plan.goals {
                println!(
                    "{:<24} {:>16} / {:>16}  ({:.1}%)",
                    goal.name,
                    format_kz(goal.current_amount),
                    format_kz(goal.target_amount),
                    goal.progress_percent(),
                );
            }
        }
        "progress" => {
            let usage = "goal progress <name> <amount>";
            let name = expect_arg(args, 1, usage)?;
            let amount = parse_number(expect_arg(args, 2, usage)?)?;
            with_plan(storage, |plan| {
                let id = goal_id_by_name(plan, name)?;
                GoalService::set_progress(plan, id, amount)?;
                Ok(())
            })?;
            println!("Progress updated on `{name}`.");
        }
        "remove" => {
            let name = expect_arg(args, 1, "goal remove <name>")?;
            with_plan(storage, |plan| {
                let id = goal_id_by_name(plan, name)?;
                GoalService::remove(plan, id)?;
                Ok(())
            })?;
            println!("Goal `{name}` removed.");
        }
        _ => return usage_error("goal <add|list|progress|remove>"),
    }
    Ok(())
}

fn cmd_settings(storage: &JsonStorage, args: &[String]) -> CliResult {
    let action = expect_arg(args, 0, "settings <show|set>")?;
    match action {
        "show" => {
            let plan = load_plan(storage)?;
            let s = &plan.settings;
            println!("salary            {}", format_kz(s.monthly_salary));
            println!("savings-rule      {}%", s.savings_percentage_rule);
            println!("mandatory-savings {}", format_kz(s.mandatory_savings));
            println!("emergency-target  {}", format_kz(s.emergency_fund_target));
            println!("budget-limit      {}", format_kz(s.monthly_budget_limit));
            println!("fixed-limit       {}", format_kz(s.fixed_expenses_limit));
            println!("high-cost         {}", format_kz(s.high_cost_threshold));
            println!("eur-emergency     {}", s.eur_pours_fund_emergency);
        }
        "set" => {
            let usage = "settings set <key> <value>";
            let key = expect_arg(args, 1, usage)?;
            let raw = expect_arg(args, 2, usage)?;
            let mut update = SettingsUpdate::default();
            match key {
                "salary" => update.monthly_salary = Some(parse_number(raw)?),
                "savings-rule" => update.savings_percentage_rule = Some(parse_number(raw)?),
                "emergency-target" => update.emergency_fund_target = Some(parse_number(raw)?),
                "budget-limit" => update.monthly_budget_limit = Some(parse_number(raw)?),
                "fixed-limit" => update.fixed_expenses_limit = Some(parse_number(raw)?),
                "high-cost" => update.high_cost_threshold = Some(parse_number(raw)?),
                "eur-emergency" => update.eur_pours_fund_emergency = Some(parse_switch(raw)?),
                _ => return Err(invalid(format!("unknown settings key `{key}`")).into()),
            }
            with_plan(storage, |plan| {
                SettingsService::update(plan, update.clone())?;
                Ok(())
            })?;
            println!("Settings updated.");
        }
        _ => return usage_error("settings <show|set>"),
    }
    Ok(())
}

fn cmd_summary(storage: &JsonStorage, config: &Config) -> CliResult {
    let plan = load_plan(storage)?;
    let rate = config.exchange_rate;
    let month = current_month();
    let budget = SummaryService::monthly_budget(&plan, &month);

    println!("{}", format!("Plan summary ({month})").bold());
    println!(
        "net worth          {}",
        format_kz(SummaryService::net_worth(&plan, rate))
    );
    println!(
        "total reserve      {}",
        format_kz(SummaryService::total_reserve(&plan, rate))
    );
    println!(
        "kz balances        {}",
        format_kz(SummaryService::kz_balance_total(&plan))
    );
    println!(
        "eur balances       {:.2} €",
        SummaryService::eur_balance_total(&plan)
    );
    println!(
        "emergency fund     {} of {} ({:.1}%)",
        format_kz(plan.emergency_fund_current),
        format_kz(plan.settings.emergency_fund_target),
        SummaryService::emergency_progress(&plan)
    );
    let remaining = format_kz(budget.remaining);
    println!(
        "budget remaining   {}",
        if budget.over_budget {
            remaining.red().to_string()
        } else {
            remaining.green().to_string()
        }
    );
    println!(
        "  fixed expenses   {}",
        format_kz(budget.fixed_total)
    );
    println!(
        "  month activities {}",
        format_kz(budget.activities_total)
    );

    let history = SummaryService::monthly_savings_report(&plan);
    if !history.is_empty() {
        println!("{}", "Savings by month".bold());
        for bucket in history {
            println!(
                "  {}  {:>16}  {:>12.2} €",
                bucket.month,
                format_kz(bucket.kz_poured),
                bucket.eur_poured
            );
        }
    }
    Ok(())
}

fn cmd_convert(config: &Config, args: &[String]) -> CliResult {
    let usage = "convert <amount> <kz|eur>";
    let amount = parse_number(expect_arg(args, 0, usage)?)?;
    let currency = parse_currency(expect_arg(args, 1, usage)?)?;
    match currency {
        Currency::Eur => println!(
            "{} = {}",
            format_amount(amount, Currency::Eur),
            format_kz(convert_to_kz(amount, Currency::Eur, config.exchange_rate))
        ),
        Currency::Kz => println!(
            "{} = {:.2} €",
            format_kz(amount),
            amount / config.exchange_rate
        ),
    }
    Ok(())
}

fn cmd_export(storage: &JsonStorage, args: &[String]) -> CliResult {
    let usage = "export <activities|savings> <file.csv>";
    let what = expect_arg(args, 0, usage)?;
    let path = PathBuf::from(expect_arg(args, 1, usage)?);
    let plan = load_plan(storage)?;
    match what {
        "activities" => export::export_activities_to_path(&plan, &path)?,
        "savings" => export::export_savings_to_path(&plan, &path)?,
        _ => return usage_error(usage),
    }
    println!("Exported to {}.", path.display());
    Ok(())
}

// ---- plan plumbing ----------------------------------------------------

fn session_user(storage: &JsonStorage) -> Result<User, Box<dyn std::error::Error>> {
    storage
        .current_session()?
        .ok_or_else(|| invalid("no user logged in; run `kwanza_cli login <email>`".into()).into())
}

fn load_plan(storage: &JsonStorage) -> Result<Plan, Box<dyn std::error::Error>> {
    let user = session_user(storage)?;
    let report = storage.load(&user)?;
    print_load_notes(&report.migrations, &report.warnings);
    Ok(report.plan)
}

/// Loads the active plan, applies one mutation, and saves it back.
fn with_plan<F>(storage: &JsonStorage, mutate: F) -> CliResult
where
    F: FnOnce(&mut Plan) -> CliResult,
{
    let mut plan = load_plan(storage)?;
    mutate(&mut plan)?;
    storage.save(&plan)?;
    Ok(())
}

fn print_load_notes(migrations: &[String], warnings: &[String]) {
    for note in migrations {
        eprintln!("{} {note}", "migrated:".cyan());
    }
    for warning in warnings {
        eprintln!("{} {warning}", "warning:".yellow());
    }
}

// ---- lookup helpers ---------------------------------------------------

fn account_id_by_name(plan: &Plan, name: &str) -> Result<Uuid, Box<dyn std::error::Error>> {
    plan.accounts
        .iter()
        .find(|account| account.name.eq_ignore_ascii_case(name.trim()))
        .map(|account| account.id)
        .ok_or_else(|| invalid(format!("no account named `{name}`")).into())
}

fn activity_id_by_name(plan: &Plan, name: &str) -> Result<Uuid, Box<dyn std::error::Error>> {
    plan.activities
        .iter()
        .find(|activity| activity.name.eq_ignore_ascii_case(name.trim()))
        .map(|activity| activity.id)
        .ok_or_else(|| invalid(format!("no activity named `{name}`")).into())
}

fn fixed_id_by_name(plan: &Plan, name: &str) -> Result<Uuid, Box<dyn std::error::Error>> {
    plan.fixed_expenses
        .iter()
        .find(|expense| expense.name.eq_ignore_ascii_case(name.trim()))
        .map(|expense| expense.id)
        .ok_or_else(|| invalid(format!("no fixed expense named `{name}`")).into())
}

fn goal_id_by_name(plan: &Plan, name: &str) -> Result<Uuid, Box<dyn std::error::Error>> {
    plan.goals
        .iter()
        .find(|goal| goal.name.eq_ignore_ascii_case(name.trim()))
        .map(|goal| goal.id)
        .ok_or_else(|| invalid(format!("no goal named `{name}`")).into())
}

fn resolve_id<T: Identifiable>(
    items: &[T],
    prefix: &str,
    label: &str,
) -> Result<Uuid, Box<dyn std::error::Error>> {
    let needle = prefix.trim().to_ascii_lowercase();
    let matches: Vec<Uuid> = items
        .iter()
        .map(Identifiable::id)
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(invalid(format!("no {label} matches `{prefix}`")).into()),
        _ => Err(invalid(format!("`{prefix}` is ambiguous; use more characters")).into()),
    }
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

// ---- argument parsing -------------------------------------------------

struct Options {
    values: Vec<(String, String)>,
    flags: Vec<String>,
}

impl Options {
    fn value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn flag(&self, key: &str) -> bool {
        self.flags.iter().any(|k| k == key)
    }
}

/// Separates `--key value` options and `--flag` switches from positionals.
fn split_options(args: &[String]) -> (Vec<String>, Options) {
    let mut positional = Vec::new();
    let mut options = Options {
        values: Vec::new(),
        flags: Vec::new(),
    };
    // Switches that never take a value.
    const SWITCHES: &[&str] = &["--planned"];
    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            if SWITCHES.contains(&arg.as_str()) {
                options.flags.push(arg.clone());
            } else {
                match iter.peek() {
                    Some(next) if !next.starts_with("--") => {
                        let value = iter.next().cloned().unwrap_or_default();
                        options.values.push((arg.clone(), value));
                    }
                    _ => options.flags.push(arg.clone()),
                }
            }
        } else {
            positional.push(arg.clone());
        }
    }
    (positional, options)
}

fn expect_arg<'a>(
    args: &'a [String],
    index: usize,
    usage: &str,
) -> Result<&'a str, Box<dyn std::error::Error>> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| invalid(format!("usage: kwanza_cli {usage}")).into())
}

fn parse_number(raw: &str) -> Result<f64, Box<dyn std::error::Error>> {
    raw.replace([' ', '_'], "")
        .parse::<f64>()
        .map_err(|_| invalid(format!("`{raw}` is not a number")).into())
}

fn parse_currency(raw: &str) -> Result<Currency, Box<dyn std::error::Error>> {
    Currency::parse(raw).ok_or_else(|| invalid(format!("unknown currency `{raw}`")).into())
}

fn parse_switch(raw: &str) -> Result<bool, Box<dyn std::error::Error>> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(invalid(format!("expected on/off, got `{raw}`")).into()),
    }
}

fn invalid(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, message)
}

fn usage_error(usage: &str) -> CliResult {
    Err(invalid(format!("usage: kwanza_cli {usage}")).into())
}

fn print_usage() {
    eprintln!(
        "Usage: kwanza_cli <command>\n\
         Commands:\n  \
         login <email> [name] | logout | whoami\n  \
         account add|list|rename|set-balance|include|savings-flag|remove\n  \
         txn add|list|complete|remove\n  \
         pour <amount> <kz|eur> <target-account> [--surplus <account>] [--month YYYY-MM]\n  \
         savings list|remove\n  \
         activity add|list|pay|unpay|remove\n  \
         fixed add|list|toggle|remove\n  \
         goal add|list|progress|remove\n  \
         settings show|set\n  \
         summary | convert <amount> <kz|eur>\n  \
         export activities|savings <file.csv>\n  \
         backup [note] | backups | restore <backup-name>"
    );
}
