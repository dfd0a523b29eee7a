//! Demo ledger seeder for Tally development and testing.
//!
//! Seeds a chart of accounts, the 2026 fiscal year and a year of sample
//! postings (including one reversed mistake) into an in-memory store, then
//! prints every financial statement as JSON on stdout. Logs go to stderr.
//!
//! Usage: cargo run --bin seeder

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_core::LedgerEngine;
use tally_core::chart::{AccountCategory, NewAccount, NewAccountType};
use tally_core::fiscal::FiscalYear;
use tally_core::ledger::{NewJournalEntry, NewTransaction, NormalBalance};
use tally_core::reports::StatementType;
use tally_db::MemoryStore;
use tally_shared::types::{AccountId, AccountTypeId, UserId};
use tally_shared::{AppConfig, LoggingConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type Engine = LedgerEngine<MemoryStore>;

/// Account types: name, normal balance, category.
const ACCOUNT_TYPES: [(&str, NormalBalance, AccountCategory); 7] = [
    ("Current Asset", NormalBalance::Debit, AccountCategory::Asset),
    ("Fixed Asset", NormalBalance::Debit, AccountCategory::Asset),
    ("Contra Asset", NormalBalance::Credit, AccountCategory::Asset),
    ("Current Liability", NormalBalance::Credit, AccountCategory::Liability),
    ("Owner Equity", NormalBalance::Credit, AccountCategory::Equity),
    ("Operating Revenue", NormalBalance::Credit, AccountCategory::Revenue),
    ("Operating Expense", NormalBalance::Debit, AccountCategory::Expense),
];

/// Accounts: code, name, type, parent code, cash flag.
const ACCOUNTS: [(&str, &str, &str, Option<&str>, bool); 10] = [
    ("1000", "Cash", "Current Asset", None, true),
    ("1010", "Operating Bank", "Current Asset", Some("1000"), true),
    ("1100", "Accounts Receivable", "Current Asset", None, false),
    ("1500", "Equipment", "Fixed Asset", None, false),
    ("1510", "Accumulated Depreciation", "Contra Asset", None, false),
    ("2000", "Accounts Payable", "Current Liability", None, false),
    ("3000", "Owner's Capital", "Owner Equity", None, false),
    ("4000", "Sales Revenue", "Operating Revenue", None, false),
    ("5000", "Rent Expense", "Operating Expense", None, false),
    ("5100", "Depreciation Expense", "Operating Expense", None, false),
];

/// Sample postings: reference, (month, day), description, debit code, credit code, amount.
const POSTINGS: [(&str, (u32, u32), &str, &str, &str, Decimal); 8] = [
    ("CAP-001", (1, 2), "Owner investment", "1010", "3000", dec!(20000)),
    ("EQP-001", (2, 1), "Delivery van", "1500", "1010", dec!(6000)),
    ("INV-001", (3, 14), "Cash sales", "1000", "4000", dec!(3500)),
    ("INV-002", (3, 28), "Sales on account", "1100", "4000", dec!(2200)),
    ("BIL-001", (4, 1), "April rent", "5000", "2000", dec!(1500)),
    ("PAY-001", (5, 5), "Rent payment", "2000", "1010", dec!(1000)),
    ("DEP-001", (6, 30), "Van depreciation", "5100", "1510", dec!(250)),
    ("RCP-001", (7, 10), "Customer payment", "1010", "1100", dec!(1200)),
];

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn date(month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2026, month, day)
        .with_context(|| format!("invalid date 2026-{month}-{day}"))
}

/// Creates the account types and accounts; returns account ids by code.
fn seed_chart(engine: &Engine) -> anyhow::Result<HashMap<&'static str, AccountId>> {
    let mut types: HashMap<&str, AccountTypeId> = HashMap::new();
    for (name, normal_balance, category) in ACCOUNT_TYPES {
        let account_type = engine.create_account_type(NewAccountType {
            name: name.to_string(),
            normal_balance,
            category,
            description: String::new(),
        })?;
        types.insert(name, account_type.id);
    }

    let mut accounts = HashMap::new();
    for (code, name, type_name, parent, is_cash) in ACCOUNTS {
        let Some(&account_type_id) = types.get(type_name) else {
            bail!("unknown account type {type_name}");
        };
        let mut input = NewAccount::new(code, name, account_type_id);
        if let Some(parent_code) = parent {
            let parent_id = accounts
                .get(parent_code)
                .copied()
                .with_context(|| format!("parent {parent_code} must be seeded before {code}"))?;
            input = input.with_parent(parent_id);
        }
        if is_cash {
            input = input.cash();
        }
        accounts.insert(code, engine.create_account(input)?.id);
    }

    info!(account_types = types.len(), accounts = accounts.len(), "chart seeded");
    Ok(accounts)
}

/// Posts the sample transactions, then records and reverses a mistake.
fn seed_postings(
    engine: &Engine,
    accounts: &HashMap<&'static str, AccountId>,
    user: UserId,
) -> anyhow::Result<()> {
    let account = |code: &str| {
        accounts
            .get(code)
            .copied()
            .with_context(|| format!("account {code} not seeded"))
    };

    let mut drafts = Vec::with_capacity(POSTINGS.len());
    for (reference, (month, day), description, debit, credit, amount) in POSTINGS {
        let draft = engine.create_transaction(
            NewTransaction::new(
                date(month, day)?,
                description,
                user,
                vec![
                    NewJournalEntry::debit(account(debit)?, amount),
                    NewJournalEntry::credit(account(credit)?, amount),
                ],
            )
            .with_reference(reference),
        )?;
        drafts.push(draft.id);
    }
    for result in engine.post_batch(&drafts) {
        result?;
    }

    let mistake = engine.create_transaction(
        NewTransaction::new(
            date(8, 3)?,
            "Supplies booked to rent by mistake",
            user,
            vec![
                NewJournalEntry::debit(account("5000")?, dec!(180)),
                NewJournalEntry::credit(account("1000")?, dec!(180)),
            ],
        )
        .with_reference("BIL-002"),
    )?;
    engine.post(mistake.id)?;
    let (voided, reversal) = engine.void_with_reversal(mistake.id, date(8, 4)?, user)?;
    info!(
        voided = %voided.reference,
        reversal = %reversal.transaction.reference,
        "mistake reversed"
    );
    Ok(())
}

fn print_statements(
    engine: &Engine,
    fiscal_year: &FiscalYear,
    user: UserId,
) -> anyhow::Result<()> {
    for statement_type in StatementType::ALL {
        let statement = engine.generate_statement(statement_type, fiscal_year.id, None, user)?;
        info!(statement = %statement, "statement generated");
        println!("{}", statement.to_json()?);
    }

    let trial = engine.trial_balance(fiscal_year.id, None)?;
    info!(
        total_debit = %trial.total_debit,
        total_credit = %trial.total_credit,
        is_balanced = trial.is_balanced,
        "trial balance"
    );
    if !trial.is_balanced {
        bail!("trial balance does not balance");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let engine = LedgerEngine::with_config(Arc::new(MemoryStore::new()), &config);
    let user = UserId::new();

    let accounts = seed_chart(&engine)?;
    let fiscal_year = engine.create_fiscal_year("FY2026", date(1, 1)?, date(12, 31)?)?;
    seed_postings(&engine, &accounts, user)?;
    print_statements(&engine, &fiscal_year, user)?;

    info!(fiscal_year = %fiscal_year.name, "seeding complete");
    Ok(())
}
