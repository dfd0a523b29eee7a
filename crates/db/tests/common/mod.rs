//! Shared fixture for engine tests over the in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_core::LedgerEngine;
use tally_core::chart::{Account, AccountCategory, AccountType, NewAccount, NewAccountType};
use tally_core::fiscal::FiscalYear;
use tally_core::ledger::{
    NewJournalEntry, NewTransaction, NormalBalance, PostingReceipt, Transaction,
};
use tally_db::MemoryStore;
use tally_shared::types::UserId;

/// A 2026 fiscal year with a small chart of accounts.
pub struct TestLedger {
    pub engine: LedgerEngine<MemoryStore>,
    pub fiscal_year: FiscalYear,
    pub user: UserId,
    pub asset_type: AccountType,
    pub cash: Account,
    pub receivables: Account,
    pub payables: Account,
    pub capital: Account,
    pub revenue: Account,
    pub rent: Account,
}

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

fn account_type(
    engine: &LedgerEngine<MemoryStore>,
    name: &str,
    normal_balance: NormalBalance,
    category: AccountCategory,
) -> AccountType {
    engine
        .create_account_type(NewAccountType {
            name: name.to_string(),
            normal_balance,
            category,
            description: String::new(),
        })
        .unwrap()
}

impl TestLedger {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        let engine = LedgerEngine::new(store);
        let fiscal_year = engine
            .create_fiscal_year("FY2026", date(1, 1), date(12, 31))
            .unwrap();

        let asset_type = account_type(
            &engine,
            "Asset",
            NormalBalance::Debit,
            AccountCategory::Asset,
        );
        let liability = account_type(
            &engine,
            "Liability",
            NormalBalance::Credit,
            AccountCategory::Liability,
        );
        let equity = account_type(
            &engine,
            "Equity",
            NormalBalance::Credit,
            AccountCategory::Equity,
        );
        let revenue = account_type(
            &engine,
            "Revenue",
            NormalBalance::Credit,
            AccountCategory::Revenue,
        );
        let expense = account_type(
            &engine,
            "Expense",
            NormalBalance::Debit,
            AccountCategory::Expense,
        );

        let cash = engine
            .create_account(NewAccount::new("1000", "Cash", asset_type.id).cash())
            .unwrap();
        let receivables = engine
            .create_account(NewAccount::new("1100", "Accounts Receivable", asset_type.id))
            .unwrap();
        let payables = engine
            .create_account(NewAccount::new("2000", "Accounts Payable", liability.id))
            .unwrap();
        let capital = engine
            .create_account(NewAccount::new("3000", "Owner's Capital", equity.id))
            .unwrap();
        let revenue = engine
            .create_account(NewAccount::new("4000", "Sales Revenue", revenue.id))
            .unwrap();
        let rent = engine
            .create_account(NewAccount::new("5000", "Rent Expense", expense.id))
            .unwrap();

        Self {
            engine,
            fiscal_year,
            user: UserId::new(),
            asset_type,
            cash,
            receivables,
            payables,
            capital,
            revenue,
            rent,
        }
    }

    /// Creates a two-line draft moving `amount` from `credit` to `debit`.
    pub fn draft(
        &self,
        on: NaiveDate,
        debit: &Account,
        credit: &Account,
        amount: Decimal,
    ) -> Transaction {
        self.engine
            .create_transaction(NewTransaction::new(
                on,
                format!("{} / {}", debit.name, credit.name),
                self.user,
                vec![
                    NewJournalEntry::debit(debit.id, amount),
                    NewJournalEntry::credit(credit.id, amount),
                ],
            ))
            .unwrap()
    }

    /// Creates and posts a two-line transaction.
    pub fn post(
        &self,
        on: NaiveDate,
        debit: &Account,
        credit: &Account,
        amount: Decimal,
    ) -> PostingReceipt {
        let draft = self.draft(on, debit, credit, amount);
        self.engine.post(draft.id).unwrap()
    }

    /// Year-end balance of an account.
    pub fn balance(&self, account: &Account) -> Decimal {
        self.engine
            .account_balance(account.id, self.fiscal_year.id, None)
            .unwrap()
    }
}
