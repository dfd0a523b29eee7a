//! Statement generation from a ledger snapshot.
//!
//! Builders are pure: they read one [`LedgerSnapshot`] and never touch the
//! store, so every statement reflects a single consistent point in time.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, AccountTypeId};

use super::types::{
    BalanceSheet, CashFlowStatement, EquityMovement, EquityStatement, IncomeStatement,
    StatementBody, StatementLine, StatementSection, StatementType, TrialBalance,
    TrialBalanceLine,
};
use crate::chart::{Account, AccountCategory, AccountType};
use crate::fiscal::Period;
use crate::ledger::{LedgerError, LedgerRow, NormalBalance, balance_as_of, balance_before};
use crate::repository::LedgerSnapshot;

/// An account with activity in the snapshot, joined with its type and rows.
struct AccountLedger<'a> {
    account: &'a Account,
    account_type: &'a AccountType,
    rows: Vec<&'a LedgerRow>,
}

impl AccountLedger<'_> {
    /// Balance at the end of `period` in the account's own convention.
    fn closing(&self, period: Period) -> Decimal {
        balance_as_of(self.rows.iter().copied(), period)
    }

    /// Balance at the start of `period` in the account's own convention.
    fn opening(&self, period: Period) -> Decimal {
        balance_before(self.rows.iter().copied(), period)
    }

    fn category(&self) -> AccountCategory {
        self.account_type.category
    }

    /// A statement line with `balance` converted into the section's convention.
    fn line(&self, balance: Decimal) -> StatementLine {
        StatementLine {
            account_id: self.account.id,
            code: self.account.code.clone(),
            name: self.account.name.clone(),
            amount: self.account_type.section_amount(balance),
        }
    }

    fn has_activity_through(&self, period: Period) -> bool {
        self.rows.iter().any(|row| row.period <= period)
    }
}

/// Builds statements and trial balances from a snapshot.
pub struct StatementBuilder<'a> {
    snapshot: &'a LedgerSnapshot,
    ledgers: Vec<AccountLedger<'a>>,
}

impl<'a> StatementBuilder<'a> {
    /// Indexes the snapshot. Accounts without ledger rows are left out.
    ///
    /// # Errors
    ///
    /// Returns `AccountTypeNotFound` if an account with rows has a type the
    /// snapshot lacks, or `AccountNotFound` for rows of an unknown account.
    pub fn new(snapshot: &'a LedgerSnapshot) -> Result<Self, LedgerError> {
        let types: HashMap<AccountTypeId, &AccountType> = snapshot
            .account_types
            .iter()
            .map(|t| (t.id, t))
            .collect();

        let mut rows: HashMap<AccountId, Vec<&LedgerRow>> = HashMap::new();
        for row in &snapshot.rows {
            rows.entry(row.account_id).or_default().push(row);
        }

        let mut ledgers: Vec<AccountLedger<'a>> = Vec::new();
        for account in &snapshot.accounts {
            let Some(mut account_rows) = rows.remove(&account.id) else {
                continue;
            };
            let account_type = types
                .get(&account.account_type_id)
                .copied()
                .ok_or(LedgerError::AccountTypeNotFound(account.account_type_id))?;
            account_rows.sort_by_key(|row| row.period);
            ledgers.push(AccountLedger {
                account,
                account_type,
                rows: account_rows,
            });
        }
        if let Some(orphan) = rows.keys().next() {
            return Err(LedgerError::AccountNotFound(*orphan));
        }
        ledgers.sort_by(|a, b| a.account.code.cmp(&b.account.code));

        Ok(Self { snapshot, ledgers })
    }

    /// Builds the body for `statement_type`.
    #[must_use]
    pub fn build(&self, statement_type: StatementType, period: Option<Period>) -> StatementBody {
        match statement_type {
            StatementType::Income => StatementBody::Income(self.income_statement(period)),
            StatementType::Balance => StatementBody::Balance(self.balance_sheet(period)),
            StatementType::CashFlow => StatementBody::CashFlow(self.cash_flow(period)),
            StatementType::Equity => StatementBody::Equity(self.equity_statement(period)),
        }
    }

    /// Periods covered: the single period, or the whole fiscal year.
    fn range(&self, period: Option<Period>) -> (Period, Period) {
        let fiscal_year = &self.snapshot.fiscal_year;
        period.map_or_else(
            || (fiscal_year.first_period(), fiscal_year.last_period()),
            |p| (p, p),
        )
    }

    fn dates(&self, period: Option<Period>) -> (NaiveDate, NaiveDate) {
        let fiscal_year = &self.snapshot.fiscal_year;
        (fiscal_year.range_start(period), fiscal_year.boundary_date(period))
    }

    fn active_through(&self, last: Period) -> impl Iterator<Item = &AccountLedger<'a>> {
        self.ledgers
            .iter()
            .filter(move |ledger| ledger.has_activity_through(last))
    }

    /// Revenue minus expenses over `first..=last`.
    fn net_income_between(&self, first: Period, last: Period) -> Decimal {
        self.active_through(last)
            .filter_map(|ledger| {
                let movement = ledger.closing(last) - ledger.opening(first);
                let amount = ledger.account_type.section_amount(movement);
                match ledger.category() {
                    AccountCategory::Revenue => Some(amount),
                    AccountCategory::Expense => Some(-amount),
                    _ => None,
                }
            })
            .sum()
    }

    /// Revenue minus expenses from the start of the fiscal year through `last`.
    fn earnings_through(&self, last: Period) -> Decimal {
        self.net_income_between(self.snapshot.fiscal_year.first_period(), last)
    }

    /// Revenue and expense movement over the period or the whole year.
    #[must_use]
    pub fn income_statement(&self, period: Option<Period>) -> IncomeStatement {
        let (first, last) = self.range(period);
        let (period_start, period_end) = self.dates(period);

        let mut revenue = StatementSection::default();
        let mut expenses = StatementSection::default();
        for ledger in self.active_through(last) {
            let movement = ledger.closing(last) - ledger.opening(first);
            match ledger.category() {
                AccountCategory::Revenue => revenue.push(ledger.line(movement)),
                AccountCategory::Expense => expenses.push(ledger.line(movement)),
                _ => {}
            }
        }

        let net_income = revenue.total - expenses.total;
        IncomeStatement {
            period_start,
            period_end,
            revenue,
            expenses,
            net_income,
        }
    }

    /// Balances at the end of the period (or year).
    #[must_use]
    pub fn balance_sheet(&self, period: Option<Period>) -> BalanceSheet {
        let (_, last) = self.range(period);
        let (_, as_of) = self.dates(period);

        let mut assets = StatementSection::default();
        let mut liabilities = StatementSection::default();
        let mut equity = StatementSection::default();
        for ledger in self.active_through(last) {
            let section = match ledger.category() {
                AccountCategory::Asset => &mut assets,
                AccountCategory::Liability => &mut liabilities,
                AccountCategory::Equity => &mut equity,
                AccountCategory::Revenue | AccountCategory::Expense => continue,
            };
            section.push(ledger.line(ledger.closing(last)));
        }

        let current_earnings = self.earnings_through(last);
        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity = equity.total + current_earnings;
        let total_liabilities_and_equity = total_liabilities + total_equity;

        BalanceSheet {
            as_of,
            assets,
            liabilities,
            equity,
            current_earnings,
            total_assets,
            total_liabilities,
            total_equity,
            total_liabilities_and_equity,
            is_balanced: total_assets == total_liabilities_and_equity,
        }
    }

    /// Cash flow by the indirect method.
    #[must_use]
    pub fn cash_flow(&self, period: Option<Period>) -> CashFlowStatement {
        let (first, last) = self.range(period);
        let (period_start, period_end) = self.dates(period);

        let mut non_cash_assets = StatementSection::default();
        let mut liabilities = StatementSection::default();
        let mut equity = StatementSection::default();
        let mut cash_accounts = StatementSection::default();
        let mut opening_cash = Decimal::ZERO;

        for ledger in self.active_through(last) {
            let opening = ledger.opening(first);
            let closing = ledger.closing(last);
            let change = closing - opening;
            match ledger.category() {
                AccountCategory::Asset if ledger.account.is_cash => {
                    opening_cash += ledger.account_type.section_amount(opening);
                    cash_accounts.push(ledger.line(closing));
                }
                AccountCategory::Asset => non_cash_assets.push(ledger.line(-change)),
                AccountCategory::Liability => liabilities.push(ledger.line(change)),
                AccountCategory::Equity => equity.push(ledger.line(change)),
                AccountCategory::Revenue | AccountCategory::Expense => {}
            }
        }

        let net_income = self.net_income_between(first, last);
        let net_change_in_cash =
            net_income + non_cash_assets.total + liabilities.total + equity.total;
        let closing_cash = cash_accounts.total;

        CashFlowStatement {
            period_start,
            period_end,
            net_income,
            non_cash_assets,
            liabilities,
            equity,
            net_change_in_cash,
            opening_cash,
            cash_accounts,
            closing_cash,
            is_reconciled: opening_cash + net_change_in_cash == closing_cash,
        }
    }

    /// Opening, movement and closing of each equity account plus earnings.
    #[must_use]
    pub fn equity_statement(&self, period: Option<Period>) -> EquityStatement {
        let (first, last) = self.range(period);
        let (period_start, period_end) = self.dates(period);

        let accounts: Vec<EquityMovement> = self
            .active_through(last)
            .filter(|ledger| ledger.category() == AccountCategory::Equity)
            .map(|ledger| {
                let opening = ledger.account_type.section_amount(ledger.opening(first));
                let closing = ledger.account_type.section_amount(ledger.closing(last));
                EquityMovement {
                    account_id: ledger.account.id,
                    code: ledger.account.code.clone(),
                    name: ledger.account.name.clone(),
                    opening,
                    movement: closing - opening,
                    closing,
                }
            })
            .collect();

        let net_income = self.net_income_between(first, last);
        let opening_earnings = self.earnings_through(last) - net_income;
        let opening_accounts: Decimal = accounts.iter().map(|a| a.opening).sum();
        let account_movements: Decimal = accounts.iter().map(|a| a.movement).sum();
        let opening_equity = opening_accounts + opening_earnings;

        EquityStatement {
            period_start,
            period_end,
            accounts,
            opening_earnings,
            opening_equity,
            account_movements,
            net_income,
            closing_equity: opening_equity + account_movements + net_income,
        }
    }

    /// Debit and credit columns of every account at the end of the period.
    #[must_use]
    pub fn trial_balance(&self, period: Option<Period>) -> TrialBalance {
        let (_, last) = self.range(period);
        let (_, as_of) = self.dates(period);

        let lines: Vec<TrialBalanceLine> = self
            .active_through(last)
            .map(|ledger| {
                let normal_balance = ledger.account_type.normal_balance;
                let balance = ledger.closing(last);
                let (debit, credit) = match (normal_balance, balance >= Decimal::ZERO) {
                    (NormalBalance::Debit, true) => (balance, Decimal::ZERO),
                    (NormalBalance::Debit, false) => (Decimal::ZERO, -balance),
                    (NormalBalance::Credit, true) => (Decimal::ZERO, balance),
                    (NormalBalance::Credit, false) => (-balance, Decimal::ZERO),
                };
                TrialBalanceLine {
                    account_id: ledger.account.id,
                    code: ledger.account.code.clone(),
                    name: ledger.account.name.clone(),
                    normal_balance,
                    balance,
                    debit,
                    credit,
                }
            })
            .collect();

        let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();
        TrialBalance {
            fiscal_year_id: self.snapshot.fiscal_year.id,
            as_of,
            lines,
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }
}
