//! Business rule validation for ledger operations.
//!
//! Rules are checked in a fixed order and the first violation is returned:
//! 1. at least two entries
//! 2. each entry carries exactly one positive amount that fits the money column
//! 3. debits equal credits
//! 4. every referenced account exists and is active
//! 5. the transaction date lies inside its fiscal year, which is open
//!
//! Validation never mutates state.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use tally_shared::types::{AccountId, AccountTypeId, JournalEntryId, check_amount};

use super::balance::NormalBalance;
use super::entry::JournalEntry;
use super::error::LedgerError;
use super::transaction::Transaction;
use super::types::{EntrySide, TransactionTotals};
use crate::chart::AccountType;
use crate::fiscal::{FiscalYear, Period};
use crate::repository::{AccountRepository, FiscalYearRepository};

/// One entry after the structural checks: its side and rescaled amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedLine {
    /// The side carrying the amount.
    pub side: EntrySide,
    /// The positive amount at ledger scale.
    pub amount: Decimal,
}

/// Checks rules 1 to 3, which need nothing but the entries themselves.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn check_entries(
    entries: &[JournalEntry],
) -> Result<(Vec<CheckedLine>, TransactionTotals), LedgerError> {
    if entries.len() < 2 {
        return Err(LedgerError::InsufficientEntries {
            count: entries.len(),
        });
    }

    let mut lines = Vec::with_capacity(entries.len());
    let mut debit = Decimal::ZERO;
    let mut credit = Decimal::ZERO;

    for (index, entry) in entries.iter().enumerate() {
        let line = index + 1;
        if entry.debit_amount < Decimal::ZERO || entry.credit_amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount { line });
        }
        let side = entry
            .side()
            .ok_or(LedgerError::InvalidEntryAmount { line })?;
        let amount = check_amount(entry.amount())
            .map_err(|source| LedgerError::InvalidAmountPrecision { line, source })?;

        match side {
            EntrySide::Debit => debit += amount,
            EntrySide::Credit => credit += amount,
        }
        lines.push(CheckedLine { side, amount });
    }

    let totals = TransactionTotals::new(debit, credit);
    if !totals.is_balanced {
        return Err(LedgerError::UnbalancedTransaction { debit, credit });
    }

    Ok((lines, totals))
}

/// An entry resolved against its account's sign convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// The journal entry.
    pub entry_id: JournalEntryId,
    /// The account posted to.
    pub account_id: AccountId,
    /// Debit or credit.
    pub side: EntrySide,
    /// Positive amount at ledger scale.
    pub amount: Decimal,
    /// The account's normal balance.
    pub normal_balance: NormalBalance,
}

impl ResolvedEntry {
    /// Change to the account balance: positive when the entry side matches
    /// the account's normal balance.
    #[must_use]
    pub fn signed_delta(&self) -> Decimal {
        match self.side {
            EntrySide::Debit => self.normal_balance.balance_change(self.amount, Decimal::ZERO),
            EntrySide::Credit => self.normal_balance.balance_change(Decimal::ZERO, self.amount),
        }
    }
}

/// A transaction that passed every rule, ready for the poster.
#[derive(Debug, Clone)]
pub struct ValidatedTransaction {
    /// The transaction as read.
    pub transaction: Transaction,
    /// Its (open) fiscal year.
    pub fiscal_year: FiscalYear,
    /// The ledger period of the transaction date.
    pub period: Period,
    /// The journal entries exactly as validated.
    pub journal: Vec<JournalEntry>,
    /// Entries with side and sign convention resolved.
    pub entries: Vec<ResolvedEntry>,
    /// Debit and credit totals.
    pub totals: TransactionTotals,
}

impl ValidatedTransaction {
    /// Net balance change per account, in account id order.
    #[must_use]
    pub fn account_deltas(&self) -> BTreeMap<AccountId, Decimal> {
        let mut deltas = BTreeMap::new();
        for entry in &self.entries {
            *deltas.entry(entry.account_id).or_insert(Decimal::ZERO) += entry.signed_delta();
        }
        deltas
    }
}

/// Validates transactions against the chart and fiscal calendar in a store.
pub struct Validator<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> Validator<'a, S>
where
    S: AccountRepository + FiscalYearRepository + ?Sized,
{
    /// Creates a validator reading from `store`.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Runs all five rules.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule, a not-found error for a missing
    /// account, account type or fiscal year, or a storage error.
    pub fn validate(
        &self,
        transaction: &Transaction,
        entries: &[JournalEntry],
    ) -> Result<ValidatedTransaction, LedgerError> {
        let (lines, totals) = check_entries(entries)?;

        let mut types: HashMap<AccountTypeId, AccountType> = HashMap::new();
        let mut resolved = Vec::with_capacity(entries.len());
        for (entry, line) in entries.iter().zip(lines) {
            let account = self
                .store
                .account(entry.account_id)?
                .ok_or(LedgerError::AccountNotFound(entry.account_id))?;
            if !account.is_active {
                return Err(LedgerError::AccountInactive(account.id));
            }

            let normal_balance = match types.get(&account.account_type_id) {
                Some(account_type) => account_type.normal_balance,
                None => {
                    let account_type = self
                        .store
                        .account_type(account.account_type_id)?
                        .ok_or(LedgerError::AccountTypeNotFound(account.account_type_id))?;
                    let normal_balance = account_type.normal_balance;
                    types.insert(account_type.id, account_type);
                    normal_balance
                }
            };

            resolved.push(ResolvedEntry {
                entry_id: entry.id,
                account_id: account.id,
                side: line.side,
                amount: line.amount,
                normal_balance,
            });
        }

        let fiscal_year = self
            .store
            .fiscal_year(transaction.fiscal_year_id)?
            .ok_or(LedgerError::FiscalYearNotFound(transaction.fiscal_year_id))?;
        if !fiscal_year.contains_date(transaction.transaction_date) {
            return Err(LedgerError::DateOutsideFiscalYear {
                date: transaction.transaction_date,
                fiscal_year_id: fiscal_year.id,
            });
        }
        if fiscal_year.is_closed {
            return Err(LedgerError::FiscalYearClosed(fiscal_year.id));
        }

        Ok(ValidatedTransaction {
            transaction: transaction.clone(),
            fiscal_year,
            period: Period::from_date(transaction.transaction_date),
            journal: entries.to_vec(),
            entries: resolved,
            totals,
        })
    }
}
