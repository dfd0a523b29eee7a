//! The in-process store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tally_core::chart::{Account, AccountType};
use tally_core::fiscal::{FiscalYear, Period};
use tally_core::ledger::{JournalEntry, LedgerRow, Transaction};
use tally_core::reports::FinancialStatement;
use tally_core::repository::{StoreError, StoreResult};
use tally_shared::types::{AccountId, AccountTypeId, FiscalYearId, StatementId, TransactionId};

/// Ledger row key, ordered so one account's rows of a year are contiguous
/// and sorted by period.
pub(crate) type RowKey = (FiscalYearId, AccountId, Period);

/// Everything the store holds.
#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) account_types: HashMap<AccountTypeId, AccountType>,
    pub(crate) accounts: HashMap<AccountId, Account>,
    pub(crate) fiscal_years: HashMap<FiscalYearId, FiscalYear>,
    pub(crate) transactions: HashMap<TransactionId, Transaction>,
    pub(crate) entries: HashMap<TransactionId, Vec<JournalEntry>>,
    pub(crate) rows: BTreeMap<RowKey, LedgerRow>,
    pub(crate) statements: HashMap<StatementId, FinancialStatement>,
    /// Statement ids in insertion order.
    pub(crate) statement_order: Vec<StatementId>,
}

impl State {
    pub(crate) fn rows_of(
        &self,
        account_id: AccountId,
        fiscal_year_id: FiscalYearId,
    ) -> impl Iterator<Item = &LedgerRow> {
        self.rows
            .iter()
            .filter(move |((fy, account, _), _)| *fy == fiscal_year_id && *account == account_id)
            .map(|(_, row)| row)
    }

    pub(crate) fn transaction_mut(&mut self, id: TransactionId) -> StoreResult<&mut Transaction> {
        self.transactions
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("transaction {id}")))
    }
}

/// Thread-safe in-memory implementation of every repository trait.
///
/// Every call takes the state lock once, so each call is atomic and
/// [`tally_core::repository::LedgerRepository::commit_posting`] applies all
/// of its row writes or none.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    pub(crate) fn write(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}
