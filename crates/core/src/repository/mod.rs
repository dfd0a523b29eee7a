//! Repository interfaces consumed by the ledger engine.
//!
//! The engine never owns a database handle; a store implementing
//! [`LedgerStore`] is injected into [`crate::LedgerEngine`]. Implementations
//! must make every single call atomic. [`LedgerRepository::commit_posting`]
//! is the only multi-record write the engine relies on for all-or-nothing
//! posting.

pub mod error;

use chrono::{DateTime, Utc};
use tally_shared::types::{AccountId, AccountTypeId, FiscalYearId, StatementId, TransactionId};

use crate::chart::{Account, AccountType};
use crate::fiscal::FiscalYear;
use crate::ledger::{JournalEntry, LedgerRow, PostingCommit, Transaction, TransactionStatus};
use crate::reports::FinancialStatement;

pub use error::{DuplicateKind, StoreError, StoreResult};

/// Chart of accounts storage.
pub trait AccountRepository: Send + Sync {
    /// Looks up an account type.
    fn account_type(&self, id: AccountTypeId) -> StoreResult<Option<AccountType>>;

    /// All account types.
    fn account_types(&self) -> StoreResult<Vec<AccountType>>;

    /// Inserts an account type; the name must be unique.
    fn insert_account_type(&self, account_type: &AccountType) -> StoreResult<()>;

    /// Looks up an account.
    fn account(&self, id: AccountId) -> StoreResult<Option<Account>>;

    /// All accounts.
    fn accounts(&self) -> StoreResult<Vec<Account>>;

    /// Inserts an account; the code must be unique.
    fn insert_account(&self, account: &Account) -> StoreResult<()>;

    /// Replaces an existing account.
    fn update_account(&self, account: &Account) -> StoreResult<()>;
}

/// Fiscal calendar storage.
pub trait FiscalYearRepository: Send + Sync {
    /// Looks up a fiscal year.
    fn fiscal_year(&self, id: FiscalYearId) -> StoreResult<Option<FiscalYear>>;

    /// All fiscal years ordered by start date.
    fn fiscal_years(&self) -> StoreResult<Vec<FiscalYear>>;

    /// Inserts a fiscal year; fails with [`DuplicateKind::FiscalYearRange`]
    /// if its range overlaps an existing year.
    fn insert_fiscal_year(&self, fiscal_year: &FiscalYear) -> StoreResult<()>;

    /// Marks a fiscal year closed. Returns false if it was already closed.
    fn close_fiscal_year(&self, id: FiscalYearId) -> StoreResult<bool>;
}

/// Transaction and journal entry storage.
pub trait TransactionRepository: Send + Sync {
    /// Looks up a transaction.
    fn transaction(&self, id: TransactionId) -> StoreResult<Option<Transaction>>;

    /// Transactions whose `reverses` points at `id`.
    fn reversals_of(&self, id: TransactionId) -> StoreResult<Vec<Transaction>>;

    /// Transactions of a fiscal year ordered by date.
    fn transactions(&self, fiscal_year_id: FiscalYearId) -> StoreResult<Vec<Transaction>>;

    /// Journal entries of a transaction in line order.
    fn entries(&self, transaction_id: TransactionId) -> StoreResult<Vec<JournalEntry>>;

    /// Inserts a transaction with its entries; the reference must be unique.
    fn insert_transaction(&self, transaction: &Transaction, entries: &[JournalEntry])
        -> StoreResult<()>;

    /// Replaces the entries of a transaction still in `expected` status.
    fn replace_entries(
        &self,
        id: TransactionId,
        expected: TransactionStatus,
        entries: &[JournalEntry],
    ) -> StoreResult<()>;

    /// Deletes a transaction still in `expected` status, with its entries.
    fn delete_transaction(&self, id: TransactionId, expected: TransactionStatus)
        -> StoreResult<()>;

    /// Compare-and-set status change; fails with a conflict if the current
    /// status is not `from`. Returns the updated transaction.
    fn transition_status(
        &self,
        id: TransactionId,
        from: TransactionStatus,
        to: TransactionStatus,
        at: DateTime<Utc>,
    ) -> StoreResult<Transaction>;
}

/// Period balance storage.
pub trait LedgerRepository: Send + Sync {
    /// Ledger rows of one account in one fiscal year ordered by period.
    fn ledger_rows(
        &self,
        account_id: AccountId,
        fiscal_year_id: FiscalYearId,
    ) -> StoreResult<Vec<LedgerRow>>;

    /// A consistent read of everything statements are built from, or `None`
    /// if the fiscal year does not exist.
    fn ledger_snapshot(&self, fiscal_year_id: FiscalYearId) -> StoreResult<Option<LedgerSnapshot>>;

    /// Atomically applies a posting: writes every ledger row and sets the
    /// transaction to POSTED.
    ///
    /// Fails with [`StoreError::Conflict`] without writing anything if the
    /// transaction is no longer DRAFT, its stored entries differ from
    /// `commit.entries`, any account in `commit.accounts` is missing or
    /// inactive, the fiscal year was closed, any row version differs from
    /// the expected one, or another transaction that reverses the same
    /// original was already posted.
    fn commit_posting(&self, commit: &PostingCommit) -> StoreResult<Transaction>;
}

/// Generated statement storage.
pub trait StatementRepository: Send + Sync {
    /// Stores a generated statement.
    fn insert_statement(&self, statement: &FinancialStatement) -> StoreResult<()>;

    /// Looks up a statement.
    fn statement(&self, id: StatementId) -> StoreResult<Option<FinancialStatement>>;

    /// Statements generated for a fiscal year, oldest first.
    fn statements(&self, fiscal_year_id: FiscalYearId) -> StoreResult<Vec<FinancialStatement>>;
}

/// Everything the engine needs from storage.
pub trait LedgerStore:
    AccountRepository
    + FiscalYearRepository
    + TransactionRepository
    + LedgerRepository
    + StatementRepository
{
}

impl<T> LedgerStore for T where
    T: AccountRepository
        + FiscalYearRepository
        + TransactionRepository
        + LedgerRepository
        + StatementRepository
{
}

/// Point-in-time view of a fiscal year's ledger and the chart it refers to.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    /// The fiscal year.
    pub fiscal_year: FiscalYear,
    /// All account types.
    pub account_types: Vec<AccountType>,
    /// All accounts.
    pub accounts: Vec<Account>,
    /// Every ledger row of the fiscal year.
    pub rows: Vec<LedgerRow>,
}
