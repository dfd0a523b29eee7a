//! Ledger error types.
//!
//! Every error belongs to one [`ErrorKind`]. Validation and integrity errors
//! are surfaced to callers unmodified; concurrency conflicts are retried by
//! the engine before they surface.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::{
    AccountId, AccountTypeId, AmountError, FiscalYearId, StatementId, TransactionId,
};
use thiserror::Error;

use super::types::TransactionStatus;
use crate::fiscal::Period;
use crate::repository::{DuplicateKind, StoreError};

/// Broad classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input violates a business rule.
    Validation,
    /// Operation would break a uniqueness or structural invariant.
    Integrity,
    /// Competing writers touched the same data (retryable).
    Concurrency,
    /// A referenced record does not exist.
    NotFound,
    /// The store failed.
    Storage,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transaction must have at least 2 entries.
    #[error("Transaction must have at least 2 entries, got {count}")]
    InsufficientEntries {
        /// Number of entries present.
        count: usize,
    },

    /// Entry must carry exactly one positive amount.
    #[error("Entry {line} must have exactly one of debit or credit greater than zero")]
    InvalidEntryAmount {
        /// 1-based line number.
        line: usize,
    },

    /// Entry amount cannot be negative.
    #[error("Entry {line} has a negative amount")]
    NegativeAmount {
        /// 1-based line number.
        line: usize,
    },

    /// Entry amount does not fit the money column.
    #[error("Entry {line} has an invalid amount: {source}")]
    InvalidAmountPrecision {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the amount.
        source: AmountError,
    },

    /// Transaction is not balanced (debits != credits).
    #[error("Transaction is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedTransaction {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Transaction date lies outside its fiscal year.
    #[error("Date {date} is outside fiscal year {fiscal_year_id}")]
    DateOutsideFiscalYear {
        /// The transaction date.
        date: NaiveDate,
        /// The fiscal year.
        fiscal_year_id: FiscalYearId,
    },

    /// No fiscal year covers the date.
    #[error("No fiscal year found for date {0}")]
    NoFiscalYear(NaiveDate),

    /// Fiscal year is closed, no posting allowed.
    #[error("Fiscal year {0} is closed")]
    FiscalYearClosed(FiscalYearId),

    /// Start date after end date.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Range start.
        start: NaiveDate,
        /// Range end.
        end: NaiveDate,
    },

    /// Requested period is not part of the fiscal year.
    #[error("Period {period} is outside fiscal year {fiscal_year_id}")]
    PeriodOutsideFiscalYear {
        /// The requested period.
        period: Period,
        /// The fiscal year.
        fiscal_year_id: FiscalYearId,
    },

    /// Operation not allowed in the transaction's current status.
    #[error("Cannot {action} a {status} transaction")]
    InvalidStatus {
        /// The attempted operation.
        action: &'static str,
        /// The current status.
        status: TransactionStatus,
    },

    /// Account code is empty or too long.
    #[error("Invalid account code '{0}'")]
    InvalidAccountCode(String),

    /// Name is empty or too long.
    #[error("Invalid name '{0}'")]
    InvalidName(String),

    /// Reference is empty or too long.
    #[error("Invalid reference '{0}'")]
    InvalidReference(String),

    // ========== Integrity Errors ==========
    /// Transaction reference already used.
    #[error("Duplicate transaction reference: {0}")]
    DuplicateReference(String),

    /// Account code already used.
    #[error("Duplicate account code: {0}")]
    DuplicateAccountCode(String),

    /// Account type name already used.
    #[error("Duplicate account type name: {0}")]
    DuplicateAccountTypeName(String),

    /// A record with the same key already exists.
    #[error("Duplicate record: {0}")]
    DuplicateRecord(String),

    /// The new parent would make the account tree cyclic.
    #[error("Account {account_id} cannot have {parent_id} as parent: cycle in account tree")]
    CyclicAccountParent {
        /// The account being moved.
        account_id: AccountId,
        /// The rejected parent.
        parent_id: AccountId,
    },

    /// Fiscal year range overlaps an existing year.
    #[error("Fiscal year overlaps existing fiscal year {0}")]
    OverlappingFiscalYear(String),

    /// The transaction already has a posted reversal.
    #[error("Transaction {original} is already reversed by {reversal}")]
    AlreadyReversed {
        /// The reversed transaction.
        original: TransactionId,
        /// The posted reversal.
        reversal: TransactionId,
    },

    // ========== Concurrency Errors ==========
    /// Concurrent modification detected.
    #[error("Concurrent modification detected after {attempts} attempt(s)")]
    ConcurrentModification {
        /// Attempts made before giving up.
        attempts: u32,
    },

    // ========== Not Found Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account type not found.
    #[error("Account type not found: {0}")]
    AccountTypeNotFound(AccountTypeId),

    /// Fiscal year not found.
    #[error("Fiscal year not found: {0}")]
    FiscalYearNotFound(FiscalYearId),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Statement not found.
    #[error("Statement not found: {0}")]
    StatementNotFound(StatementId),

    // ========== Storage Errors ==========
    /// Store error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientEntries { .. }
            | Self::InvalidEntryAmount { .. }
            | Self::NegativeAmount { .. }
            | Self::InvalidAmountPrecision { .. }
            | Self::UnbalancedTransaction { .. }
            | Self::AccountInactive(_)
            | Self::DateOutsideFiscalYear { .. }
            | Self::NoFiscalYear(_)
            | Self::FiscalYearClosed(_)
            | Self::InvalidDateRange { .. }
            | Self::PeriodOutsideFiscalYear { .. }
            | Self::InvalidStatus { .. }
            | Self::InvalidAccountCode(_)
            | Self::InvalidName(_)
            | Self::InvalidReference(_) => ErrorKind::Validation,

            Self::DuplicateReference(_)
            | Self::DuplicateAccountCode(_)
            | Self::DuplicateAccountTypeName(_)
            | Self::DuplicateRecord(_)
            | Self::CyclicAccountParent { .. }
            | Self::OverlappingFiscalYear(_)
            | Self::AlreadyReversed { .. } => ErrorKind::Integrity,

            Self::ConcurrentModification { .. } => ErrorKind::Concurrency,

            Self::AccountNotFound(_)
            | Self::AccountTypeNotFound(_)
            | Self::FiscalYearNotFound(_)
            | Self::TransactionNotFound(_)
            | Self::StatementNotFound(_) => ErrorKind::NotFound,

            Self::Storage(_) | Self::Internal(_) => ErrorKind::Storage,
        }
    }

    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientEntries { .. } => "INSUFFICIENT_ENTRIES",
            Self::InvalidEntryAmount { .. } => "INVALID_ENTRY_AMOUNT",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::InvalidAmountPrecision { .. } => "INVALID_AMOUNT_PRECISION",
            Self::UnbalancedTransaction { .. } => "UNBALANCED_TRANSACTION",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::DateOutsideFiscalYear { .. } => "DATE_OUTSIDE_FISCAL_YEAR",
            Self::NoFiscalYear(_) => "NO_FISCAL_YEAR",
            Self::FiscalYearClosed(_) => "FISCAL_YEAR_CLOSED",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::PeriodOutsideFiscalYear { .. } => "PERIOD_OUTSIDE_FISCAL_YEAR",
            Self::InvalidStatus { .. } => "INVALID_STATUS",
            Self::InvalidAccountCode(_) => "INVALID_ACCOUNT_CODE",
            Self::InvalidName(_) => "INVALID_NAME",
            Self::InvalidReference(_) => "INVALID_REFERENCE",
            Self::DuplicateReference(_) => "DUPLICATE_REFERENCE",
            Self::DuplicateAccountCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::DuplicateAccountTypeName(_) => "DUPLICATE_ACCOUNT_TYPE_NAME",
            Self::DuplicateRecord(_) => "DUPLICATE_RECORD",
            Self::CyclicAccountParent { .. } => "CYCLIC_ACCOUNT_PARENT",
            Self::OverlappingFiscalYear(_) => "OVERLAPPING_FISCAL_YEAR",
            Self::AlreadyReversed { .. } => "ALREADY_REVERSED",
            Self::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountTypeNotFound(_) => "ACCOUNT_TYPE_NOT_FOUND",
            Self::FiscalYearNotFound(_) => "FISCAL_YEAR_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::StatementNotFound(_) => "STATEMENT_NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Concurrency
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => Self::ConcurrentModification { attempts: 1 },
            StoreError::Duplicate { kind, key } => match kind {
                DuplicateKind::AccountTypeName => Self::DuplicateAccountTypeName(key),
                DuplicateKind::AccountCode => Self::DuplicateAccountCode(key),
                DuplicateKind::TransactionReference => Self::DuplicateReference(key),
                DuplicateKind::FiscalYearRange => Self::OverlappingFiscalYear(key),
                DuplicateKind::Record => Self::DuplicateRecord(key),
            },
            StoreError::NotFound(what) => Self::Storage(format!("missing record: {what}")),
            StoreError::Unavailable(msg) => Self::Storage(msg),
        }
    }
}
