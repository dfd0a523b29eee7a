//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Journal entries and transaction aggregates
//! - Normal-balance sign convention and period balance rows
//! - Business rule validation
//! - Posting plans with forward rollup
//! - Error types for ledger operations

pub mod balance;
pub mod entry;
pub mod error;
pub mod posting;
pub mod transaction;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use balance::{LedgerRow, NormalBalance, balance_as_of, balance_before, movement};
pub use entry::JournalEntry;
pub use error::{ErrorKind, LedgerError};
pub use posting::{LedgerRowWrite, PostingCommit, PostingReceipt, plan_posting, plan_rollup};
pub use transaction::Transaction;
pub use types::{EntrySide, NewJournalEntry, NewTransaction, TransactionStatus, TransactionTotals};
pub use validation::{
    CheckedLine, ResolvedEntry, ValidatedTransaction, Validator, check_entries,
};
