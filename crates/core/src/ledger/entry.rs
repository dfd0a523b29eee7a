//! Journal entry domain type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, JournalEntryId, TransactionId};

use super::types::{EntrySide, NewJournalEntry};

/// A single journal line in a transaction.
///
/// Exactly one of `debit_amount` / `credit_amount` is non-zero once the
/// transaction has passed validation; drafts may hold anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier for this entry.
    pub id: JournalEntryId,
    /// The transaction this entry belongs to.
    pub transaction_id: TransactionId,
    /// The account affected by this entry.
    pub account_id: AccountId,
    /// Line description.
    pub description: String,
    /// Debit amount.
    pub debit_amount: Decimal,
    /// Credit amount.
    pub credit_amount: Decimal,
}

impl JournalEntry {
    /// Materializes an input line for the given transaction.
    #[must_use]
    pub fn from_new(transaction_id: TransactionId, input: NewJournalEntry) -> Self {
        Self {
            id: JournalEntryId::new(),
            transaction_id,
            account_id: input.account_id,
            description: input.description,
            debit_amount: input.debit_amount,
            credit_amount: input.credit_amount,
        }
    }

    /// The side carrying the amount, or `None` unless exactly one side is positive.
    #[must_use]
    pub fn side(&self) -> Option<EntrySide> {
        match (
            self.debit_amount > Decimal::ZERO,
            self.credit_amount > Decimal::ZERO,
        ) {
            (true, false) => Some(EntrySide::Debit),
            (false, true) => Some(EntrySide::Credit),
            _ => None,
        }
    }

    /// The non-zero amount of the entry.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        match self.side() {
            Some(EntrySide::Debit) => self.debit_amount,
            Some(EntrySide::Credit) => self.credit_amount,
            None => Decimal::ZERO,
        }
    }
}
