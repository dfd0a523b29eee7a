//! Reversing entries for posted transactions.
//!
//! A posted transaction is never edited. Its effect is undone by a new
//! transaction with every debit turned into a credit and vice versa, which
//! then goes through the normal posting path.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::UserId;

use crate::ledger::{JournalEntry, NewJournalEntry, NewTransaction, Transaction};

/// Maximum length of a transaction reference.
pub const REFERENCE_MAX_LEN: usize = 50;

/// Input for creating a reversing transaction.
#[derive(Debug, Clone)]
pub struct ReversalInput<'a> {
    /// The posted transaction being reversed.
    pub original: &'a Transaction,
    /// Its journal entries.
    pub entries: &'a [JournalEntry],
    /// Date of the reversing transaction.
    pub reversal_date: NaiveDate,
    /// The user requesting the reversal.
    pub created_by: UserId,
    /// Earlier reversal attempts that were voided; used to keep the reference unique.
    pub prior_attempts: usize,
}

/// Stateless service for creating reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Swaps debits and credits; descriptions are prefixed with "Reversal: ".
    #[must_use]
    pub fn create_reversing_entries(entries: &[JournalEntry]) -> Vec<NewJournalEntry> {
        entries
            .iter()
            .map(|entry| NewJournalEntry {
                account_id: entry.account_id,
                description: format!("Reversal: {}", entry.description),
                debit_amount: entry.credit_amount,
                credit_amount: entry.debit_amount,
            })
            .collect()
    }

    /// Returns true if the original entries balance.
    ///
    /// Always true for posted transactions.
    #[must_use]
    pub fn validate_reversal(entries: &[JournalEntry]) -> bool {
        let total_debit: Decimal = entries.iter().map(|e| e.debit_amount).sum();
        let total_credit: Decimal = entries.iter().map(|e| e.credit_amount).sum();
        total_debit == total_credit
    }

    /// Reference of the reversing transaction: `REV-<original reference>`,
    /// with `-<n>` appended after `n` voided attempts. Falls back to the
    /// original's id when the reference would be too long.
    #[must_use]
    pub fn reversal_reference(original: &Transaction, prior_attempts: usize) -> String {
        let suffix = if prior_attempts == 0 {
            String::new()
        } else {
            format!("-{prior_attempts}")
        };
        let reference = format!("REV-{}{suffix}", original.reference);
        if reference.chars().count() <= REFERENCE_MAX_LEN {
            reference
        } else {
            format!("REV-{}{suffix}", original.id)
        }
    }

    /// Builds the reversing transaction input.
    #[must_use]
    pub fn build(input: &ReversalInput<'_>) -> NewTransaction {
        NewTransaction {
            reference: Some(Self::reversal_reference(input.original, input.prior_attempts)),
            transaction_date: input.reversal_date,
            description: format!("Reversal of {}", input.original.reference),
            fiscal_year_id: None,
            created_by: input.created_by,
            entries: Self::create_reversing_entries(input.entries),
        }
    }
}
