//! Draft transaction management.

use chrono::Utc;
use tally_shared::types::{FiscalYearId, TransactionId};
use tracing::info;
use uuid::Uuid;

use super::LedgerEngine;
use crate::ledger::{
    JournalEntry, LedgerError, NewJournalEntry, NewTransaction, Transaction, TransactionStatus,
};
use crate::repository::LedgerStore;
use crate::workflow::{REFERENCE_MAX_LEN, WorkflowService};

impl<S: LedgerStore + ?Sized> LedgerEngine<S> {
    /// Looks up a transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` for an unknown id.
    pub fn transaction(&self, id: TransactionId) -> Result<Transaction, LedgerError> {
        self.store
            .transaction(id)?
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    /// Journal entries of a transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` for an unknown id.
    pub fn entries(&self, id: TransactionId) -> Result<Vec<JournalEntry>, LedgerError> {
        self.transaction(id)?;
        Ok(self.store.entries(id)?)
    }

    /// Transactions recorded in a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `FiscalYearNotFound` for an unknown year.
    pub fn transactions(
        &self,
        fiscal_year_id: FiscalYearId,
    ) -> Result<Vec<Transaction>, LedgerError> {
        self.require_fiscal_year(fiscal_year_id)?;
        Ok(self.store.transactions(fiscal_year_id)?)
    }

    /// Creates a DRAFT transaction. Entries are stored as given; they are
    /// validated when the transaction is posted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidReference`, `DuplicateReference`, `NoFiscalYear`,
    /// `DateOutsideFiscalYear` or `FiscalYearClosed`.
    pub fn create_transaction(&self, input: NewTransaction) -> Result<Transaction, LedgerError> {
        self.insert_draft(input, None)
    }

    pub(super) fn insert_draft(
        &self,
        input: NewTransaction,
        reverses: Option<TransactionId>,
    ) -> Result<Transaction, LedgerError> {
        let reference = match input.reference {
            Some(reference) => {
                let trimmed = reference.trim();
                if trimmed.is_empty() || trimmed.chars().count() > REFERENCE_MAX_LEN {
                    return Err(LedgerError::InvalidReference(reference));
                }
                trimmed.to_string()
            }
            None => Uuid::new_v4().to_string(),
        };

        let fiscal_year = match input.fiscal_year_id {
            Some(id) => {
                let fiscal_year = self.require_fiscal_year(id)?;
                if !fiscal_year.contains_date(input.transaction_date) {
                    return Err(LedgerError::DateOutsideFiscalYear {
                        date: input.transaction_date,
                        fiscal_year_id: id,
                    });
                }
                fiscal_year
            }
            None => self.fiscal_year_for(input.transaction_date)?,
        };
        if fiscal_year.is_closed {
            return Err(LedgerError::FiscalYearClosed(fiscal_year.id));
        }

        let now = Utc::now();
        let transaction = Transaction {
            id: TransactionId::new(),
            reference,
            transaction_date: input.transaction_date,
            description: input.description,
            status: TransactionStatus::Draft,
            fiscal_year_id: fiscal_year.id,
            created_by: input.created_by,
            reverses,
            created_at: now,
            updated_at: now,
            posted_at: None,
            voided_at: None,
        };
        let entries: Vec<JournalEntry> = input
            .entries
            .into_iter()
            .map(|entry| JournalEntry::from_new(transaction.id, entry))
            .collect();
        self.store.insert_transaction(&transaction, &entries)?;

        info!(
            transaction_id = %transaction.id,
            reference = %transaction.reference,
            entries = entries.len(),
            reverses = ?reverses,
            "draft transaction created"
        );
        Ok(transaction)
    }

    /// Replaces all entries of a DRAFT transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`, or `InvalidStatus` unless the
    /// transaction is a draft.
    pub fn replace_entries(
        &self,
        id: TransactionId,
        entries: Vec<NewJournalEntry>,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        let transaction = self.transaction(id)?;
        WorkflowService::edit(transaction.status)?;

        let entries: Vec<JournalEntry> = entries
            .into_iter()
            .map(|entry| JournalEntry::from_new(id, entry))
            .collect();
        self.store
            .replace_entries(id, TransactionStatus::Draft, &entries)
            .map_err(|err| self.status_error(id, "edit", err.into()))?;

        info!(transaction_id = %id, entries = entries.len(), "draft entries replaced");
        Ok(entries)
    }

    /// Deletes a DRAFT transaction and its entries.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`, or `InvalidStatus` unless the
    /// transaction is a draft.
    pub fn delete_transaction(&self, id: TransactionId) -> Result<(), LedgerError> {
        let transaction = self.transaction(id)?;
        WorkflowService::delete(transaction.status)?;

        self.store
            .delete_transaction(id, TransactionStatus::Draft)
            .map_err(|err| self.status_error(id, "delete", err.into()))?;

        info!(
            transaction_id = %id,
            reference = %transaction.reference,
            "draft transaction deleted"
        );
        Ok(())
    }

    /// Turns a lost compare-and-set into the status error the caller would
    /// have seen had it read the new status first.
    pub(super) fn status_error(
        &self,
        id: TransactionId,
        action: &'static str,
        err: LedgerError,
    ) -> LedgerError {
        if !err.is_retryable() {
            return err;
        }
        match self.store.transaction(id) {
            Ok(Some(current)) => LedgerError::InvalidStatus {
                action,
                status: current.status,
            },
            Ok(None) => LedgerError::TransactionNotFound(id),
            Err(store_err) => store_err.into(),
        }
    }
}
