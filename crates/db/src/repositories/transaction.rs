//! Transaction and journal entry storage.

use chrono::{DateTime, Utc};
use tally_core::ledger::{JournalEntry, Transaction, TransactionStatus};
use tally_core::repository::{DuplicateKind, StoreError, StoreResult, TransactionRepository};
use tally_shared::types::{FiscalYearId, TransactionId};

use crate::MemoryStore;

fn expect_status(transaction: &Transaction, expected: TransactionStatus) -> StoreResult<()> {
    if transaction.status == expected {
        Ok(())
    } else {
        Err(StoreError::Conflict(format!(
            "transaction {} is {}, expected {expected}",
            transaction.id, transaction.status
        )))
    }
}

impl TransactionRepository for MemoryStore {
    fn transaction(&self, id: TransactionId) -> StoreResult<Option<Transaction>> {
        Ok(self.read()?.transactions.get(&id).cloned())
    }

    fn reversals_of(&self, id: TransactionId) -> StoreResult<Vec<Transaction>> {
        let mut reversals: Vec<Transaction> = self
            .read()?
            .transactions
            .values()
            .filter(|t| t.reverses == Some(id))
            .cloned()
            .collect();
        reversals.sort_by_key(|t| t.created_at);
        Ok(reversals)
    }

    fn transactions(&self, fiscal_year_id: FiscalYearId) -> StoreResult<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .read()?
            .transactions
            .values()
            .filter(|t| t.fiscal_year_id == fiscal_year_id)
            .cloned()
            .collect();
        transactions.sort_by_key(|t| (t.transaction_date, t.created_at));
        Ok(transactions)
    }

    fn entries(&self, transaction_id: TransactionId) -> StoreResult<Vec<JournalEntry>> {
        Ok(self
            .read()?
            .entries
            .get(&transaction_id)
            .cloned()
            .unwrap_or_default())
    }

    fn insert_transaction(
        &self,
        transaction: &Transaction,
        entries: &[JournalEntry],
    ) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.transactions.contains_key(&transaction.id) {
            return Err(StoreError::Duplicate {
                kind: DuplicateKind::Record,
                key: transaction.id.to_string(),
            });
        }
        if state
            .transactions
            .values()
            .any(|t| t.reference == transaction.reference)
        {
            return Err(StoreError::Duplicate {
                kind: DuplicateKind::TransactionReference,
                key: transaction.reference.clone(),
            });
        }
        if !state.fiscal_years.contains_key(&transaction.fiscal_year_id) {
            return Err(StoreError::NotFound(format!(
                "fiscal year {}",
                transaction.fiscal_year_id
            )));
        }
        state.transactions.insert(transaction.id, transaction.clone());
        state.entries.insert(transaction.id, entries.to_vec());
        Ok(())
    }

    fn replace_entries(
        &self,
        id: TransactionId,
        expected: TransactionStatus,
        entries: &[JournalEntry],
    ) -> StoreResult<()> {
        let mut state = self.write()?;
        let transaction = state.transaction_mut(id)?;
        expect_status(transaction, expected)?;
        transaction.updated_at = Utc::now();
        state.entries.insert(id, entries.to_vec());
        Ok(())
    }

    fn delete_transaction(
        &self,
        id: TransactionId,
        expected: TransactionStatus,
    ) -> StoreResult<()> {
        let mut state = self.write()?;
        expect_status(state.transaction_mut(id)?, expected)?;
        state.transactions.remove(&id);
        state.entries.remove(&id);
        Ok(())
    }

    fn transition_status(
        &self,
        id: TransactionId,
        from: TransactionStatus,
        to: TransactionStatus,
        at: DateTime<Utc>,
    ) -> StoreResult<Transaction> {
        let mut state = self.write()?;
        let transaction = state.transaction_mut(id)?;
        expect_status(transaction, from)?;
        transaction.status = to;
        transaction.updated_at = at;
        match to {
            TransactionStatus::Posted => transaction.posted_at = Some(at),
            TransactionStatus::Voided => transaction.voided_at = Some(at),
            TransactionStatus::Draft => {}
        }
        Ok(transaction.clone())
    }
}
