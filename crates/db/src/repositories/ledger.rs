//! Period balance storage and atomic posting commits.

use tally_core::ledger::{LedgerRow, PostingCommit, Transaction, TransactionStatus};
use tally_core::repository::{LedgerRepository, LedgerSnapshot, StoreError, StoreResult};
use tally_shared::types::{AccountId, FiscalYearId};
use tracing::debug;

use crate::MemoryStore;
use crate::store::State;

/// Checks every precondition of a commit without writing anything.
fn check_commit(state: &State, commit: &PostingCommit) -> StoreResult<()> {
    let transaction = state
        .transactions
        .get(&commit.transaction_id)
        .ok_or_else(|| StoreError::NotFound(format!("transaction {}", commit.transaction_id)))?;
    if transaction.status != TransactionStatus::Draft {
        return Err(StoreError::Conflict(format!(
            "transaction {} is already {}",
            transaction.id, transaction.status
        )));
    }

    let stored = state
        .entries
        .get(&commit.transaction_id)
        .map_or(&[][..], Vec::as_slice);
    if stored != commit.entries.as_slice() {
        return Err(StoreError::Conflict(format!(
            "entries of transaction {} changed since validation",
            transaction.id
        )));
    }

    for account_id in &commit.accounts {
        match state.accounts.get(account_id) {
            Some(account) if account.is_active => {}
            Some(_) => {
                return Err(StoreError::Conflict(format!(
                    "account {account_id} was deactivated"
                )));
            }
            None => return Err(StoreError::NotFound(format!("account {account_id}"))),
        }
    }

    let fiscal_year = state
        .fiscal_years
        .get(&commit.fiscal_year_id)
        .ok_or_else(|| StoreError::NotFound(format!("fiscal year {}", commit.fiscal_year_id)))?;
    if fiscal_year.is_closed {
        return Err(StoreError::Conflict(format!(
            "fiscal year {} was closed",
            fiscal_year.name
        )));
    }

    if let Some(original) = transaction.reverses {
        let reversed = state.transactions.values().any(|t| {
            t.id != transaction.id && t.reverses == Some(original) && t.posted_at.is_some()
        });
        if reversed {
            return Err(StoreError::Conflict(format!(
                "transaction {original} was already reversed"
            )));
        }
    }

    for write in &commit.rows {
        let row = &write.row;
        let key = (row.fiscal_year_id, row.account_id, row.period);
        let current = state.rows.get(&key).map(|r| r.version);
        if current != write.expected_version {
            return Err(StoreError::Conflict(format!(
                "ledger row {} {} is at version {current:?}, expected {:?}",
                row.account_id, row.period, write.expected_version
            )));
        }
    }
    Ok(())
}

impl LedgerRepository for MemoryStore {
    fn ledger_rows(
        &self,
        account_id: AccountId,
        fiscal_year_id: FiscalYearId,
    ) -> StoreResult<Vec<LedgerRow>> {
        Ok(self
            .read()?
            .rows_of(account_id, fiscal_year_id)
            .cloned()
            .collect())
    }

    fn ledger_snapshot(&self, fiscal_year_id: FiscalYearId) -> StoreResult<Option<LedgerSnapshot>> {
        let state = self.read()?;
        let Some(fiscal_year) = state.fiscal_years.get(&fiscal_year_id).cloned() else {
            return Ok(None);
        };
        Ok(Some(LedgerSnapshot {
            fiscal_year,
            account_types: state.account_types.values().cloned().collect(),
            accounts: state.accounts.values().cloned().collect(),
            rows: state
                .rows
                .iter()
                .filter(|((fy, _, _), _)| *fy == fiscal_year_id)
                .map(|(_, row)| row.clone())
                .collect(),
        }))
    }

    fn commit_posting(&self, commit: &PostingCommit) -> StoreResult<Transaction> {
        let mut state = self.write()?;
        check_commit(&state, commit)?;

        for write in &commit.rows {
            let row = &write.row;
            state
                .rows
                .insert((row.fiscal_year_id, row.account_id, row.period), row.clone());
        }

        let transaction = state.transaction_mut(commit.transaction_id)?;
        transaction.status = TransactionStatus::Posted;
        transaction.posted_at = Some(commit.posted_at);
        transaction.updated_at = commit.posted_at;

        debug!(
            transaction_id = %commit.transaction_id,
            rows = commit.rows.len(),
            "posting committed"
        );
        Ok(transaction.clone())
    }
}
