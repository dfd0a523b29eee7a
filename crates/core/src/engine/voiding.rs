//! Voiding and reversal.

use chrono::{NaiveDate, Utc};
use tally_shared::types::{TransactionId, UserId};
use tracing::{info, warn};

use super::LedgerEngine;
use crate::ledger::{LedgerError, PostingReceipt, Transaction, TransactionStatus};
use crate::repository::LedgerStore;
use crate::workflow::{ReversalInput, ReversalService, WorkflowService};

impl<S: LedgerStore + ?Sized> LedgerEngine<S> {
    /// Marks a DRAFT or POSTED transaction VOIDED.
    ///
    /// Ledger rows are never touched: a voided POSTED transaction keeps its
    /// effect on balances until a reversing transaction is posted.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`, or `InvalidStatus` for a transaction
    /// that is already VOIDED.
    pub fn void(&self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let transaction = self.transaction(id)?;
        let target = WorkflowService::void(transaction.status)?;

        let voided = self
            .store
            .transition_status(id, transaction.status, target, Utc::now())
            .map_err(|err| self.status_error(id, "void", err.into()))?;

        if transaction.status == TransactionStatus::Posted {
            warn!(
                transaction_id = %id,
                reference = %voided.reference,
                "posted transaction voided without reversal; ledger unchanged"
            );
        } else {
            info!(transaction_id = %id, reference = %voided.reference, "transaction voided");
        }
        Ok(voided)
    }

    /// Creates and posts the reversing transaction of a POSTED one: same
    /// accounts and amounts with debit and credit swapped, dated
    /// `reversal_date`.
    ///
    /// An unposted reversal draft left by an interrupted earlier call is
    /// posted instead of creating a new one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatus` unless the original is POSTED,
    /// `AlreadyReversed` if a reversal was already posted, or any error
    /// creating or posting the reversal. A reversal that fails to post is
    /// deleted again.
    pub fn reverse(
        &self,
        id: TransactionId,
        reversal_date: NaiveDate,
        created_by: UserId,
    ) -> Result<PostingReceipt, LedgerError> {
        let original = self.transaction(id)?;
        WorkflowService::reverse(original.status)?;

        let reversals = self.store.reversals_of(id)?;
        if let Some(done) = reversals.iter().find(|t| t.posted_at.is_some()) {
            return Err(LedgerError::AlreadyReversed {
                original: id,
                reversal: done.id,
            });
        }
        if let Some(pending) = reversals
            .iter()
            .find(|t| t.status == TransactionStatus::Draft)
        {
            info!(transaction_id = %id, reversal_id = %pending.id, "resuming pending reversal");
            return self.post(pending.id);
        }

        let entries = self.store.entries(id)?;
        let input = ReversalService::build(&ReversalInput {
            original: &original,
            entries: &entries,
            reversal_date,
            created_by,
            prior_attempts: reversals.len(),
        });
        let reversal = self.insert_draft(input, Some(id))?;

        match self.post(reversal.id) {
            Ok(receipt) => {
                info!(
                    transaction_id = %id,
                    reversal_id = %reversal.id,
                    reference = %reversal.reference,
                    "transaction reversed"
                );
                Ok(receipt)
            }
            Err(err) => {
                if let Err(cleanup) = self
                    .store
                    .delete_transaction(reversal.id, TransactionStatus::Draft)
                {
                    warn!(
                        reversal_id = %reversal.id,
                        error = %cleanup,
                        "failed to delete unposted reversal"
                    );
                }
                Err(err)
            }
        }
    }

    /// Reverses a POSTED transaction and then voids it, leaving the ledger
    /// as if it had never been posted while keeping its history.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Self::reverse`] or [`Self::void`]. If the
    /// void fails the reversal stays posted.
    pub fn void_with_reversal(
        &self,
        id: TransactionId,
        reversal_date: NaiveDate,
        actor: UserId,
    ) -> Result<(Transaction, PostingReceipt), LedgerError> {
        let receipt = self.reverse(id, reversal_date, actor)?;
        let voided = self.void(id)?;
        Ok((voided, receipt))
    }
}
