//! Posting with forward rollup and bounded conflict retry.

use std::collections::BTreeMap;
use std::thread;

use chrono::Utc;
use rayon::prelude::*;
use tally_shared::types::TransactionId;
use tracing::{info, warn};

use super::LedgerEngine;
use super::locks::lock_all;
use crate::ledger::{LedgerError, PostingReceipt, Transaction, Validator, plan_posting};
use crate::repository::LedgerStore;
use crate::workflow::WorkflowService;

impl<S: LedgerStore + ?Sized> LedgerEngine<S> {
    /// Validates a DRAFT transaction and posts it: every touched ledger row
    /// and every later row of the same accounts are updated, and the
    /// transaction becomes POSTED, all in one store commit.
    ///
    /// A transaction that fails validation stays DRAFT with no ledger
    /// change. Concurrency conflicts are retried up to the configured bound.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `AlreadyReversed` for a second reversal of
    /// the same original, or `ConcurrentModification` once retries are spent.
    pub fn post(&self, id: TransactionId) -> Result<PostingReceipt, LedgerError> {
        let max_attempts = self.posting.max_attempts();
        let mut attempt = 1;
        loop {
            match self.try_post(id) {
                Ok(receipt) => {
                    info!(
                        transaction_id = %id,
                        reference = %receipt.transaction.reference,
                        period = %receipt.period,
                        amount = %receipt.totals.debit,
                        rows = receipt.ledger_rows.len(),
                        attempt,
                        "transaction posted"
                    );
                    return Ok(receipt);
                }
                Err(err) if err.is_retryable() => {
                    if attempt >= max_attempts {
                        warn!(
                            transaction_id = %id,
                            attempts = attempt,
                            "posting retries exhausted"
                        );
                        return Err(LedgerError::ConcurrentModification { attempts: attempt });
                    }
                    warn!(
                        transaction_id = %id,
                        attempt,
                        error = %err,
                        "posting conflict, retrying"
                    );
                    thread::sleep(self.posting.backoff_for(attempt));
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Posts several transactions in parallel. Results are in input order;
    /// postings sharing accounts are serialized by the lock table.
    pub fn post_batch(&self, ids: &[TransactionId]) -> Vec<Result<PostingReceipt, LedgerError>> {
        ids.par_iter().map(|id| self.post(*id)).collect()
    }

    fn try_post(&self, id: TransactionId) -> Result<PostingReceipt, LedgerError> {
        let transaction = self.transaction(id)?;
        WorkflowService::post(transaction.status)?;
        let entries = self.store.entries(id)?;

        if let Some(original) = transaction.reverses {
            self.check_not_reversed(original, id)?;
        }

        let validated = Validator::new(&*self.store).validate(&transaction, &entries)?;
        let deltas = validated.account_deltas();

        let slots = self
            .locks
            .slots(validated.fiscal_year.id, deltas.keys().copied());
        let _guards = lock_all(&slots)?;

        let mut existing = BTreeMap::new();
        for account_id in deltas.keys() {
            existing.insert(
                *account_id,
                self.store.ledger_rows(*account_id, validated.fiscal_year.id)?,
            );
        }
        let commit = plan_posting(&validated, &existing, Utc::now());
        let posted = self.store.commit_posting(&commit)?;

        Ok(PostingReceipt {
            transaction: posted,
            period: validated.period,
            totals: validated.totals,
            ledger_rows: commit.rows.into_iter().map(|write| write.row).collect(),
        })
    }

    /// Fails if a transaction other than `candidate` already reversed
    /// `original` in the ledger. A reversal that was posted and later voided
    /// still counts, since voiding leaves its ledger rows in place.
    pub(super) fn check_not_reversed(
        &self,
        original: TransactionId,
        candidate: TransactionId,
    ) -> Result<(), LedgerError> {
        let posted: Option<Transaction> = self
            .store
            .reversals_of(original)?
            .into_iter()
            .find(|t| t.id != candidate && t.posted_at.is_some());
        match posted {
            Some(reversal) => Err(LedgerError::AlreadyReversed {
                original,
                reversal: reversal.id,
            }),
            None => Ok(()),
        }
    }
}
