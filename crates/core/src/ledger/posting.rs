//! Posting plans: the ledger row writes a validated transaction produces.
//!
//! Planning is pure. The engine reads the current rows, plans the writes and
//! hands them to the store in a single [`PostingCommit`]; the store rejects
//! the commit if any row, the transaction's entries or an account's active
//! flag changed in between.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tally_shared::types::{AccountId, FiscalYearId, TransactionId};
use tracing::debug;

use super::balance::{LedgerRow, balance_before};
use super::entry::JournalEntry;
use super::transaction::Transaction;
use super::types::TransactionTotals;
use super::validation::ValidatedTransaction;
use crate::fiscal::Period;

/// One ledger row to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRowWrite {
    /// The new row contents.
    pub row: LedgerRow,
    /// Version the stored row must still have; `None` if the row must not exist yet.
    pub expected_version: Option<u64>,
}

/// Everything a store must apply atomically to post a transaction.
#[derive(Debug, Clone)]
pub struct PostingCommit {
    /// The DRAFT transaction to mark POSTED.
    pub transaction_id: TransactionId,
    /// Its fiscal year, which must still be open.
    pub fiscal_year_id: FiscalYearId,
    /// Posting timestamp.
    pub posted_at: DateTime<Utc>,
    /// The entries the rows were planned from; the stored entries must
    /// still be exactly these.
    pub entries: Vec<JournalEntry>,
    /// Accounts posted to, each of which must still be active.
    pub accounts: Vec<AccountId>,
    /// Row writes across all touched accounts.
    pub rows: Vec<LedgerRowWrite>,
}

/// Outcome of a successful posting.
#[derive(Debug, Clone, Serialize)]
pub struct PostingReceipt {
    /// The transaction, now POSTED.
    pub transaction: Transaction,
    /// The period the transaction landed in.
    pub period: Period,
    /// Debit and credit totals.
    pub totals: TransactionTotals,
    /// Every ledger row written.
    pub ledger_rows: Vec<LedgerRow>,
}

/// Plans the writes that apply `delta` to one account in `period`.
///
/// The period's row gets `closing += delta` (created when missing, opening
/// at the closing of the latest earlier row or zero). Every later row of
/// the account shifts both balances by `delta` so that
/// `opening(N + 1) == closing(N)` keeps holding. A zero delta writes nothing.
#[must_use]
pub fn plan_rollup(
    existing: &[LedgerRow],
    account_id: AccountId,
    fiscal_year_id: FiscalYearId,
    period: Period,
    delta: Decimal,
) -> Vec<LedgerRowWrite> {
    if delta.is_zero() {
        return Vec::new();
    }

    let mut rows: Vec<&LedgerRow> = existing.iter().collect();
    rows.sort_by_key(|row| row.period);

    let mut writes = Vec::with_capacity(rows.len() + 1);
    match rows.iter().find(|row| row.period == period) {
        Some(current) => {
            let mut row = (*current).clone();
            row.closing_balance += delta;
            row.version += 1;
            writes.push(LedgerRowWrite {
                row,
                expected_version: Some(current.version),
            });
        }
        None => {
            let opening = balance_before(rows.iter().copied(), period);
            let mut row = LedgerRow::new(account_id, fiscal_year_id, period, opening);
            row.closing_balance += delta;
            row.version = 1;
            writes.push(LedgerRowWrite {
                row,
                expected_version: None,
            });
        }
    }

    for later in rows.iter().filter(|row| row.period > period) {
        let mut row = (*later).clone();
        row.opening_balance += delta;
        row.closing_balance += delta;
        row.version += 1;
        writes.push(LedgerRowWrite {
            row,
            expected_version: Some(later.version),
        });
    }

    debug!(
        %account_id,
        %period,
        %delta,
        rolled_forward = writes.len() - 1,
        "planned ledger rollup"
    );
    writes
}

/// Plans the full commit for a validated transaction.
///
/// `existing` holds the current rows of every account the transaction
/// touches; accounts without rows may be absent.
#[must_use]
pub fn plan_posting(
    validated: &ValidatedTransaction,
    existing: &BTreeMap<AccountId, Vec<LedgerRow>>,
    posted_at: DateTime<Utc>,
) -> PostingCommit {
    let fiscal_year_id = validated.fiscal_year.id;
    let deltas = validated.account_deltas();
    let accounts = deltas.keys().copied().collect();
    let rows = deltas
        .into_iter()
        .flat_map(|(account_id, delta)| {
            let current = existing.get(&account_id).map_or(&[][..], Vec::as_slice);
            plan_rollup(current, account_id, fiscal_year_id, validated.period, delta)
        })
        .collect();

    PostingCommit {
        transaction_id: validated.transaction.id,
        fiscal_year_id,
        posted_at,
        entries: validated.journal.clone(),
        accounts,
        rows,
    }
}
