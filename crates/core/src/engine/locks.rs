//! Per-(account, fiscal year) posting locks.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use tally_shared::types::{AccountId, FiscalYearId};

use crate::ledger::LedgerError;

type LockKey = (FiscalYearId, AccountId);

/// Lazily populated table of mutexes, one per ledger key.
///
/// Postings lock every key they touch in sorted order, so two postings
/// sharing accounts never wait on each other in opposite orders.
#[derive(Debug, Default)]
pub(crate) struct LockTable {
    slots: DashMap<LockKey, Arc<Mutex<()>>>,
}

impl LockTable {
    /// Mutexes for the given accounts of a fiscal year, in key order.
    pub(crate) fn slots(
        &self,
        fiscal_year_id: FiscalYearId,
        accounts: impl IntoIterator<Item = AccountId>,
    ) -> Vec<Arc<Mutex<()>>> {
        let keys: BTreeSet<LockKey> = accounts
            .into_iter()
            .map(|account_id| (fiscal_year_id, account_id))
            .collect();
        keys.into_iter()
            .map(|key| Arc::clone(self.slots.entry(key).or_default().value()))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Locks every slot in order.
pub(crate) fn lock_all(slots: &[Arc<Mutex<()>>]) -> Result<Vec<MutexGuard<'_, ()>>, LedgerError> {
    slots
        .iter()
        .map(|slot| {
            slot.lock()
                .map_err(|_| LedgerError::Internal("posting lock poisoned".to_string()))
        })
        .collect()
}
