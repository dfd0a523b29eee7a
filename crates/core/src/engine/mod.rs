//! The ledger engine.
//!
//! [`LedgerEngine`] owns no data. It receives a store implementing
//! [`LedgerStore`] and enforces the bookkeeping rules on top of it:
//! validation, posting with forward rollup, voiding and reversal, and
//! statement generation.
//!
//! Postings touching the same (account, fiscal year) are serialized by an
//! in-process lock table; the store's optimistic row versions catch writers
//! outside this process, and such conflicts are retried up to the
//! configured bound.

mod chart;
mod drafts;
mod fiscal;
mod locks;
mod posting;
mod statements;
mod voiding;

use std::sync::{Arc, Mutex};

use tally_shared::{AppConfig, PostingConfig};

use crate::repository::LedgerStore;
use locks::LockTable;

/// Double-entry ledger engine over an injected store.
pub struct LedgerEngine<S: LedgerStore + ?Sized> {
    store: Arc<S>,
    locks: LockTable,
    /// Serializes chart structure changes so cycle checks see a stable tree.
    chart_lock: Mutex<()>,
    posting: PostingConfig,
}

impl<S: LedgerStore + ?Sized> LedgerEngine<S> {
    /// Creates an engine with default configuration.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_posting_config(store, PostingConfig::default())
    }

    /// Creates an engine using the posting section of `config`.
    #[must_use]
    pub fn with_config(store: Arc<S>, config: &AppConfig) -> Self {
        Self::with_posting_config(store, config.posting.clone())
    }

    /// Creates an engine with explicit posting settings.
    #[must_use]
    pub fn with_posting_config(store: Arc<S>, posting: PostingConfig) -> Self {
        Self {
            store,
            locks: LockTable::default(),
            chart_lock: Mutex::new(()),
            posting,
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Posting settings in effect.
    #[must_use]
    pub fn posting_config(&self) -> &PostingConfig {
        &self.posting
    }
}
