//! Core ledger engine for Tally.
//!
//! This crate contains the double-entry bookkeeping logic with ZERO web or
//! database dependencies. Storage is reached only through the repository
//! traits in [`repository`], which callers implement and inject.
//!
//! # Modules
//!
//! - `chart` - Account types, accounts and the account tree
//! - `fiscal` - Fiscal years and monthly periods
//! - `ledger` - Journal entries, transactions, validation and ledger rollup
//! - `workflow` - Reversing entries for posted transactions
//! - `reports` - Financial statement schema and generation
//! - `repository` - Storage interfaces consumed by the engine
//! - `engine` - The `LedgerEngine` tying everything together

pub mod chart;
pub mod engine;
pub mod fiscal;
pub mod ledger;
pub mod reports;
pub mod repository;
pub mod workflow;

pub use engine::LedgerEngine;
pub use ledger::{ErrorKind, LedgerError};
