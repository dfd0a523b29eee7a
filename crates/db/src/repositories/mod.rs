//! Repository trait implementations for [`crate::MemoryStore`], one module
//! per storage concern.

mod account;
mod fiscal;
mod ledger;
mod statement;
mod transaction;
