//! Financial statement generation.
//!
//! This module provides pure business logic over a ledger snapshot:
//! - Income Statement
//! - Balance Sheet
//! - Cash Flow Statement (indirect method)
//! - Statement of Changes in Equity
//! - Trial Balance

pub mod service;
pub mod types;


pub use service::StatementBuilder;
pub use types::*;
