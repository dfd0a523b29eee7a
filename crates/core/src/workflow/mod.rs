//! Transaction workflow management.
//!
//! # Modules
//!
//! - `service` - Lifecycle state transition checks
//! - `reversal` - Reversing entry creation

pub mod reversal;
pub mod service;

#[cfg(test)]
mod reversal_props;

pub use reversal::{REFERENCE_MAX_LEN, ReversalInput, ReversalService};
pub use service::WorkflowService;
