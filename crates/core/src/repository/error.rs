//! Store error types.

use thiserror::Error;

/// Which uniqueness rule a write violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    /// Account type name.
    AccountTypeName,
    /// Account code.
    AccountCode,
    /// Transaction reference.
    TransactionReference,
    /// Fiscal year date range overlaps another year.
    FiscalYearRange,
    /// Any other primary key.
    Record,
}

/// Errors reported by repository implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Data read by the caller changed before the write (optimistic check failed).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A uniqueness constraint was violated.
    #[error("duplicate {kind:?}: {key}")]
    Duplicate {
        /// The violated constraint.
        kind: DuplicateKind,
        /// The offending key.
        key: String,
    },

    /// A record required by the write does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The store cannot serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for repository calls.
pub type StoreResult<T> = Result<T, StoreError>;
