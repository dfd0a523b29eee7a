//! Workflow service for transaction state transitions.
//!
//! The valid transitions are:
//! - Draft -> Posted (post)
//! - Draft -> Voided (void)
//! - Posted -> Voided (void)
//!
//! Entries may only be edited, and transactions deleted, while in Draft.
//! Only Posted transactions can be reversed.

use crate::ledger::{LedgerError, TransactionStatus};

/// Stateless service validating lifecycle transitions.
pub struct WorkflowService;

impl WorkflowService {
    /// Validates posting and returns the target status.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatus` unless the transaction is a draft.
    pub fn post(current: TransactionStatus) -> Result<TransactionStatus, LedgerError> {
        Self::require(current.can_post(), "post", current)?;
        Ok(TransactionStatus::Posted)
    }

    /// Validates voiding and returns the target status.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatus` if the transaction is already voided.
    pub fn void(current: TransactionStatus) -> Result<TransactionStatus, LedgerError> {
        Self::require(current.can_void(), "void", current)?;
        Ok(TransactionStatus::Voided)
    }

    /// Validates that a transaction can be reversed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatus` unless the transaction is posted.
    pub fn reverse(current: TransactionStatus) -> Result<(), LedgerError> {
        Self::require(current.can_reverse(), "reverse", current)
    }

    /// Validates that entries can be replaced.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatus` unless the transaction is a draft.
    pub fn edit(current: TransactionStatus) -> Result<(), LedgerError> {
        Self::require(current.is_editable(), "edit", current)
    }

    /// Validates that the transaction can be deleted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatus` unless the transaction is a draft.
    pub fn delete(current: TransactionStatus) -> Result<(), LedgerError> {
        Self::require(current.is_editable(), "delete", current)
    }

    fn require(
        allowed: bool,
        action: &'static str,
        status: TransactionStatus,
    ) -> Result<(), LedgerError> {
        if allowed {
            Ok(())
        } else {
            Err(LedgerError::InvalidStatus { action, status })
        }
    }
}
