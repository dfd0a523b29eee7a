//! Transaction aggregate.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::types::{FiscalYearId, TransactionId, UserId};

use super::types::TransactionStatus;

/// A financial transaction; its journal lines are stored separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Unique reference.
    pub reference: String,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// Transaction description.
    pub description: String,
    /// Current status.
    pub status: TransactionStatus,
    /// Fiscal year this transaction is recorded in.
    pub fiscal_year_id: FiscalYearId,
    /// User who created the transaction.
    pub created_by: UserId,
    /// The posted transaction this one reverses, if any.
    pub reverses: Option<TransactionId>,
    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
    /// When the transaction was last updated.
    pub updated_at: DateTime<Utc>,
    /// When the transaction was posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// When the transaction was voided.
    pub voided_at: Option<DateTime<Utc>>,
}
