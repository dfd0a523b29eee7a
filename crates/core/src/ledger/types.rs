//! Ledger domain types for transaction creation and validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, FiscalYearId, UserId};

/// Which column of the journal an entry sits in.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/revenue accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/revenue accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

/// Transaction lifecycle status.
///
/// DRAFT -> POSTED -> VOIDED, or DRAFT -> VOIDED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    /// Transaction is being drafted and can be modified.
    Draft,
    /// Transaction has been posted to the ledger (immutable).
    Posted,
    /// Transaction has been voided (immutable, terminal).
    Voided,
}

impl TransactionStatus {
    /// Returns true if the transaction can be modified.
    #[must_use]
    pub fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the transaction can be posted.
    #[must_use]
    pub fn can_post(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the transaction can be voided.
    #[must_use]
    pub fn can_void(self) -> bool {
        matches!(self, Self::Draft | Self::Posted)
    }

    /// Returns true if the transaction can be reversed.
    #[must_use]
    pub fn can_reverse(self) -> bool {
        matches!(self, Self::Posted)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "DRAFT"),
            Self::Posted => write!(f, "POSTED"),
            Self::Voided => write!(f, "VOIDED"),
        }
    }
}

/// Input for a single journal entry in a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalEntry {
    /// The account to post to.
    pub account_id: AccountId,
    /// Line description.
    pub description: String,
    /// Debit amount (zero if credit).
    pub debit_amount: Decimal,
    /// Credit amount (zero if debit).
    pub credit_amount: Decimal,
}

impl NewJournalEntry {
    /// A debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            description: String::new(),
            debit_amount: amount,
            credit_amount: Decimal::ZERO,
        }
    }

    /// A credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            description: String::new(),
            debit_amount: Decimal::ZERO,
            credit_amount: amount,
        }
    }

    /// Sets the line description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Input for creating a new DRAFT transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Unique reference; a fresh UUID string is used when absent.
    pub reference: Option<String>,
    /// The date of the transaction.
    pub transaction_date: NaiveDate,
    /// A description of the transaction.
    pub description: String,
    /// Fiscal year; resolved from the date when absent.
    pub fiscal_year_id: Option<FiscalYearId>,
    /// The user creating the transaction.
    pub created_by: UserId,
    /// The journal entries (drafts may be incomplete or unbalanced).
    pub entries: Vec<NewJournalEntry>,
}

impl NewTransaction {
    /// Creates an input with a generated reference and resolved fiscal year.
    #[must_use]
    pub fn new(
        transaction_date: NaiveDate,
        description: impl Into<String>,
        created_by: UserId,
        entries: Vec<NewJournalEntry>,
    ) -> Self {
        Self {
            reference: None,
            transaction_date,
            description: description.into(),
            fiscal_year_id: None,
            created_by,
            entries,
        }
    }

    /// Sets an explicit reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// Transaction totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
    /// Whether the transaction is balanced (debits == credits).
    pub is_balanced: bool,
}

impl TransactionTotals {
    /// Creates new transaction totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }
}
