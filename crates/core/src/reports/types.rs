//! Typed financial statement schema.
//!
//! Each statement type has its own body struct; a generated statement wraps
//! one of them together with its key (type, fiscal year, period).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, FiscalYearId, StatementId, UserId};

use crate::fiscal::Period;
use crate::ledger::NormalBalance;

/// Kind of financial statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementType {
    /// Income statement (profit and loss).
    #[serde(rename = "INCOME")]
    Income,
    /// Balance sheet.
    #[serde(rename = "BALANCE")]
    Balance,
    /// Cash flow statement (indirect method).
    #[serde(rename = "CASHFLOW")]
    CashFlow,
    /// Statement of changes in equity.
    #[serde(rename = "EQUITY")]
    Equity,
}

impl StatementType {
    /// All statement types.
    pub const ALL: [Self; 4] = [Self::Income, Self::Balance, Self::CashFlow, Self::Equity];

    /// Stable code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Balance => "BALANCE",
            Self::CashFlow => "CASHFLOW",
            Self::Equity => "EQUITY",
        }
    }

    /// Human readable title.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Income => "Income Statement",
            Self::Balance => "Balance Sheet",
            Self::CashFlow => "Cash Flow Statement",
            Self::Equity => "Statement of Changes in Equity",
        }
    }
}

impl std::fmt::Display for StatementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One account line of a statement section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Amount in the section's sign convention (contra accounts negative).
    pub amount: Decimal,
}

/// A group of lines with their total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSection {
    /// Section total.
    pub total: Decimal,
    /// Lines ordered by account code.
    pub lines: Vec<StatementLine>,
}

impl StatementSection {
    /// Adds a line and updates the total.
    pub fn push(&mut self, line: StatementLine) {
        self.total += line.amount;
        self.lines.push(line);
    }
}

/// Income statement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// First day covered.
    pub period_start: NaiveDate,
    /// Last day covered.
    pub period_end: NaiveDate,
    /// Revenue movement per account.
    pub revenue: StatementSection,
    /// Expense movement per account.
    pub expenses: StatementSection,
    /// Revenue minus expenses.
    pub net_income: Decimal,
}

/// Balance sheet body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Balances are drawn up to this date.
    pub as_of: NaiveDate,
    /// Asset balances.
    pub assets: StatementSection,
    /// Liability balances.
    pub liabilities: StatementSection,
    /// Equity account balances.
    pub equity: StatementSection,
    /// Revenue minus expenses since the start of the fiscal year.
    pub current_earnings: Decimal,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Equity accounts plus current earnings.
    pub total_equity: Decimal,
    /// Liabilities plus total equity.
    pub total_liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity.
    pub is_balanced: bool,
}

/// Cash flow statement body (indirect method).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    /// First day covered.
    pub period_start: NaiveDate,
    /// Last day covered.
    pub period_end: NaiveDate,
    /// Net income of the range.
    pub net_income: Decimal,
    /// Changes in non-cash assets, negated (an increase consumes cash).
    pub non_cash_assets: StatementSection,
    /// Changes in liabilities.
    pub liabilities: StatementSection,
    /// Changes in equity accounts.
    pub equity: StatementSection,
    /// Net income plus all adjustments.
    pub net_change_in_cash: Decimal,
    /// Cash balances at the start of the range.
    pub opening_cash: Decimal,
    /// Cash balances at the end of the range, per cash account.
    pub cash_accounts: StatementSection,
    /// Total cash at the end of the range.
    pub closing_cash: Decimal,
    /// Whether the derived change equals the actual change in cash.
    pub is_reconciled: bool,
}

/// Opening, movement and closing of one equity account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityMovement {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Balance at the start of the range.
    pub opening: Decimal,
    /// Movement within the range.
    pub movement: Decimal,
    /// Balance at the end of the range.
    pub closing: Decimal,
}

/// Statement of changes in equity body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityStatement {
    /// First day covered.
    pub period_start: NaiveDate,
    /// Last day covered.
    pub period_end: NaiveDate,
    /// Per-account movements ordered by account code.
    pub accounts: Vec<EquityMovement>,
    /// Earnings of the fiscal year before the range.
    pub opening_earnings: Decimal,
    /// Equity accounts plus earnings at the start of the range.
    pub opening_equity: Decimal,
    /// Sum of equity account movements.
    pub account_movements: Decimal,
    /// Net income of the range.
    pub net_income: Decimal,
    /// Opening equity plus movements plus net income.
    pub closing_equity: Decimal,
}

/// Statement body, one variant per statement type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementBody {
    /// Income statement.
    Income(IncomeStatement),
    /// Balance sheet.
    Balance(BalanceSheet),
    /// Cash flow statement.
    CashFlow(CashFlowStatement),
    /// Statement of changes in equity.
    Equity(EquityStatement),
}

impl StatementBody {
    /// The statement type of this body.
    #[must_use]
    pub fn statement_type(&self) -> StatementType {
        match self {
            Self::Income(_) => StatementType::Income,
            Self::Balance(_) => StatementType::Balance,
            Self::CashFlow(_) => StatementType::CashFlow,
            Self::Equity(_) => StatementType::Equity,
        }
    }
}

/// A generated, immutable financial statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialStatement {
    /// Unique identifier.
    pub id: StatementId,
    /// Statement type.
    pub statement_type: StatementType,
    /// Fiscal year reported on.
    pub fiscal_year_id: FiscalYearId,
    /// Fiscal year name at generation time.
    pub fiscal_year_name: String,
    /// Period reported on; `None` for the whole fiscal year.
    pub period: Option<Period>,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Requesting user.
    pub generated_by: UserId,
    /// Typed contents.
    pub body: StatementBody,
}

impl FinancialStatement {
    /// Serializes the statement as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for FinancialStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            self.statement_type.display_name(),
            self.fiscal_year_name
        )?;
        match self.period {
            Some(period) => write!(f, " ({period})"),
            None => write!(f, " (annual)"),
        }
    }
}

/// One account of a trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// The account's normal balance.
    pub normal_balance: NormalBalance,
    /// Balance in the account's own convention.
    pub balance: Decimal,
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Fiscal year.
    pub fiscal_year_id: FiscalYearId,
    /// Balances are drawn up to this date.
    pub as_of: NaiveDate,
    /// Lines ordered by account code.
    pub lines: Vec<TrialBalanceLine>,
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}
