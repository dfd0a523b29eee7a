//! Account types and accounts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, AccountTypeId};

use crate::ledger::NormalBalance;

/// Maximum length of an account code.
pub const ACCOUNT_CODE_MAX_LEN: usize = 10;
/// Maximum length of an account name.
pub const ACCOUNT_NAME_MAX_LEN: usize = 100;
/// Maximum length of an account type name.
pub const ACCOUNT_TYPE_NAME_MAX_LEN: usize = 50;

/// Statement classification of an account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountCategory {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Owners' residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountCategory {
    /// The side on which accounts of this category naturally increase.
    #[must_use]
    pub const fn natural_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns true for categories reported on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }
}

/// Account type: determines the sign convention of its accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountType {
    /// Unique identifier.
    pub id: AccountTypeId,
    /// Unique name (e.g., "Current Asset").
    pub name: String,
    /// Side on which balances increase.
    pub normal_balance: NormalBalance,
    /// Statement classification.
    pub category: AccountCategory,
    /// Free-form description.
    pub description: String,
}

impl AccountType {
    /// Returns true if the normal balance is opposite to the category's
    /// natural side (e.g., accumulated depreciation under assets).
    #[must_use]
    pub fn is_contra(&self) -> bool {
        self.normal_balance != self.category.natural_balance()
    }

    /// Converts a balance in this type's convention into the amount shown in
    /// its statement section (contra balances are subtracted).
    #[must_use]
    pub fn section_amount(&self, balance: Decimal) -> Decimal {
        self.normal_balance
            .convert(balance, self.category.natural_balance())
    }
}

/// Input for creating an account type.
#[derive(Debug, Clone)]
pub struct NewAccountType {
    /// Unique name.
    pub name: String,
    /// Side on which balances increase.
    pub normal_balance: NormalBalance,
    /// Statement classification.
    pub category: AccountCategory,
    /// Free-form description.
    pub description: String,
}

/// A chart of accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Unique account code (e.g., "1000").
    pub code: String,
    /// Display name.
    pub name: String,
    /// The account type.
    pub account_type_id: AccountTypeId,
    /// Parent account for roll-up, if any.
    pub parent_id: Option<AccountId>,
    /// Free-form description.
    pub description: String,
    /// Inactive accounts reject new postings.
    pub is_active: bool,
    /// Cash and cash equivalents (drives the cash flow statement).
    pub is_cash: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Unique account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// The account type.
    pub account_type_id: AccountTypeId,
    /// Parent account, if any.
    pub parent_id: Option<AccountId>,
    /// Free-form description.
    pub description: String,
    /// Cash and cash equivalents.
    pub is_cash: bool,
}

impl NewAccount {
    /// Creates an input with no parent, description or cash flag.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        account_type_id: AccountTypeId,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            account_type_id,
            parent_id: None,
            description: String::new(),
            is_cash: false,
        }
    }

    /// Sets the parent account.
    #[must_use]
    pub fn with_parent(mut self, parent_id: AccountId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Marks the account as cash.
    #[must_use]
    pub fn cash(mut self) -> Self {
        self.is_cash = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn account_type(normal_balance: NormalBalance, category: AccountCategory) -> AccountType {
        AccountType {
            id: AccountTypeId::new(),
            name: "Test".to_string(),
            normal_balance,
            category,
            description: String::new(),
        }
    }

    #[rstest]
    #[case(AccountCategory::Asset, NormalBalance::Debit)]
    #[case(AccountCategory::Expense, NormalBalance::Debit)]
    #[case(AccountCategory::Liability, NormalBalance::Credit)]
    #[case(AccountCategory::Equity, NormalBalance::Credit)]
    #[case(AccountCategory::Revenue, NormalBalance::Credit)]
    fn test_natural_balance(#[case] category: AccountCategory, #[case] expected: NormalBalance) {
        assert_eq!(category.natural_balance(), expected);
        assert!(!account_type(expected, category).is_contra());
    }

    #[test]
    fn test_contra_type_is_subtracted_in_section() {
        let accumulated_depreciation = account_type(NormalBalance::Credit, AccountCategory::Asset);
        assert!(accumulated_depreciation.is_contra());
        assert_eq!(accumulated_depreciation.section_amount(dec!(300)), dec!(-300));

        let cash = account_type(NormalBalance::Debit, AccountCategory::Asset);
        assert_eq!(cash.section_amount(dec!(300)), dec!(300));
    }

    #[test]
    fn test_balance_sheet_categories() {
        assert!(AccountCategory::Asset.is_balance_sheet());
        assert!(AccountCategory::Equity.is_balance_sheet());
        assert!(!AccountCategory::Revenue.is_balance_sheet());
        assert!(!AccountCategory::Expense.is_balance_sheet());
    }
}
