//! Chart of accounts operations.

use std::collections::HashMap;
use std::sync::MutexGuard;

use chrono::Utc;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, AccountTypeId, FiscalYearId};
use tracing::info;

use super::LedgerEngine;
use crate::chart::{
    ACCOUNT_CODE_MAX_LEN, ACCOUNT_NAME_MAX_LEN, ACCOUNT_TYPE_NAME_MAX_LEN, Account, AccountType,
    ChartTree, NewAccount, NewAccountType,
};
use crate::fiscal::Period;
use crate::ledger::{LedgerError, balance_as_of};
use crate::repository::LedgerStore;

fn check_name(name: &str, max_len: usize) -> Result<String, LedgerError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > max_len {
        return Err(LedgerError::InvalidName(name.to_string()));
    }
    Ok(trimmed.to_string())
}

impl<S: LedgerStore + ?Sized> LedgerEngine<S> {
    fn lock_chart(&self) -> Result<MutexGuard<'_, ()>, LedgerError> {
        self.chart_lock
            .lock()
            .map_err(|_| LedgerError::Internal("chart lock poisoned".to_string()))
    }

    pub(super) fn require_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.store
            .account(id)?
            .ok_or(LedgerError::AccountNotFound(id))
    }

    fn require_account_type(&self, id: AccountTypeId) -> Result<AccountType, LedgerError> {
        self.store
            .account_type(id)?
            .ok_or(LedgerError::AccountTypeNotFound(id))
    }

    /// Creates an account type.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` for an empty or overlong name and
    /// `DuplicateAccountTypeName` if the name is taken.
    pub fn create_account_type(&self, input: NewAccountType) -> Result<AccountType, LedgerError> {
        let account_type = AccountType {
            id: AccountTypeId::new(),
            name: check_name(&input.name, ACCOUNT_TYPE_NAME_MAX_LEN)?,
            normal_balance: input.normal_balance,
            category: input.category,
            description: input.description,
        };
        self.store.insert_account_type(&account_type)?;

        info!(
            account_type_id = %account_type.id,
            name = %account_type.name,
            normal_balance = %account_type.normal_balance,
            "account type created"
        );
        Ok(account_type)
    }

    /// Creates an active account.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad code or name, a not-found error
    /// for an unknown type or parent, and `DuplicateAccountCode` if the code
    /// is taken.
    pub fn create_account(&self, input: NewAccount) -> Result<Account, LedgerError> {
        let code = input.code.trim();
        if code.is_empty() || code.chars().count() > ACCOUNT_CODE_MAX_LEN {
            return Err(LedgerError::InvalidAccountCode(input.code));
        }
        let name = check_name(&input.name, ACCOUNT_NAME_MAX_LEN)?;
        self.require_account_type(input.account_type_id)?;

        let _chart = self.lock_chart()?;
        if let Some(parent_id) = input.parent_id {
            self.require_account(parent_id)?;
        }

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            code: code.to_string(),
            name,
            account_type_id: input.account_type_id,
            parent_id: input.parent_id,
            description: input.description,
            is_active: true,
            is_cash: input.is_cash,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_account(&account)?;

        info!(account_id = %account.id, code = %account.code, "account created");
        Ok(account)
    }

    /// Re-parents an account, rejecting moves that would make the tree cyclic.
    ///
    /// # Errors
    ///
    /// Returns `CyclicAccountParent` if `new_parent` is the account itself or
    /// one of its descendants, or a not-found error.
    pub fn move_account(
        &self,
        account_id: AccountId,
        new_parent: Option<AccountId>,
    ) -> Result<Account, LedgerError> {
        let _chart = self.lock_chart()?;
        let mut account = self.require_account(account_id)?;

        if let Some(parent_id) = new_parent {
            self.require_account(parent_id)?;
            let tree = ChartTree::from_accounts(&self.store.accounts()?);
            if tree.would_create_cycle(account_id, parent_id) {
                return Err(LedgerError::CyclicAccountParent {
                    account_id,
                    parent_id,
                });
            }
        }

        account.parent_id = new_parent;
        account.updated_at = Utc::now();
        self.store.update_account(&account)?;

        info!(%account_id, parent_id = ?new_parent, "account moved");
        Ok(account)
    }

    /// Activates or deactivates an account. Inactive accounts reject postings.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown account.
    pub fn set_account_active(
        &self,
        account_id: AccountId,
        is_active: bool,
    ) -> Result<Account, LedgerError> {
        let _chart = self.lock_chart()?;
        let mut account = self.require_account(account_id)?;
        if account.is_active != is_active {
            account.is_active = is_active;
            account.updated_at = Utc::now();
            self.store.update_account(&account)?;
            info!(%account_id, is_active, "account activation changed");
        }
        Ok(account)
    }

    /// Balance of one account at the end of `period` (or of the fiscal
    /// year), in the account's normal-balance convention.
    ///
    /// # Errors
    ///
    /// Returns a not-found error or `PeriodOutsideFiscalYear`.
    pub fn account_balance(
        &self,
        account_id: AccountId,
        fiscal_year_id: FiscalYearId,
        period: Option<Period>,
    ) -> Result<Decimal, LedgerError> {
        self.require_account(account_id)?;
        let fiscal_year = self.require_fiscal_year(fiscal_year_id)?;
        let last = Self::resolve_period(&fiscal_year, period)?;
        let rows = self.store.ledger_rows(account_id, fiscal_year_id)?;
        Ok(balance_as_of(&rows, last))
    }

    /// Balance of an account plus all of its descendants, each converted
    /// into the root account's normal-balance convention.
    ///
    /// # Errors
    ///
    /// Returns a not-found error or `PeriodOutsideFiscalYear`.
    pub fn rollup_balance(
        &self,
        account_id: AccountId,
        fiscal_year_id: FiscalYearId,
        period: Option<Period>,
    ) -> Result<Decimal, LedgerError> {
        let fiscal_year = self.require_fiscal_year(fiscal_year_id)?;
        let last = Self::resolve_period(&fiscal_year, period)?;

        let accounts = self.store.accounts()?;
        let root = accounts
            .iter()
            .find(|a| a.id == account_id)
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        let types: HashMap<AccountTypeId, AccountType> = self
            .store
            .account_types()?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        let normal_of = |account: &Account| {
            types
                .get(&account.account_type_id)
                .map(|t| t.normal_balance)
                .ok_or(LedgerError::AccountTypeNotFound(account.account_type_id))
        };
        let target = normal_of(root)?;

        let by_id: HashMap<AccountId, &Account> = accounts.iter().map(|a| (a.id, a)).collect();
        let tree = ChartTree::from_accounts(&accounts);
        let mut total = Decimal::ZERO;
        for id in tree.subtree(account_id) {
            let Some(&account) = by_id.get(&id) else {
                continue;
            };
            let rows = self.store.ledger_rows(id, fiscal_year_id)?;
            total += normal_of(account)?.convert(balance_as_of(&rows, last), target);
        }
        Ok(total)
    }
}
