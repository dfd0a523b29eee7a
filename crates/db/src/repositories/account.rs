//! Chart of accounts storage.

use tally_core::chart::{Account, AccountType};
use tally_core::repository::{AccountRepository, DuplicateKind, StoreError, StoreResult};
use tally_shared::types::{AccountId, AccountTypeId};

use crate::MemoryStore;

impl AccountRepository for MemoryStore {
    fn account_type(&self, id: AccountTypeId) -> StoreResult<Option<AccountType>> {
        Ok(self.read()?.account_types.get(&id).cloned())
    }

    fn account_types(&self) -> StoreResult<Vec<AccountType>> {
        let mut types: Vec<AccountType> = self.read()?.account_types.values().cloned().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    fn insert_account_type(&self, account_type: &AccountType) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.account_types.contains_key(&account_type.id) {
            return Err(StoreError::Duplicate {
                kind: DuplicateKind::Record,
                key: account_type.id.to_string(),
            });
        }
        if state
            .account_types
            .values()
            .any(|t| t.name.eq_ignore_ascii_case(&account_type.name))
        {
            return Err(StoreError::Duplicate {
                kind: DuplicateKind::AccountTypeName,
                key: account_type.name.clone(),
            });
        }
        state
            .account_types
            .insert(account_type.id, account_type.clone());
        Ok(())
    }

    fn account(&self, id: AccountId) -> StoreResult<Option<Account>> {
        Ok(self.read()?.accounts.get(&id).cloned())
    }

    fn accounts(&self) -> StoreResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self.read()?.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    fn insert_account(&self, account: &Account) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.accounts.contains_key(&account.id) {
            return Err(StoreError::Duplicate {
                kind: DuplicateKind::Record,
                key: account.id.to_string(),
            });
        }
        if state.accounts.values().any(|a| a.code == account.code) {
            return Err(StoreError::Duplicate {
                kind: DuplicateKind::AccountCode,
                key: account.code.clone(),
            });
        }
        if !state.account_types.contains_key(&account.account_type_id) {
            return Err(StoreError::NotFound(format!(
                "account type {}",
                account.account_type_id
            )));
        }
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    fn update_account(&self, account: &Account) -> StoreResult<()> {
        let mut state = self.write()?;
        if state
            .accounts
            .values()
            .any(|a| a.id != account.id && a.code == account.code)
        {
            return Err(StoreError::Duplicate {
                kind: DuplicateKind::AccountCode,
                key: account.code.clone(),
            });
        }
        let slot = state
            .accounts
            .get_mut(&account.id)
            .ok_or_else(|| StoreError::NotFound(format!("account {}", account.id)))?;
        *slot = account.clone();
        Ok(())
    }
}
