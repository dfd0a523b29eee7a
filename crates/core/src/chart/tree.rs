//! Account hierarchy built from parent ids.
//!
//! The tree is derived on demand from a flat account list; nothing holds
//! live references between accounts.

use std::collections::{HashMap, HashSet, VecDeque};

use tally_shared::types::AccountId;

use super::account::Account;

/// Parent/children index over a set of accounts.
#[derive(Debug, Default)]
pub struct ChartTree {
    parents: HashMap<AccountId, Option<AccountId>>,
    children: HashMap<AccountId, Vec<AccountId>>,
}

impl ChartTree {
    /// Builds the index from a flat list of accounts.
    #[must_use]
    pub fn from_accounts(accounts: &[Account]) -> Self {
        let mut tree = Self::default();
        for account in accounts {
            tree.parents.insert(account.id, account.parent_id);
            if let Some(parent) = account.parent_id {
                tree.children.entry(parent).or_default().push(account.id);
            }
        }
        tree
    }

    /// Returns true if making `new_parent` the parent of `account` would
    /// close a loop (the parent is the account itself or one of its descendants).
    #[must_use]
    pub fn would_create_cycle(&self, account: AccountId, new_parent: AccountId) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(new_parent);
        while let Some(id) = current {
            if id == account {
                return true;
            }
            // Stop on loops already present in the data.
            if !seen.insert(id) {
                return true;
            }
            current = self.parents.get(&id).copied().flatten();
        }
        false
    }

    /// The account and all of its descendants, breadth first.
    #[must_use]
    pub fn subtree(&self, root: AccountId) -> Vec<AccountId> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            result.push(id);
            if let Some(children) = self.children.get(&id) {
                queue.extend(children.iter().copied());
            }
        }
        result
    }
}
