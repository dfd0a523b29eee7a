//! Chart of accounts: account types, accounts and their hierarchy.

pub mod account;
pub mod tree;

pub use account::{
    ACCOUNT_CODE_MAX_LEN, ACCOUNT_NAME_MAX_LEN, ACCOUNT_TYPE_NAME_MAX_LEN, Account,
    AccountCategory, AccountType, NewAccount, NewAccountType,
};
pub use tree::ChartTree;
