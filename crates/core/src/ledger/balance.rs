//! Account balance calculations.
//!
//! Balances are always expressed in the account's normal-balance convention:
//! a positive balance means the account sits on its normal side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, FiscalYearId};

use crate::fiscal::Period;

/// The side on which an account type naturally increases.
///
/// - Debit-normal (assets, expenses): balance += debit - credit
/// - Credit-normal (liabilities, equity, revenue): balance += credit - debit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NormalBalance {
    /// Debit-normal accounts.
    Debit,
    /// Credit-normal accounts.
    Credit,
}

impl NormalBalance {
    /// Calculates the balance change for a debit/credit pair.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }

    /// Converts a balance expressed in `self`'s convention into `target`'s.
    #[must_use]
    pub fn convert(self, balance: Decimal, target: Self) -> Decimal {
        if self == target { balance } else { -balance }
    }
}

impl std::fmt::Display for NormalBalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debit => write!(f, "DEBIT"),
            Self::Credit => write!(f, "CREDIT"),
        }
    }
}

/// Period balance snapshot for one account in one fiscal year.
///
/// Invariants maintained by posting:
/// - `closing_balance = opening_balance + net movement of the period`
/// - `opening_balance[N + 1] = closing_balance[N]` for consecutive rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// The account.
    pub account_id: AccountId,
    /// The fiscal year.
    pub fiscal_year_id: FiscalYearId,
    /// The calendar month.
    pub period: Period,
    /// Balance at the start of the period.
    pub opening_balance: Decimal,
    /// Balance at the end of the period.
    pub closing_balance: Decimal,
    /// Row version, incremented on every write (optimistic concurrency).
    pub version: u64,
}

impl LedgerRow {
    /// Creates the first version of a row.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        fiscal_year_id: FiscalYearId,
        period: Period,
        opening_balance: Decimal,
    ) -> Self {
        Self {
            account_id,
            fiscal_year_id,
            period,
            opening_balance,
            closing_balance: opening_balance,
            version: 0,
        }
    }

    /// Net movement recorded in this period.
    #[must_use]
    pub fn net_movement(&self) -> Decimal {
        self.closing_balance - self.opening_balance
    }
}

/// Balance at the end of `period`: the closing balance of the latest row at
/// or before it, or zero when the account had no activity yet.
///
/// `rows` must belong to a single account and fiscal year.
#[must_use]
pub fn balance_as_of<'a, I>(rows: I, period: Period) -> Decimal
where
    I: IntoIterator<Item = &'a LedgerRow>,
{
    rows.into_iter()
        .filter(|row| row.period <= period)
        .max_by_key(|row| row.period)
        .map_or(Decimal::ZERO, |row| row.closing_balance)
}

/// Balance at the start of `period`.
#[must_use]
pub fn balance_before<'a, I>(rows: I, period: Period) -> Decimal
where
    I: IntoIterator<Item = &'a LedgerRow>,
{
    rows.into_iter()
        .filter(|row| row.period < period)
        .max_by_key(|row| row.period)
        .map_or(Decimal::ZERO, |row| row.closing_balance)
}

/// Net movement over the inclusive period range `from..=to`.
#[must_use]
pub fn movement(rows: &[LedgerRow], from: Period, to: Period) -> Decimal {
    balance_as_of(rows, to) - balance_before(rows, from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn period(month: u32) -> Period {
        Period::new(2026, month).unwrap()
    }

    /// Builds a contiguous chain of rows from a list of monthly movements.
    fn chain(changes: &[Decimal]) -> Vec<LedgerRow> {
        let account = AccountId::new();
        let fiscal_year = FiscalYearId::new();
        let mut rows: Vec<LedgerRow> = Vec::with_capacity(changes.len());
        for (month, change) in (1u32..).zip(changes) {
            let opening = rows.last().map_or(Decimal::ZERO, |r| r.closing_balance);
            let mut row = LedgerRow::new(account, fiscal_year, period(month), opening);
            row.closing_balance += *change;
            rows.push(row);
        }
        rows
    }

    fn balance_change_strategy() -> impl Strategy<Value = Decimal> {
        (-100_000i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The balance at the last period equals the sum of all movements.
        #[test]
        fn prop_final_balance_equals_sum_of_changes(
            changes in prop::collection::vec(balance_change_strategy(), 1..=12),
        ) {
            let rows = chain(&changes);
            let last = rows.last().unwrap().period;
            let expected: Decimal = changes.iter().copied().sum();
            prop_assert_eq!(balance_as_of(&rows, last), expected);
        }

        /// Movement over a range equals the sum of the row movements inside it.
        #[test]
        fn prop_movement_matches_row_sum(
            changes in prop::collection::vec(balance_change_strategy(), 12..=12),
            from in 1u32..=12,
            len in 0u32..12,
        ) {
            let to = (from + len).min(12);
            let rows = chain(&changes);
            let expected: Decimal = rows
                .iter()
                .filter(|r| r.period >= period(from) && r.period <= period(to))
                .map(LedgerRow::net_movement)
                .sum();
            prop_assert_eq!(movement(&rows, period(from), period(to)), expected);
        }

        /// Converting a balance to the other side and back is lossless.
        #[test]
        fn prop_convert_round_trips(balance in balance_change_strategy()) {
            let there = NormalBalance::Debit.convert(balance, NormalBalance::Credit);
            prop_assert_eq!(NormalBalance::Credit.convert(there, NormalBalance::Debit), balance);
        }
    }

    #[test]
    fn test_debit_normal_balance_change() {
        let side = NormalBalance::Debit;
        assert_eq!(side.balance_change(dec!(100), dec!(0)), dec!(100));
        assert_eq!(side.balance_change(dec!(0), dec!(50)), dec!(-50));
        assert_eq!(side.balance_change(dec!(100), dec!(30)), dec!(70));
    }

    #[test]
    fn test_credit_normal_balance_change() {
        let side = NormalBalance::Credit;
        assert_eq!(side.balance_change(dec!(0), dec!(100)), dec!(100));
        assert_eq!(side.balance_change(dec!(50), dec!(0)), dec!(-50));
        assert_eq!(side.balance_change(dec!(30), dec!(100)), dec!(70));
    }

    #[test]
    fn test_balance_as_of_gaps_use_latest_earlier_row() {
        let account = AccountId::new();
        let fiscal_year = FiscalYearId::new();
        let mut march = LedgerRow::new(account, fiscal_year, period(3), dec!(0));
        march.closing_balance = dec!(250);

        let rows = vec![march];
        assert_eq!(balance_as_of(&rows, period(2)), dec!(0));
        assert_eq!(balance_as_of(&rows, period(3)), dec!(250));
        assert_eq!(balance_as_of(&rows, period(7)), dec!(250));
        assert_eq!(balance_before(&rows, period(3)), dec!(0));
        assert_eq!(balance_before(&rows, period(4)), dec!(250));
    }

    #[test]
    fn test_display() {
        assert_eq!(NormalBalance::Debit.to_string(), "DEBIT");
    }
}
